//! Таблица ручных поправок координат для конкретных залов.
//!
//! Скрейпер иногда отдает секции, которые после нормализации налезают
//! на соседние (например, задний левый мезонин в одном из залов).
//! Поправка применяется после общего алгоритма и задается данными,
//! а не условиями в коде.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::models::Section;

/// Дополнительное смещение секции.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    #[serde(default)]
    pub dx: f64,
    #[serde(default)]
    pub dy: f64,
}

impl Offset {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

/// Одна запись файла поправок.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateOverride {
    pub theater: String,
    pub section: String,
    #[serde(default)]
    pub dx: f64,
    #[serde(default)]
    pub dy: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OverridesFile {
    #[serde(default)]
    overrides: Vec<CoordinateOverride>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinateOverrides {
    entries: HashMap<(String, String), Offset>,
}

impl CoordinateOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = CoordinateOverride>) -> Self {
        let mut table = Self::new();
        for entry in entries {
            table.insert(entry.theater, entry.section, Offset::new(entry.dx, entry.dy));
        }
        table
    }

    /// Загрузить таблицу из файла (TOML / JSON / YAML, формат по расширению).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ::config::ConfigError> {
        let path = path.as_ref();
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path))
            .build()?;
        let file: OverridesFile = settings.try_deserialize()?;
        let table = Self::from_entries(file.overrides);
        info!("Loaded {} coordinate overrides from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn insert(&mut self, theater: impl Into<String>, section: impl Into<String>, offset: Offset) {
        // Повторная запись для той же пары заменяет предыдущую
        self.entries.insert((theater.into(), section.into()), offset);
    }

    pub fn with(mut self, theater: impl Into<String>, section: impl Into<String>, offset: Offset) -> Self {
        self.insert(theater, section, offset);
        self
    }

    /// Смещение для секции зала; секция ищется по label, затем по name.
    pub fn offset_for(&self, theater_name: &str, section: &Section) -> Offset {
        if self.entries.is_empty() {
            return Offset::default();
        }
        [section.label.as_str(), section.name.as_str()]
            .into_iter()
            .filter(|key| !key.is_empty())
            .find_map(|key| self.entries.get(&(theater_name.to_string(), key.to_string())))
            .copied()
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

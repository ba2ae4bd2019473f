//! Нормализация координат схемы зала.
//!
//! Разные части зала (партер, мезонин, балкон) скрейпятся в несвязанных
//! системах координат, поэтому сдвиг считается отдельно для каждой
//! группы секций с общим `parent_section`. Секции без родителя
//! попадают в неявную группу `"Main"`.

use std::collections::HashMap;
use tracing::{debug, trace};

use crate::models::{SeatPlan, Section};
use super::overrides::CoordinateOverrides;

/// Отступ от левого края контейнера.
pub const MARGIN_X: f64 = 10.0;
/// Отступ сверху, чтобы места не налезали на подписи.
pub const MARGIN_Y: f64 = 15.0;
/// Ключ группы для секций без родителя.
pub const MAIN_GROUP: &str = "Main";

pub fn group_key(section: &Section) -> &str {
    section.parent_section.as_deref().unwrap_or(MAIN_GROUP)
}

/// Сдвиг группы по осям; `None` - в группе нет ни одного значения по оси.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GroupShift {
    pub dx: Option<f64>,
    pub dy: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Extent {
    min_x: Option<f64>,
    min_y: Option<f64>,
}

fn min_opt(current: Option<f64>, value: Option<f64>) -> Option<f64> {
    match (current, value) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (None, v) => v,
        (c, None) => c,
    }
}

/// Считает сдвиг для каждой группы секций плана.
pub fn group_shifts(plan: &SeatPlan) -> HashMap<String, GroupShift> {
    let mut extents: HashMap<&str, Extent> = HashMap::new();

    for section in &plan.sections {
        let extent = extents.entry(group_key(section)).or_default();
        for seat in section.seats() {
            extent.min_x = min_opt(extent.min_x, seat.x.filter(|x| x.is_finite()));
            extent.min_y = min_opt(extent.min_y, seat.y.filter(|y| y.is_finite()));
        }
    }

    extents
        .into_iter()
        .map(|(key, extent)| {
            let shift = GroupShift {
                dx: extent.min_x.map(|min| MARGIN_X - min),
                dy: extent.min_y.map(|min| MARGIN_Y - min),
            };
            (key.to_string(), shift)
        })
        .collect()
}

/// Нормализация без таблицы поправок.
pub fn normalize(plan: &SeatPlan) -> SeatPlan {
    normalize_with_overrides(plan, &CoordinateOverrides::default())
}

/// Возвращает новый план, входной не меняется.
///
/// Каждая группа сдвигается так, чтобы ее минимальные координаты стали
/// `(MARGIN_X, MARGIN_Y)`. Места с `null` по оси остаются `null`.
/// Поправки из `overrides` добавляются после общего сдвига.
pub fn normalize_with_overrides(plan: &SeatPlan, overrides: &CoordinateOverrides) -> SeatPlan {
    let shifts = group_shifts(plan);
    let mut normalized = plan.clone();

    for section in normalized.sections.iter_mut() {
        let shift = shifts.get(group_key(section)).copied().unwrap_or_default();
        let extra = overrides.offset_for(&plan.theater.name, section);
        if !extra.is_zero() {
            debug!(
                "Applying coordinate override ({}, {}) to section {} of {}",
                extra.dx, extra.dy, section.name, plan.theater.name
            );
        }

        let dx = shift.dx.unwrap_or(0.0) + extra.dx;
        let dy = shift.dy.unwrap_or(0.0) + extra.dy;

        for seat in section.rows.iter_mut().flat_map(|row| row.seats.iter_mut()) {
            seat.x = seat.x.map(|x| x + dx);
            seat.y = seat.y.map(|y| y + dy);
        }
    }

    trace!("Normalized {} groups for theater {}", shifts.len(), plan.theater.id);
    normalized
}

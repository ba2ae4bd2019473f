use thiserror::Error;
use uuid::Uuid;

use crate::models::{PricePoint, Seat, SeatAttributes};
use super::reconcile::find_price_point;

#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    #[error("Некорректная цена: {0}")]
    InvalidPrice(f64),

    #[error("Некорректный цвет: {0}")]
    InvalidColor(String),

    #[error("Ценовая точка с такой ценой и атрибутами уже есть: {0}")]
    Duplicate(String),
}

fn is_hex_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// Список ценовых точек редактора.
///
/// Гарантирует, что пара (price, attributes) уникальна - по ней место
/// сверяется обратно с точкой.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricePoints {
    points: Vec<PricePoint>,
}

impl PricePoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Собрать из сохраненного списка (например, из сценария).
    pub fn from_vec(points: Vec<PricePoint>) -> Result<Self, PricingError> {
        let mut set = Self::new();
        for point in points {
            set.insert(point)?;
        }
        Ok(set)
    }

    /// Добавить новую точку со сгенерированным id.
    pub fn add(
        &mut self,
        price: f64,
        color: impl Into<String>,
        attributes: SeatAttributes,
    ) -> Result<&PricePoint, PricingError> {
        let point = PricePoint {
            id: Uuid::new_v4().simple().to_string(),
            price,
            color: color.into(),
            attributes,
        };
        self.insert(point)?;
        Ok(&self.points[self.points.len() - 1])
    }

    pub fn insert(&mut self, point: PricePoint) -> Result<(), PricingError> {
        if !point.price.is_finite() || point.price < 0.0 {
            return Err(PricingError::InvalidPrice(point.price));
        }
        if !is_hex_color(&point.color) {
            return Err(PricingError::InvalidColor(point.color));
        }
        if let Some(existing) = self.points.iter().find(|p| p.matches(point.price, &point.attributes)) {
            return Err(PricingError::Duplicate(existing.id.clone()));
        }
        self.points.push(point);
        Ok(())
    }

    /// Места с этой ценой остаются с сырыми значениями и просто
    /// перестают сверяться с какой-либо точкой.
    pub fn remove(&mut self, id: &str) -> Option<PricePoint> {
        let pos = self.points.iter().position(|p| p.id == id)?;
        Some(self.points.remove(pos))
    }

    pub fn get(&self, id: &str) -> Option<&PricePoint> {
        self.points.iter().find(|p| p.id == id)
    }

    pub fn for_seat(&self, seat: &Seat) -> Option<&PricePoint> {
        find_price_point(&self.points, seat)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PricePoint> {
        self.points.iter()
    }

    pub fn as_slice(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn into_vec(self) -> Vec<PricePoint> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

use serde::{Deserialize, Serialize};

use super::SeatAttributes;

/// Ценовая точка, которую пользователь "рисует" на местах.
///
/// Идентичность для сверки с местом задается парой (price, attributes),
/// а не `id`: места сохраняются с сырыми значениями цены и флагов.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub id: String,
    pub price: f64,
    pub color: String,
    pub attributes: SeatAttributes,
}

impl PricePoint {
    pub fn matches(&self, price: f64, attributes: &SeatAttributes) -> bool {
        self.price == price && self.attributes == *attributes
    }
}

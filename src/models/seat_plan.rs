use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Theater;

/// Набор флагов, которые ценовая точка переносит на место.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatAttributes {
    #[serde(default)]
    pub house_seat: bool,
    #[serde(default)]
    pub emergency: bool,
    #[serde(default)]
    pub premium: bool,
    #[serde(default)]
    pub accessible: bool,
    #[serde(default)]
    pub restricted_view: bool,
}

/// Отображаемый статус места
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    House,
    Emergency,
    Premium,
    Accessible,
    Restricted,
    Available,
}

impl SeatStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatStatus::House => "house",
            SeatStatus::Emergency => "emergency",
            SeatStatus::Premium => "premium",
            SeatStatus::Accessible => "accessible",
            SeatStatus::Restricted => "restricted",
            SeatStatus::Available => "available",
        }
    }
}

impl fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeatStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "house" => Ok(SeatStatus::House),
            "emergency" => Ok(SeatStatus::Emergency),
            "premium" => Ok(SeatStatus::Premium),
            "accessible" => Ok(SeatStatus::Accessible),
            "restricted" => Ok(SeatStatus::Restricted),
            "available" => Ok(SeatStatus::Available),
            other => Err(format!("unknown seat status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub id: i64,
    pub seat_number: String,
    pub display_number: Option<String>,
    pub price: Option<f64>,
    pub status: Option<SeatStatus>,
    pub accessible: Option<bool>,
    // Координаты в пиксельном пространстве скрейпера, могут быть отрицательными
    pub x: Option<f64>,
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<SeatAttributes>,
}

impl Seat {
    /// Координаты места, если заданы обе оси.
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some((x, y)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub id: i64,
    pub label: String,
    pub display_label: Option<String>,
    pub section_id: i64,
    pub seats: Vec<Seat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub label: String,
    pub category_key: Option<i64>,
    pub color: Option<String>,
    #[serde(default)]
    pub parent_section: Option<String>,
    pub rows: Vec<Row>,
}

impl Section {
    pub fn seats(&self) -> impl Iterator<Item = &Seat> {
        self.rows.iter().flat_map(|row| row.seats.iter())
    }
}

/// Адрес места внутри плана: секция → ряд → место.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatRef {
    pub section_id: i64,
    pub row_id: i64,
    pub seat_id: i64,
}

impl SeatRef {
    pub fn new(section_id: i64, row_id: i64, seat_id: i64) -> Self {
        Self { section_id, row_id, seat_id }
    }
}

/// Полный снимок схемы зала для одного театра или сценария.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatPlan {
    pub theater: Theater,
    pub sections: Vec<Section>,
}

impl SeatPlan {
    /// Все места плана вместе с их адресами.
    pub fn seats(&self) -> impl Iterator<Item = (SeatRef, &Seat)> {
        self.sections.iter().flat_map(|section| {
            section.rows.iter().flat_map(move |row| {
                row.seats
                    .iter()
                    .map(move |seat| (SeatRef::new(section.id, row.id, seat.id), seat))
            })
        })
    }

    pub fn seat(&self, target: &SeatRef) -> Option<&Seat> {
        self.sections
            .iter()
            .find(|s| s.id == target.section_id)?
            .rows
            .iter()
            .find(|r| r.id == target.row_id)?
            .seats
            .iter()
            .find(|seat| seat.id == target.seat_id)
    }

    pub fn seat_mut(&mut self, target: &SeatRef) -> Option<&mut Seat> {
        self.sections
            .iter_mut()
            .find(|s| s.id == target.section_id)?
            .rows
            .iter_mut()
            .find(|r| r.id == target.row_id)?
            .seats
            .iter_mut()
            .find(|seat| seat.id == target.seat_id)
    }

    pub fn seat_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| s.rows.iter())
            .map(|r| r.seats.len())
            .sum()
    }
}

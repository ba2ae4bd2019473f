use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::{PricePoint, SeatPlan};

/// Сценарий: схема зала и цены, сохраненные вместе.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: i64,
    pub production_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub theater_id: i64,
    pub seatmap: SeatPlan,
    pub pricing: Vec<PricePoint>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Краткая запись для списка сценариев постановки
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSummary {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub theater_id: i64,
    pub theater_name: Option<String>,
    pub updated_at: NaiveDateTime,
}

/// Тело запроса на создание / обновление сценария.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDraft {
    #[validate(range(min = 1, message = "productionId должен быть > 0"))]
    pub production_id: i64,
    #[validate(length(min = 1, max = 100, message = "Введите название сценария"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 1, message = "theaterId должен быть > 0"))]
    pub theater_id: i64,
    pub seatmap: SeatPlan,
    #[validate(length(min = 1, message = "Настройте цены перед сохранением"))]
    pub pricing: Vec<PricePoint>,
}

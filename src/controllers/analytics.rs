//! analytics.rs
//!
//! Сводка по ценам сценария: сколько мест стоит каждую цену,
//! сколько это в деньгах и сколько мест еще без цены.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::controllers::scenarios::load_scenario;
use crate::error::ApiError;
use crate::models::Scenario;
use crate::seatmap::{format_currency, price_distribution, reconcile_plan, PriceDistribution};
use crate::AppState;

/// Определяет маршруты, связанные с аналитикой.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/scenarios/{id}/analytics", get(get_scenario_analytics))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub scenario_id: i64,
    #[serde(flatten)]
    pub distribution: PriceDistribution,
    pub total_value_formatted: String,
    /// Места, которые не совпали ни с одной ценовой точкой
    pub unmatched_seats: usize,
}

pub fn scenario_analytics(scenario: &Scenario) -> AnalyticsResponse {
    let distribution = price_distribution(&scenario.seatmap, &scenario.pricing);
    let matched = reconcile_plan(&scenario.seatmap, &scenario.pricing).len();

    AnalyticsResponse {
        scenario_id: scenario.id,
        total_value_formatted: format_currency(distribution.total_value),
        unmatched_seats: scenario.seatmap.seat_count().saturating_sub(matched),
        distribution,
    }
}

/// GET /api/scenarios/{id}/analytics
async fn get_scenario_analytics(
    State(state): State<Arc<AppState>>,
    Path(scenario_id): Path<i64>,
) -> Result<Json<AnalyticsResponse>, ApiError> {
    let scenario = load_scenario(&state, scenario_id).await?;
    Ok(Json(scenario_analytics(&scenario)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PricePoint, Row, Seat, SeatAttributes, SeatPlan, Section, Theater};

    fn seat(id: i64, price: Option<f64>) -> Seat {
        Seat {
            id,
            seat_number: id.to_string(),
            display_number: None,
            price,
            status: None,
            accessible: None,
            x: Some(id as f64),
            y: Some(0.0),
            attributes: price.map(|_| SeatAttributes::default()),
        }
    }

    #[test]
    fn counts_priced_and_unmatched_seats() {
        let scenario = Scenario {
            id: 3,
            production_id: 1,
            name: "Matinee".into(),
            description: None,
            theater_id: 1,
            seatmap: SeatPlan {
                theater: Theater { id: 1, name: "Lyric".into(), venue_slug: None },
                sections: vec![Section {
                    id: 1,
                    name: "ORCHESTRA".into(),
                    label: "ORCHESTRA".into(),
                    category_key: None,
                    color: None,
                    parent_section: None,
                    rows: vec![Row {
                        id: 1,
                        label: "A".into(),
                        display_label: None,
                        section_id: 1,
                        seats: vec![seat(1, Some(1_000.0)), seat(2, Some(1_000.0)), seat(3, None)],
                    }],
                }],
            },
            pricing: vec![PricePoint {
                id: "a".into(),
                price: 1_000.0,
                color: "#00ff00".into(),
                attributes: SeatAttributes::default(),
            }],
            created_at: chrono::NaiveDateTime::default(),
            updated_at: chrono::NaiveDateTime::default(),
        };

        let report = scenario_analytics(&scenario);
        assert_eq!(report.distribution.total_seats, 3);
        assert_eq!(report.distribution.total_value, 2_000.0);
        assert_eq!(report.total_value_formatted, "$2.0K");
        assert_eq!(report.unmatched_seats, 1);
    }
}

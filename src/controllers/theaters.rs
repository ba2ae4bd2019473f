use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::{SeatPlan, Theater};
use crate::seatmap::{group_sections, section_extent};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/theaters", get(list_theaters))
        .route("/theaters/{id}/seatplan", get(get_seat_plan))
        .route("/theaters/{id}/layout", get(get_layout))
}

async fn list_theaters(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Theater>>, ApiError> {
    Ok(Json(state.repo.list_theaters().await?))
}

#[derive(Debug, Default, Deserialize)]
struct SeatPlanQuery {
    /// `true` отдает координаты как есть, без нормализации
    #[serde(default)]
    raw: bool,
}

async fn get_seat_plan(
    State(state): State<Arc<AppState>>,
    Path(theater_id): Path<i64>,
    Query(params): Query<SeatPlanQuery>,
) -> Result<Json<SeatPlan>, ApiError> {
    let plan = if params.raw {
        state.cache.get_seat_plan(theater_id).await?
    } else {
        state.normalized_seat_plan(theater_id).await?
    };

    plan.map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Зал {} не найден", theater_id)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SectionBox {
    id: i64,
    name: String,
    label: String,
    width: Option<f64>,
    height: Option<f64>,
}

#[derive(Debug, Serialize)]
struct GroupResponse {
    name: String,
    sections: Vec<SectionBox>,
}

/// GET /api/theaters/{id}/layout
///
/// Секции нормализованной схемы, сгруппированные по родителю,
/// с размерами области для отрисовки.
async fn get_layout(
    State(state): State<Arc<AppState>>,
    Path(theater_id): Path<i64>,
) -> Result<Json<Vec<GroupResponse>>, ApiError> {
    let plan = state
        .normalized_seat_plan(theater_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Зал {} не найден", theater_id)))?;

    let groups = group_sections(&plan)
        .into_iter()
        .map(|group| GroupResponse {
            name: group.name.to_string(),
            sections: group
                .sections
                .iter()
                .map(|section| {
                    let extent = section_extent(section);
                    SectionBox {
                        id: section.id,
                        name: section.name.clone(),
                        label: section.label.clone(),
                        width: extent.map(|(w, _)| w),
                        height: extent.map(|(_, h)| h),
                    }
                })
                .collect(),
        })
        .collect();

    Ok(Json(groups))
}

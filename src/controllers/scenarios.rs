use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;
use validator::Validate;

use crate::error::ApiError;
use crate::models::{Scenario, ScenarioDraft, ScenarioSummary};
use crate::seatmap::{reconcile_plan, PricePoints};
use crate::services::{assign_seats, AssignSeatsRequest, ScenarioUpdate};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/scenarios", get(list_scenarios).post(create_scenario))
        .route("/scenarios/{id}", get(get_scenario).put(update_scenario))
        .route("/scenarios/{id}/seats", patch(assign_scenario_seats))
}

// --- Вспомогательные функции ---

/// Загрузить сценарий; если схема не сохранена, подставить
/// нормализованную схему зала.
pub(crate) async fn load_scenario(state: &AppState, scenario_id: i64) -> Result<Scenario, ApiError> {
    let stored = state
        .repo
        .get_scenario(scenario_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Сценарий {} не найден", scenario_id)))?;

    let fallback = if stored.seatmap.is_none() {
        warn!("Scenario {} has no stored seat map, using theater {}", scenario_id, stored.theater_id);
        state.normalized_seat_plan(stored.theater_id).await?
    } else {
        None
    };

    stored
        .into_scenario(|| fallback)
        .ok_or_else(|| ApiError::NotFound(format!("Схема для сценария {} не найдена", scenario_id)))
}

/// Проверка черновика: поля формы и корректность набора цен.
fn validate_draft(draft: &ScenarioDraft) -> Result<(), ApiError> {
    draft.validate()?;
    PricePoints::from_vec(draft.pricing.clone())?;
    Ok(())
}

// --- Обработчики ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScenariosQuery {
    production_id: i64,
}

/// GET /api/scenarios?productionId=
async fn list_scenarios(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ScenariosQuery>,
) -> Result<Json<Vec<ScenarioSummary>>, ApiError> {
    if params.production_id <= 0 {
        return Err(ApiError::BadRequest("productionId должен быть > 0".into()));
    }
    Ok(Json(state.repo.list_scenarios(params.production_id).await?))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioResponse {
    #[serde(flatten)]
    scenario: Scenario,
    /// id места → id ценовой точки, которой оно соответствует
    seat_price_points: HashMap<i64, String>,
}

impl ScenarioResponse {
    fn new(scenario: Scenario) -> Self {
        let seat_price_points = reconcile_plan(&scenario.seatmap, &scenario.pricing)
            .into_iter()
            .map(|(seat, point)| (seat.seat_id, point.id.clone()))
            .collect();
        Self { scenario, seat_price_points }
    }
}

/// GET /api/scenarios/{id}
async fn get_scenario(
    State(state): State<Arc<AppState>>,
    Path(scenario_id): Path<i64>,
) -> Result<Json<ScenarioResponse>, ApiError> {
    let scenario = load_scenario(&state, scenario_id).await?;
    Ok(Json(ScenarioResponse::new(scenario)))
}

/// POST /api/scenarios
async fn create_scenario(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<ScenarioDraft>,
) -> Result<(StatusCode, Json<ScenarioResponse>), ApiError> {
    validate_draft(&draft)?;
    let scenario = state.repo.save_scenario(draft).await?;
    Ok((StatusCode::CREATED, Json(ScenarioResponse::new(scenario))))
}

/// PUT /api/scenarios/{id}
async fn update_scenario(
    State(state): State<Arc<AppState>>,
    Path(scenario_id): Path<i64>,
    Json(draft): Json<ScenarioDraft>,
) -> Result<Json<ScenarioResponse>, ApiError> {
    validate_draft(&draft)?;
    let scenario = state
        .repo
        .update_scenario(scenario_id, draft)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Сценарий {} не найден", scenario_id)))?;
    Ok(Json(ScenarioResponse::new(scenario)))
}

/// PATCH /api/scenarios/{id}/seats
///
/// Применяет ценовую точку к списку мест или к прямоугольному
/// диапазону между двумя местами и сохраняет результат.
/// Параллельное изменение того же сценария дает 409.
async fn assign_scenario_seats(
    State(state): State<Arc<AppState>>,
    Path(scenario_id): Path<i64>,
    Json(request): Json<AssignSeatsRequest>,
) -> Result<Json<ScenarioResponse>, ApiError> {
    let scenario = load_scenario(&state, scenario_id).await?;
    let read_at = scenario.updated_at;
    let draft = assign_seats(scenario, &request)?;

    // запись пройдет, только если сценарий не менялся после чтения
    match state.repo.update_scenario_if_unchanged(scenario_id, draft, read_at).await? {
        ScenarioUpdate::Updated(scenario) => Ok(Json(ScenarioResponse::new(scenario))),
        ScenarioUpdate::NotFound => Err(ApiError::NotFound(format!("Сценарий {} не найден", scenario_id))),
        ScenarioUpdate::Conflict => Err(ApiError::Conflict(format!(
            "Сценарий {} изменен другим запросом, повторите назначение",
            scenario_id
        ))),
    }
}

//! Назначение цен местам сохраненного сценария.
//!
//! Запрос прогоняется через тот же редактор, что и интерактивная
//! работа со схемой: список мест красится одним проходом, диапазон
//! равен нажатию на одном месте и заходу указателя на другое.

use serde::Deserialize;
use tracing::info;

use crate::error::ApiError;
use crate::models::{Scenario, ScenarioDraft, SeatRef};
use crate::seatmap::{PointerEvent, PricePoints, SeatMapEditor};

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SeatRange {
    pub from: SeatRef,
    pub to: SeatRef,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignSeatsRequest {
    pub price_point_id: String,
    #[serde(default)]
    pub seats: Vec<SeatRef>,
    pub range: Option<SeatRange>,
}

/// Применяет запрос к сценарию и возвращает черновик для сохранения.
pub fn assign_seats(scenario: Scenario, request: &AssignSeatsRequest) -> Result<ScenarioDraft, ApiError> {
    if request.seats.is_empty() && request.range.is_none() {
        return Err(ApiError::BadRequest("Укажите места или диапазон".into()));
    }

    let price_points = PricePoints::from_vec(scenario.pricing)?;
    let mut editor = SeatMapEditor::new(price_points).with_seat_plan(scenario.seatmap);

    if !editor.select_price_point(Some(&request.price_point_id)) {
        return Err(ApiError::BadRequest(format!(
            "Ценовая точка {} не найдена",
            request.price_point_id
        )));
    }

    // концы диапазона проверяются вместе со списком, до любой покраски
    let range_ends = request.range.iter().flat_map(|range| [range.from, range.to]);
    for seat in request.seats.iter().copied().chain(range_ends) {
        if editor.seat_plan().and_then(|plan| plan.seat(&seat)).is_none() {
            return Err(ApiError::BadRequest(format!("Место {} не найдено", seat.seat_id)));
        }
    }
    editor.paint_seats(&request.seats);

    if let Some(range) = request.range {
        editor.handle(PointerEvent::Down(range.from));
        editor.handle(PointerEvent::Enter(range.to));
        editor.handle(PointerEvent::Up);
    }

    info!(
        "Assigned price point {} in scenario {} ({} seats, range: {})",
        request.price_point_id,
        scenario.id,
        request.seats.len(),
        request.range.is_some()
    );

    let (seatmap, pricing) = editor.into_parts();
    let seatmap = seatmap.ok_or_else(|| anyhow::anyhow!("seat plan lost during assignment"))?;

    Ok(ScenarioDraft {
        production_id: scenario.production_id,
        name: scenario.name,
        description: scenario.description,
        theater_id: scenario.theater_id,
        seatmap,
        pricing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PricePoint, Row, Seat, SeatAttributes, SeatPlan, Section, Theater};

    fn seat(id: i64, x: f64, y: f64) -> Seat {
        Seat {
            id,
            seat_number: id.to_string(),
            display_number: None,
            price: None,
            status: None,
            accessible: None,
            x: Some(x),
            y: Some(y),
            attributes: None,
        }
    }

    fn scenario() -> Scenario {
        let seats = (0..3).map(|i| seat(i + 1, i as f64 * 10.0, 0.0)).collect();
        let plan = SeatPlan {
            theater: Theater { id: 1, name: "Lyric".into(), venue_slug: None },
            sections: vec![Section {
                id: 1,
                name: "ORCHESTRA".into(),
                label: "ORCHESTRA".into(),
                category_key: None,
                color: None,
                parent_section: None,
                rows: vec![Row { id: 1, label: "A".into(), display_label: None, section_id: 1, seats }],
            }],
        };
        Scenario {
            id: 5,
            production_id: 9,
            name: "Opening".into(),
            description: None,
            theater_id: 1,
            seatmap: plan,
            pricing: vec![PricePoint {
                id: "pp1".into(),
                price: 80.0,
                color: "#ff0000".into(),
                attributes: SeatAttributes { premium: true, ..Default::default() },
            }],
            created_at: chrono::NaiveDateTime::default(),
            updated_at: chrono::NaiveDateTime::default(),
        }
    }

    #[test]
    fn range_assigns_every_seat_between() {
        let request = AssignSeatsRequest {
            price_point_id: "pp1".into(),
            seats: vec![],
            range: Some(SeatRange { from: SeatRef::new(1, 1, 1), to: SeatRef::new(1, 1, 3) }),
        };
        let draft = assign_seats(scenario(), &request).unwrap();
        assert!(draft.seatmap.seats().all(|(_, s)| s.price == Some(80.0)));
        assert_eq!(draft.pricing.len(), 1);
    }

    #[test]
    fn listed_seats_only() {
        let request = AssignSeatsRequest {
            price_point_id: "pp1".into(),
            seats: vec![SeatRef::new(1, 1, 2)],
            range: None,
        };
        let draft = assign_seats(scenario(), &request).unwrap();
        let priced: Vec<i64> = draft
            .seatmap
            .seats()
            .filter(|(_, s)| s.price.is_some())
            .map(|(_, s)| s.id)
            .collect();
        assert_eq!(priced, vec![2]);
    }

    #[test]
    fn unknown_price_point_and_seat_are_rejected() {
        let request = AssignSeatsRequest { price_point_id: "nope".into(), seats: vec![SeatRef::new(1, 1, 1)], range: None };
        assert!(matches!(assign_seats(scenario(), &request), Err(ApiError::BadRequest(_))));

        let request = AssignSeatsRequest { price_point_id: "pp1".into(), seats: vec![SeatRef::new(1, 1, 42)], range: None };
        assert!(matches!(assign_seats(scenario(), &request), Err(ApiError::BadRequest(_))));

        let request = AssignSeatsRequest { price_point_id: "pp1".into(), seats: vec![], range: None };
        assert!(matches!(assign_seats(scenario(), &request), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn unknown_range_endpoint_is_rejected() {
        let ranges = [
            SeatRange { from: SeatRef::new(1, 1, 999), to: SeatRef::new(1, 1, 3) },
            SeatRange { from: SeatRef::new(1, 1, 1), to: SeatRef::new(1, 1, 999) },
            SeatRange { from: SeatRef::new(1, 7, 1), to: SeatRef::new(1, 1, 3) },
        ];
        for range in ranges {
            let request = AssignSeatsRequest { price_point_id: "pp1".into(), seats: vec![], range: Some(range) };
            assert!(matches!(assign_seats(scenario(), &request), Err(ApiError::BadRequest(_))));
        }

        // ошибка в диапазоне отклоняет весь запрос, вместе со списком
        let request = AssignSeatsRequest {
            price_point_id: "pp1".into(),
            seats: vec![SeatRef::new(1, 1, 2)],
            range: Some(SeatRange { from: SeatRef::new(1, 1, 999), to: SeatRef::new(1, 1, 3) }),
        };
        assert!(matches!(assign_seats(scenario(), &request), Err(ApiError::BadRequest(_))));
    }
}

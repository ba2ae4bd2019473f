//! Назначение ценовой точки местам: одно место или прямоугольная заливка.
//!
//! Все функции чистые: принимают снимок плана и возвращают новый.

use std::collections::HashSet;
use tracing::debug;

use crate::models::{PricePoint, Seat, SeatPlan, SeatRef};
use super::position_index::{PositionIndex, Rect};
use super::status::derive_status;

/// Переносит цену и атрибуты точки на место и пересчитывает статус.
pub fn apply_price_point(seat: &mut Seat, price_point: &PricePoint) {
    seat.price = Some(price_point.price);
    seat.attributes = Some(price_point.attributes);
    seat.status = Some(derive_status(&price_point.attributes));
}

/// Новый план, в котором изменено только место `target`.
/// Неизвестное место - план возвращается без изменений.
pub fn apply_seat(plan: &SeatPlan, target: &SeatRef, price_point: &PricePoint) -> SeatPlan {
    let mut updated = plan.clone();
    match updated.seat_mut(target) {
        Some(seat) => apply_price_point(seat, price_point),
        None => debug!("Seat {:?} not found in plan, skipping", target),
    }
    updated
}

/// Применить точку сразу к набору мест.
pub fn apply_seats(plan: &SeatPlan, targets: &[SeatRef], price_point: &PricePoint) -> SeatPlan {
    let mut updated = plan.clone();
    if targets.is_empty() {
        return updated;
    }

    let wanted: HashSet<&SeatRef> = targets.iter().collect();
    let mut applied = 0usize;

    for section in updated.sections.iter_mut() {
        for row in section.rows.iter_mut() {
            for seat in row.seats.iter_mut() {
                if wanted.contains(&SeatRef::new(section.id, row.id, seat.id)) {
                    apply_price_point(seat, price_point);
                    applied += 1;
                }
            }
        }
    }

    debug!("Applied price point {} to {} seats", price_point.id, applied);
    updated
}

/// Прямоугольник между двумя местами плана.
/// `None`, если у одного из мест нет координат.
pub fn rect_between(plan: &SeatPlan, from: &SeatRef, to: &SeatRef) -> Option<Rect> {
    let a = plan.seat(from)?.position()?;
    let b = plan.seat(to)?.position()?;
    Some(Rect::spanning(a, b))
}

/// Заливка всех мест плана внутри прямоугольника между `from` и `to`,
/// независимо от секции и ряда.
///
/// Если прямоугольник построить нельзя (нет координат), точка
/// применяется только к месту `to`.
pub fn fill_range(
    plan: &SeatPlan,
    index: &PositionIndex,
    from: &SeatRef,
    to: &SeatRef,
    price_point: &PricePoint,
) -> SeatPlan {
    match rect_between(plan, from, to) {
        Some(rect) => {
            let targets = index.within(&rect);
            debug!("Range fill {:?} covers {} seats", rect, targets.len());
            apply_seats(plan, &targets, price_point)
        }
        None => apply_seat(plan, to, price_point),
    }
}

use std::collections::HashMap;

use crate::models::{PricePoint, Seat, SeatPlan, SeatRef};

/// Ценовая точка, совпадающая с местом по цене и всем пяти атрибутам.
///
/// Место без цены ни с чем не совпадает. Место без атрибутов
/// сверяется как место со всеми флагами `false`.
pub fn find_price_point<'a>(price_points: &'a [PricePoint], seat: &Seat) -> Option<&'a PricePoint> {
    let price = seat.price?;
    let attributes = seat.attributes.unwrap_or_default();
    price_points.iter().find(|p| p.matches(price, &attributes))
}

/// Цвет места для отрисовки; `None` - нейтральный цвет по умолчанию.
pub fn seat_color<'a>(price_points: &'a [PricePoint], seat: &Seat) -> Option<&'a str> {
    find_price_point(price_points, seat).map(|p| p.color.as_str())
}

/// Сопоставление всех оцененных мест плана с ценовыми точками.
/// Места без совпадения в результат не попадают.
pub fn reconcile_plan<'a>(plan: &SeatPlan, price_points: &'a [PricePoint]) -> HashMap<SeatRef, &'a PricePoint> {
    plan.seats()
        .filter_map(|(seat_ref, seat)| find_price_point(price_points, seat).map(|p| (seat_ref, p)))
        .collect()
}

use crate::models::{Seat, SeatAttributes, SeatStatus};

/// Статус места по его атрибутам. Атрибуты не взаимоисключающие,
/// поэтому порядок проверки фиксирован: первое совпадение побеждает.
pub fn derive_status(attributes: &SeatAttributes) -> SeatStatus {
    if attributes.house_seat {
        SeatStatus::House
    } else if attributes.emergency {
        SeatStatus::Emergency
    } else if attributes.premium {
        SeatStatus::Premium
    } else if attributes.accessible {
        SeatStatus::Accessible
    } else if attributes.restricted_view {
        SeatStatus::Restricted
    } else {
        SeatStatus::Available
    }
}

/// Статус считается на лету, сохраненное поле `status` не используется.
pub fn seat_status(seat: &Seat) -> SeatStatus {
    seat.attributes
        .as_ref()
        .map(derive_status)
        .unwrap_or(SeatStatus::Available)
}

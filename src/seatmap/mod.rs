//! Ядро работы со схемой зала: нормализация координат, назначение цен
//! местам и сверка мест с ценовыми точками.

pub mod normalizer;
pub mod overrides;
pub mod status;
pub mod position_index;
pub mod assignment;
pub mod reconcile;
pub mod pricing;
pub mod editor;
pub mod layout;
pub mod distribution;

pub use normalizer::{normalize, normalize_with_overrides, MARGIN_X, MARGIN_Y};
pub use overrides::{CoordinateOverride, CoordinateOverrides, Offset};
pub use status::{derive_status, seat_status};
pub use position_index::{coordinate_key, PositionIndex, Rect};
pub use assignment::{apply_seat, apply_seats, fill_range};
pub use reconcile::{find_price_point, reconcile_plan, seat_color};
pub use pricing::{PricePoints, PricingError};
pub use editor::{PointerEvent, SeatMapEditor};
pub use layout::{group_sections, section_extent, SectionGroup};
pub use distribution::{format_currency, price_distribution, PriceDistribution};

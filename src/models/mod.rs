pub mod theater;
pub mod seat_plan;
pub mod price_point;
pub mod scenario;

pub use theater::Theater;
pub use seat_plan::{Row, Seat, SeatAttributes, SeatPlan, SeatRef, SeatStatus, Section};
pub use price_point::PricePoint;
pub use scenario::{Scenario, ScenarioDraft, ScenarioSummary};

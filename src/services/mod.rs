pub mod assignments;
pub mod seat_plans;

pub use assignments::{assign_seats, AssignSeatsRequest, SeatRange};
pub use seat_plans::{ScenarioUpdate, SeatPlanRepository, StoredScenario};

pub mod api;
pub mod core;
pub mod store;

pub use self::core::{Frequency, Mortgage, Plan, PlanUpdate};
pub use self::store::PlanStore;

pub mod calc;
mod normalize;
mod reducer;
mod types;

pub use self::normalize::normalize;
pub use self::reducer::{MortgageField, PlanUpdate, apply, fresh_item_id};
pub use self::types::{
    Frequency, LineItem, MORTGAGE_EXPENSE_ID, Mortgage, Plan, SavingsItem, SavingsKind,
};

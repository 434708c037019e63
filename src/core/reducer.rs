//! Pure plan-update reducer.
//!
//! Edits arrive as [`PlanUpdate`] values and are applied to an immutable
//! snapshot, producing a new plan. This keeps every field-scoped mutation
//! testable with no rendering layer attached.

use uuid::Uuid;

use super::types::{LineItem, MORTGAGE_EXPENSE_ID, Plan, SavingsItem, SavingsKind};

#[derive(Clone, Debug, PartialEq)]
pub enum PlanUpdate {
    IncomeName { id: String, name: String },
    IncomeAmount { id: String, amount: f64 },
    AddIncome { id: String },
    RemoveIncome { id: String },
    ExpenseName { id: String, name: String },
    ExpenseAmount { id: String, amount: f64 },
    AddExpense { id: String },
    RemoveExpense { id: String },
    SavingsName { id: String, name: String },
    SavingsAmount { id: String, amount: f64 },
    SavingsKindTag { id: String, kind: SavingsKind },
    AddSavings { id: String },
    RemoveSavings { id: String },
    SavingsYears { years: f64 },
    Mortgage { field: MortgageField, value: f64 },
}

/// User-editable mortgage fields. `newMortgage` is deliberately absent: it
/// is derived from `future` and `downPayment` and never set directly.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MortgageField {
    Current,
    Future,
    DownPayment,
    MonthlyTax,
    MonthlyInsurance,
    MonthlyHoa,
    InterestRate,
    FinancingYears,
}

/// Mints a list-entry id. Ids are assigned once at creation and never
/// reused; uuids keep them unique across the life of the record.
pub fn fresh_item_id(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4())
}

/// Applies one field-scoped update, returning the new plan.
pub fn apply(plan: &Plan, update: PlanUpdate) -> Plan {
    let mut next = plan.clone();
    match update {
        PlanUpdate::IncomeName { id, name } => {
            rename_item(&mut next.income, &id, name);
        }
        PlanUpdate::IncomeAmount { id, amount } => {
            set_item_amount(&mut next.income, &id, amount);
        }
        PlanUpdate::AddIncome { id } => {
            add_line_item(&mut next.income, id, "");
        }
        PlanUpdate::RemoveIncome { id } => {
            next.income.retain(|item| item.id != id);
        }
        PlanUpdate::ExpenseName { id, name } => {
            // The mortgage entry's name is fixed downstream of the derived
            // amount; edits to it are ignored.
            if id != MORTGAGE_EXPENSE_ID {
                rename_item(&mut next.expenses, &id, name);
            }
        }
        PlanUpdate::ExpenseAmount { id, amount } => {
            set_item_amount(&mut next.expenses, &id, amount);
        }
        PlanUpdate::AddExpense { id } => {
            add_line_item(&mut next.expenses, id, "New Expense");
        }
        PlanUpdate::RemoveExpense { id } => {
            next.expenses.retain(|item| item.id != id);
        }
        PlanUpdate::SavingsName { id, name } => {
            if let Some(item) = next.savings.iter_mut().find(|item| item.id == id) {
                item.name = name;
            }
        }
        PlanUpdate::SavingsAmount { id, amount } => {
            if let Some(item) = next.savings.iter_mut().find(|item| item.id == id) {
                item.amount = amount;
            }
        }
        PlanUpdate::SavingsKindTag { id, kind } => {
            if let Some(item) = next.savings.iter_mut().find(|item| item.id == id) {
                item.kind = kind;
            }
        }
        PlanUpdate::AddSavings { id } => {
            if !next.savings.iter().any(|item| item.id == id) {
                next.savings.push(SavingsItem {
                    id,
                    name: String::new(),
                    amount: 0.0,
                    kind: SavingsKind::Total,
                });
            }
        }
        PlanUpdate::RemoveSavings { id } => {
            next.savings.retain(|item| item.id != id);
        }
        PlanUpdate::SavingsYears { years } => {
            next.savings_years = years;
        }
        PlanUpdate::Mortgage { field, value } => {
            set_mortgage_field(&mut next, field, value);
        }
    }
    next
}

fn rename_item(items: &mut [LineItem], id: &str, name: String) {
    if let Some(item) = items.iter_mut().find(|item| item.id == id) {
        item.name = name;
    }
}

fn set_item_amount(items: &mut [LineItem], id: &str, amount: f64) {
    if let Some(item) = items.iter_mut().find(|item| item.id == id) {
        item.amount = amount;
    }
}

fn add_line_item(items: &mut Vec<LineItem>, id: String, name: &str) {
    // A taken id means the caller raced itself; the update is dropped rather
    // than violating id uniqueness.
    if !items.iter().any(|item| item.id == id) {
        items.push(LineItem {
            id,
            name: name.to_string(),
            amount: 0.0,
        });
    }
}

fn set_mortgage_field(plan: &mut Plan, field: MortgageField, value: f64) {
    let mortgage = &mut plan.mortgage;
    match field {
        MortgageField::Current => mortgage.current = value,
        MortgageField::Future => mortgage.future = value,
        MortgageField::DownPayment => mortgage.down_payment = value,
        MortgageField::MonthlyTax => mortgage.monthly_tax = value,
        MortgageField::MonthlyInsurance => mortgage.monthly_insurance = value,
        MortgageField::MonthlyHoa => mortgage.monthly_hoa = value,
        MortgageField::InterestRate => mortgage.interest_rate = value,
        MortgageField::FinancingYears => mortgage.financing_years = value,
    }
    if matches!(field, MortgageField::Future | MortgageField::DownPayment) {
        mortgage.new_mortgage = (mortgage.future - mortgage.down_payment).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::normalize::normalize;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
    use serde_json::json;

    fn base_plan() -> Plan {
        normalize(&json!({}))
    }

    #[test]
    fn income_amount_edit_targets_entry_by_id() {
        let plan = base_plan();
        let next = apply(
            &plan,
            PlanUpdate::IncomeAmount {
                id: "polly".to_string(),
                amount: 1_400.0,
            },
        );
        assert_eq!(next.income[1].amount, 1_400.0);
        assert_eq!(next.income[0].amount, 0.0);
        // Input plan is untouched.
        assert_eq!(plan.income[1].amount, 0.0);
    }

    #[test]
    fn mortgage_expense_name_is_not_editable() {
        let plan = base_plan();
        let next = apply(
            &plan,
            PlanUpdate::ExpenseName {
                id: MORTGAGE_EXPENSE_ID.to_string(),
                name: "Rent".to_string(),
            },
        );
        assert_eq!(next.expenses[0].name, "Mortgage");

        let next = apply(
            &plan,
            PlanUpdate::ExpenseName {
                id: "food".to_string(),
                name: "Groceries".to_string(),
            },
        );
        assert_eq!(next.expenses[1].name, "Groceries");
    }

    #[test]
    fn add_and_remove_keep_ids_unique() {
        let plan = base_plan();
        let next = apply(
            &plan,
            PlanUpdate::AddExpense {
                id: "streaming".to_string(),
            },
        );
        assert_eq!(next.expenses.len(), 11);
        assert_eq!(next.expenses.last().unwrap().name, "New Expense");

        // Re-adding a taken id is a no-op.
        let again = apply(
            &next,
            PlanUpdate::AddExpense {
                id: "streaming".to_string(),
            },
        );
        assert_eq!(again.expenses.len(), 11);

        let removed = apply(
            &again,
            PlanUpdate::RemoveExpense {
                id: "streaming".to_string(),
            },
        );
        assert_eq!(removed.expenses.len(), 10);
    }

    #[test]
    fn savings_kind_edit() {
        let plan = base_plan();
        let next = apply(
            &plan,
            PlanUpdate::SavingsKindTag {
                id: "pollySS".to_string(),
                kind: SavingsKind::Annual,
            },
        );
        assert_eq!(next.savings[0].kind, SavingsKind::Annual);
    }

    #[test]
    fn fresh_item_ids_carry_prefix_and_differ() {
        let a = fresh_item_id("income");
        let b = fresh_item_id("income");
        assert!(a.starts_with("income_"));
        assert_ne!(a, b);
    }

    proptest! {
        #[test]
        fn new_mortgage_tracks_future_minus_down_payment(
            future in 0.0f64..2_000_000.0,
            down_payment in 0.0f64..2_000_000.0,
        ) {
            let plan = base_plan();
            let next = apply(
                &plan,
                PlanUpdate::Mortgage { field: MortgageField::Future, value: future },
            );
            let next = apply(
                &next,
                PlanUpdate::Mortgage { field: MortgageField::DownPayment, value: down_payment },
            );
            prop_assert_eq!(next.mortgage.new_mortgage, (future - down_payment).max(0.0));
            prop_assert!(next.mortgage.new_mortgage >= 0.0);

            // Same result regardless of edit order.
            let other = apply(
                &plan,
                PlanUpdate::Mortgage { field: MortgageField::DownPayment, value: down_payment },
            );
            let other = apply(
                &other,
                PlanUpdate::Mortgage { field: MortgageField::Future, value: future },
            );
            prop_assert_eq!(other.mortgage.new_mortgage, next.mortgage.new_mortgage);
        }

        #[test]
        fn non_derived_mortgage_edits_leave_new_mortgage_alone(rate in 0.0f64..20.0) {
            let plan = base_plan();
            let next = apply(
                &plan,
                PlanUpdate::Mortgage { field: MortgageField::InterestRate, value: rate },
            );
            prop_assert_eq!(next.mortgage.new_mortgage, plan.mortgage.new_mortgage);
        }
    }
}

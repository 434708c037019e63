//! Mortgage amortization figures and aggregate plan totals.
//!
//! Everything here is pure and stateless: each function reads the current
//! mortgage sub-record or line-item lists and produces a number. Inputs are
//! tiny, so figures are recomputed from scratch on every call.

use super::types::{Frequency, LineItem, MORTGAGE_EXPENSE_ID, Mortgage, Plan, SavingsItem, SavingsKind};

const MONTHS_PER_YEAR: f64 = 12.0;

fn monthly_rate(mortgage: &Mortgage) -> f64 {
    mortgage.interest_rate / 100.0 / MONTHS_PER_YEAR
}

fn payment_count(mortgage: &Mortgage) -> f64 {
    mortgage.financing_years * MONTHS_PER_YEAR
}

/// Fixed-rate amortized monthly payment on the new mortgage principal.
///
/// A financing period of zero months yields a payment of 0 rather than a
/// division by zero: with no payment schedule there is nothing to amortize.
pub fn monthly_payment(mortgage: &Mortgage) -> f64 {
    let principal = mortgage.new_mortgage;
    let rate = monthly_rate(mortgage);
    let payments = payment_count(mortgage);

    if payments <= 0.0 {
        return 0.0;
    }
    if rate == 0.0 {
        return principal / payments;
    }

    let growth = (1.0 + rate).powf(payments);
    principal * rate * growth / (growth - 1.0)
}

/// Monthly payment plus tax, insurance and HOA.
pub fn total_monthly_cost(mortgage: &Mortgage) -> f64 {
    monthly_payment(mortgage)
        + mortgage.monthly_tax
        + mortgage.monthly_insurance
        + mortgage.monthly_hoa
}

pub fn total_loan_cost(mortgage: &Mortgage) -> f64 {
    total_monthly_cost(mortgage) * payment_count(mortgage)
}

pub fn total_interest(mortgage: &Mortgage) -> f64 {
    total_loan_cost(mortgage) - mortgage.new_mortgage
}

/// Current-period interest assuming the full principal remains outstanding.
///
/// This is a deliberate flat approximation: it does not amortize principal
/// over time, so every period reports the same figure rather than a true
/// declining-balance schedule.
pub fn monthly_interest(mortgage: &Mortgage) -> f64 {
    mortgage.new_mortgage * monthly_rate(mortgage)
}

pub fn monthly_principal(mortgage: &Mortgage) -> f64 {
    monthly_payment(mortgage) - monthly_interest(mortgage)
}

/// Income total at the selected display frequency. Amounts are stored as
/// monthly figures; annual mode reports `amount * 12`.
pub fn income_total(income: &[LineItem], frequency: Frequency) -> f64 {
    let monthly: f64 = income.iter().map(|item| item.amount).sum();
    match frequency {
        Frequency::Monthly => monthly,
        Frequency::Annual => monthly * MONTHS_PER_YEAR,
    }
}

/// Frequency-independent monthly income, used by the dashboard cash-flow
/// indicator regardless of the display mode.
pub fn monthly_income_total(income: &[LineItem]) -> f64 {
    income.iter().map(|item| item.amount).sum()
}

/// Monthly expense total. The `mortgage` entry's user-entered amount is
/// always ignored in favor of the derived total monthly mortgage cost.
pub fn monthly_expense_total(expenses: &[LineItem], mortgage: &Mortgage) -> f64 {
    expenses
        .iter()
        .map(|item| {
            if item.id == MORTGAGE_EXPENSE_ID {
                total_monthly_cost(mortgage)
            } else {
                item.amount
            }
        })
        .sum()
}

/// Expense total at the selected display frequency (mortgage-adjusted).
pub fn expense_total(expenses: &[LineItem], mortgage: &Mortgage, frequency: Frequency) -> f64 {
    let monthly = monthly_expense_total(expenses, mortgage);
    match frequency {
        Frequency::Monthly => monthly,
        Frequency::Annual => monthly * MONTHS_PER_YEAR,
    }
}

/// One year of savings: `annual`-kind entries are monthly contributions and
/// annualize to `amount * 12`; `total`-kind entries contribute unchanged.
pub fn savings_total(savings: &[SavingsItem]) -> f64 {
    savings
        .iter()
        .map(|item| match item.kind {
            SavingsKind::Annual => item.amount * MONTHS_PER_YEAR,
            SavingsKind::Total => item.amount,
        })
        .sum()
}

pub fn projected_savings(savings: &[SavingsItem], savings_years: f64) -> f64 {
    savings_total(savings) * savings_years
}

/// Monthly income minus mortgage-adjusted monthly expenses.
pub fn monthly_balance(plan: &Plan) -> f64 {
    monthly_income_total(&plan.income) - monthly_expense_total(&plan.expenses, &plan.mortgage)
}

/// Income minus expenses with both sides at the same display frequency.
pub fn balance(plan: &Plan, frequency: Frequency) -> f64 {
    income_total(&plan.income, frequency)
        - expense_total(&plan.expenses, &plan.mortgage, frequency)
}

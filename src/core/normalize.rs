//! Upgrades a possibly-legacy-shaped persisted plan document to the current
//! canonical [`Plan`] shape.
//!
//! `normalize` is a total function: missing or malformed fields resolve to
//! defaults, never to errors. Older documents may carry `income`/`expenses`
//! as a fixed-key object instead of a list, and the mortgage record may use
//! the legacy field names `propertyTax`/`insurance` (annual amounts) and
//! `hoa` (already monthly) instead of `monthlyTax`/`monthlyInsurance`/
//! `monthlyHOA`.

use serde_json::{Map, Value};

use super::types::{LineItem, Mortgage, Plan, SavingsItem, SavingsKind};

/// Canonical income entries substituted when the field is absent, empty, or
/// converted from the legacy keyed shape.
const INCOME_DEFAULTS: &[(&str, &str)] = &[
    ("onelio", "Onelio Social Security (Age 70)"),
    ("polly", "Polly Social Security (Age 62)"),
    ("pension", "Pension"),
];

const EXPENSE_DEFAULTS: &[(&str, &str)] = &[
    ("mortgage", "Mortgage"),
    ("food", "Food"),
    ("gas", "Gas"),
    ("utilities", "Utilities"),
    ("healthIns", "Health Insurance"),
    ("houseMaint", "House Maintenance"),
    ("carMaint", "Car Maintenance"),
    ("internet", "Internet"),
    ("cellphone", "Cell Phone"),
    ("carIns", "Car Insurance"),
];

const SAVINGS_DEFAULTS: &[(&str, &str, SavingsKind)] = &[
    ("pollySS", "Polly SS Savings Total", SavingsKind::Total),
    ("k401", "401K Monthly Contribution", SavingsKind::Annual),
    ("synchrony", "Synchrony Account", SavingsKind::Total),
];

/// Produces a fully-populated current-shape plan from a loose document.
pub fn normalize(raw: &Value) -> Plan {
    let empty = Map::new();
    let doc = raw.as_object().unwrap_or(&empty);

    Plan {
        income: normalize_line_items(doc.get("income"), INCOME_DEFAULTS),
        expenses: normalize_line_items(doc.get("expenses"), EXPENSE_DEFAULTS),
        savings: normalize_savings(doc.get("savings")),
        savings_years: truthy_or(field_num(doc, "savingsYears"), 1.0),
        mortgage: normalize_mortgage(doc.get("mortgage")),
    }
}

/// Numeric read with malformed values coercing to 0.
fn num(value: &Value) -> f64 {
    value.as_f64().filter(|n| n.is_finite()).unwrap_or(0.0)
}

fn field_num(obj: &Map<String, Value>, key: &str) -> f64 {
    obj.get(key).map(num).unwrap_or(0.0)
}

fn field_str<'a>(obj: &'a Map<String, Value>, key: &str) -> &'a str {
    obj.get(key).and_then(Value::as_str).unwrap_or("")
}

fn truthy(n: f64) -> bool {
    n != 0.0
}

fn truthy_or(n: f64, default: f64) -> f64 {
    if truthy(n) { n } else { default }
}

fn normalize_line_items(value: Option<&Value>, defaults: &[(&str, &str)]) -> Vec<LineItem> {
    match value {
        // Non-empty lists are trusted as-is, with lenient per-field reads.
        Some(Value::Array(items)) if !items.is_empty() => {
            items.iter().map(line_item_from).collect()
        }
        // Legacy keyed shape: each known key becomes its canonical entry
        // carrying that key's value; unknown keys are dropped.
        Some(Value::Object(map)) => defaults
            .iter()
            .map(|(id, name)| LineItem {
                id: (*id).to_string(),
                name: (*name).to_string(),
                amount: field_num(map, id),
            })
            .collect(),
        _ => defaults
            .iter()
            .map(|(id, name)| LineItem {
                id: (*id).to_string(),
                name: (*name).to_string(),
                amount: 0.0,
            })
            .collect(),
    }
}

fn line_item_from(value: &Value) -> LineItem {
    let empty = Map::new();
    let obj = value.as_object().unwrap_or(&empty);
    LineItem {
        id: field_str(obj, "id").to_string(),
        name: field_str(obj, "name").to_string(),
        amount: field_num(obj, "amount"),
    }
}

fn normalize_savings(value: Option<&Value>) -> Vec<SavingsItem> {
    match value {
        Some(Value::Array(items)) if !items.is_empty() => {
            items.iter().map(savings_item_from).collect()
        }
        // Absent, empty, or the pre-list format: substitute the defaults.
        _ => SAVINGS_DEFAULTS
            .iter()
            .map(|(id, name, kind)| SavingsItem {
                id: (*id).to_string(),
                name: (*name).to_string(),
                amount: 0.0,
                kind: *kind,
            })
            .collect(),
    }
}

fn savings_item_from(value: &Value) -> SavingsItem {
    let empty = Map::new();
    let obj = value.as_object().unwrap_or(&empty);
    let kind_tag = obj
        .get("type")
        .or_else(|| obj.get("kind"))
        .and_then(Value::as_str)
        .unwrap_or("");
    SavingsItem {
        id: field_str(obj, "id").to_string(),
        name: field_str(obj, "name").to_string(),
        amount: field_num(obj, "amount"),
        kind: if kind_tag == "annual" {
            SavingsKind::Annual
        } else {
            SavingsKind::Total
        },
    }
}

fn normalize_mortgage(value: Option<&Value>) -> Mortgage {
    let Some(obj) = value.and_then(Value::as_object) else {
        return Mortgage::zeroed();
    };

    // Legacy migration runs before default fills, and only when the target
    // field is not already truthy. A stored 0 is indistinguishable from
    // absent under these semantics; that precedence is preserved exactly.
    let mut monthly_tax = field_num(obj, "monthlyTax");
    if !truthy(monthly_tax) && obj.contains_key("propertyTax") {
        // Legacy propertyTax held an annual amount.
        monthly_tax = field_num(obj, "propertyTax") / 12.0;
    }

    let mut monthly_insurance = field_num(obj, "monthlyInsurance");
    if !truthy(monthly_insurance) && obj.contains_key("insurance") {
        monthly_insurance = field_num(obj, "insurance") / 12.0;
    }

    let mut monthly_hoa = field_num(obj, "monthlyHOA");
    if !truthy(monthly_hoa) && obj.contains_key("hoa") {
        // Legacy hoa was already monthly; no division.
        monthly_hoa = field_num(obj, "hoa");
    }

    Mortgage {
        current: field_num(obj, "current"),
        future: field_num(obj, "future"),
        down_payment: field_num(obj, "downPayment"),
        new_mortgage: field_num(obj, "newMortgage"),
        monthly_tax,
        monthly_insurance,
        monthly_hoa,
        interest_rate: field_num(obj, "interestRate"),
        financing_years: truthy_or(field_num(obj, "financingYears"), 30.0),
    }
}

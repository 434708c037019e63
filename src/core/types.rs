use serde::{Deserialize, Serialize};

/// Id of the expense entry whose displayed amount is derived from the
/// mortgage calculator rather than entered by the user.
pub const MORTGAGE_EXPENSE_ID: &str = "mortgage";

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SavingsKind {
    /// Amount is already a total balance.
    Total,
    /// Amount is a recurring monthly contribution, annualized when summed.
    Annual,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Monthly,
    Annual,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct LineItem {
    pub id: String,
    pub name: String,
    pub amount: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SavingsItem {
    pub id: String,
    pub name: String,
    pub amount: f64,
    // Persisted documents carry this field as "type".
    #[serde(rename = "type", alias = "kind")]
    pub kind: SavingsKind,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mortgage {
    pub current: f64,
    pub future: f64,
    pub down_payment: f64,
    /// Always `max(0, future - down_payment)`; maintained by the reducer,
    /// never edited directly.
    pub new_mortgage: f64,
    pub monthly_tax: f64,
    pub monthly_insurance: f64,
    #[serde(rename = "monthlyHOA")]
    pub monthly_hoa: f64,
    /// Annual rate in percent, e.g. 6 for 6%.
    pub interest_rate: f64,
    pub financing_years: f64,
}

impl Mortgage {
    pub fn zeroed() -> Self {
        Mortgage {
            current: 0.0,
            future: 0.0,
            down_payment: 0.0,
            new_mortgage: 0.0,
            monthly_tax: 0.0,
            monthly_insurance: 0.0,
            monthly_hoa: 0.0,
            interest_rate: 0.0,
            financing_years: 30.0,
        }
    }
}

/// The single persisted household plan, in its current canonical shape.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub income: Vec<LineItem>,
    pub expenses: Vec<LineItem>,
    pub savings: Vec<SavingsItem>,
    pub savings_years: f64,
    pub mortgage: Mortgage,
}

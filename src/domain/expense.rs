use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A dated money movement. Negative amounts are spending, everything else
/// (zero included) counts as income.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub owner: String,
    pub title: String,
    pub amount: f64,
    pub category: Option<String>,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    pub fn is_income(&self) -> bool {
        self.amount >= 0.0
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateExpense {
    pub title: String,
    pub amount: f64,
    #[serde(default)]
    pub category: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateExpense {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Inclusive date bounds for listing; either side may be open.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseQuery {
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl ExpenseQuery {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date.is_none_or(|start| date >= start)
            && self.end_date.is_none_or(|end| date <= end)
    }
}

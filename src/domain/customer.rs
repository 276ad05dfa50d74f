use serde::{Deserialize, Serialize};

use super::Cents;

pub type CustomerId = i64;

/// A person or business that buys on credit and pays back over time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    /// Unique across the ledger (exact, case-sensitive match)
    pub name: String,
}

/// One row of the customer list: the customer plus their running total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub id: CustomerId,
    pub name: String,
    /// Sum of all transaction amounts, zero when there are none
    pub total: Cents,
}

/// Normalize a user-entered customer name. Returns `None` when nothing is left.
pub fn normalize_name(name: &str) -> Option<&str> {
    let trimmed = name.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

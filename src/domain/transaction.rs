use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Cents, CustomerId};

pub type TransactionId = i64;

/// Canonical on-disk date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// The customer takes goods on credit; the amount owed grows
    Buy,
    /// The customer pays back; the amount owed shrinks
    Pay,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Buy => "buy",
            TransactionKind::Pay => "pay",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "buy" => Some(TransactionKind::Buy),
            "pay" => Some(TransactionKind::Pay),
            _ => None,
        }
    }

    /// Apply this kind's sign to an unsigned amount.
    pub fn signed(&self, amount_cents: Cents) -> Cents {
        match self {
            TransactionKind::Buy => amount_cents,
            TransactionKind::Pay => -amount_cents,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single buy or pay entry on a customer's account.
/// Transactions are never edited; a mistake is fixed by deleting and re-entering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub customer_id: CustomerId,
    pub date: NaiveDate,
    pub description: String,
    /// Signed: positive for buy, negative for pay
    pub amount_cents: Cents,
    pub kind: TransactionKind,
}

impl Transaction {
    /// Date rendered in the canonical `YYYY-MM-DD` form.
    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Cents, Transaction, format_amount};

/// Compute a customer's running total from their transactions.
/// Amounts are already signed, so the total is a plain sum. It saturates
/// instead of wrapping; the service keeps stored totals inside `Cents`.
pub fn compute_total(transactions: &[Transaction]) -> Cents {
    transactions
        .iter()
        .fold(0, |total: Cents, t| total.saturating_add(t.amount_cents))
}

/// Wording for a running total, chosen by its sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "amount", rename_all = "lowercase")]
pub enum TotalStatus {
    /// The customer owes this much (total > 0)
    Owed(Cents),
    /// The customer has paid in advance by this much (total < 0)
    Credit(Cents),
    /// Nothing owed either way
    Settled,
}

impl TotalStatus {
    pub fn from_total(total: Cents) -> Self {
        match total {
            t if t > 0 => TotalStatus::Owed(t),
            t if t < 0 => TotalStatus::Credit(t.abs()),
            _ => TotalStatus::Settled,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TotalStatus::Owed(_) => "Amount owed",
            TotalStatus::Credit(_) => "Customer credit",
            TotalStatus::Settled => "Account settled",
        }
    }
}

impl fmt::Display for TotalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TotalStatus::Owed(amount) => write!(f, "{}: +{}", self.label(), format_amount(*amount)),
            TotalStatus::Credit(amount) => {
                write!(f, "{}: -{}", self.label(), format_amount(*amount))
            }
            TotalStatus::Settled => write!(f, "{}", self.label()),
        }
    }
}

/// A customer's transactions, newest first, with the total over all of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionList {
    pub transactions: Vec<Transaction>,
    pub total: Cents,
    pub status: TotalStatus,
}

impl TransactionList {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        let total = compute_total(&transactions);
        Self {
            transactions,
            total,
            status: TotalStatus::from_total(total),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::TransactionKind;

    fn tx(id: i64, amount_cents: Cents) -> Transaction {
        let kind = if amount_cents >= 0 {
            TransactionKind::Buy
        } else {
            TransactionKind::Pay
        };
        Transaction {
            id,
            customer_id: 1,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            description: "Bread".to_string(),
            amount_cents,
            kind,
        }
    }

    #[test]
    fn test_compute_total() {
        assert_eq!(compute_total(&[]), 0);
        assert_eq!(compute_total(&[tx(1, 10000), tx(2, -2500), tx(3, 150)]), 7650);
    }

    #[test]
    fn test_compute_total_does_not_wrap() {
        assert_eq!(compute_total(&[tx(1, Cents::MAX), tx(2, 1)]), Cents::MAX);
        assert_eq!(compute_total(&[tx(1, Cents::MIN), tx(2, -1)]), Cents::MIN);
    }

    #[test]
    fn test_total_status_branches() {
        assert_eq!(TotalStatus::from_total(123450), TotalStatus::Owed(123450));
        assert_eq!(TotalStatus::from_total(-123450), TotalStatus::Credit(123450));
        assert_eq!(TotalStatus::from_total(0), TotalStatus::Settled);
    }

    #[test]
    fn test_total_status_display() {
        assert_eq!(
            TotalStatus::from_total(123450).to_string(),
            "Amount owed: +1,234.50"
        );
        assert_eq!(
            TotalStatus::from_total(-123450).to_string(),
            "Customer credit: -1,234.50"
        );
        assert_eq!(TotalStatus::from_total(0).to_string(), "Account settled");
    }

    #[test]
    fn test_transaction_list_total_covers_all_rows() {
        let list = TransactionList::new(vec![tx(3, 500), tx(2, -200), tx(1, 1000)]);
        assert_eq!(list.total, 1300);
        assert_eq!(list.status, TotalStatus::Owed(1300));
        assert!(!list.is_empty());
    }
}

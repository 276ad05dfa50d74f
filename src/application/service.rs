use std::path::Path;

use anyhow::Context;
use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

use crate::domain::{
    Cents, Customer, CustomerId, CustomerSummary, DATE_FORMAT, Transaction, TransactionId,
    TransactionKind, TransactionList, normalize_name, parse_amount,
};
use crate::storage::Repository;

use super::AppError;

/// Application service providing the ledger operations.
/// This is the primary interface for any client (CLI, GUI, exporters).
pub struct LedgerService {
    repo: Repository,
}

impl LedgerService {
    /// Create a new ledger service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Open (or create) the ledger database at the given path.
    /// Missing parent directories are created; migrations are idempotent.
    pub async fn open(database_path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = database_path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory: {}", parent.display())
            })?;
        }
        let repo = Repository::init(path).await?;
        debug!(path = %path.display(), "opened ledger database");
        Ok(Self::new(repo))
    }

    /// Release the database connection.
    pub async fn close(self) {
        self.repo.close().await;
    }

    // ========================
    // Customer operations
    // ========================

    /// Create a new customer. The name is trimmed and must be unique.
    pub async fn add_customer(&self, name: &str) -> Result<CustomerId, AppError> {
        let name = normalize_name(name).ok_or(AppError::EmptyName)?;

        if self.repo.find_customer_by_name(name, None).await?.is_some() {
            warn!(name, "rejected duplicate customer name");
            return Err(AppError::DuplicateName(name.to_string()));
        }

        let id = self.repo.insert_customer(name).await?;
        debug!(id, name, "added customer");
        Ok(id)
    }

    /// Get a customer by ID.
    pub async fn get_customer(&self, id: CustomerId) -> Result<Customer, AppError> {
        self.repo
            .get_customer(id)
            .await?
            .ok_or(AppError::CustomerNotFound(id))
    }

    /// Rename a customer. Renaming to the current name is a successful no-op.
    pub async fn rename_customer(&self, id: CustomerId, new_name: &str) -> Result<(), AppError> {
        let new_name = normalize_name(new_name).ok_or(AppError::EmptyName)?;
        let customer = self.get_customer(id).await?;

        if customer.name == new_name {
            return Ok(());
        }

        if self
            .repo
            .find_customer_by_name(new_name, Some(id))
            .await?
            .is_some()
        {
            warn!(id, new_name, "rejected rename to an existing name");
            return Err(AppError::DuplicateName(new_name.to_string()));
        }

        if !self.repo.rename_customer(id, new_name).await? {
            return Err(AppError::CustomerNotFound(id));
        }
        debug!(id, old_name = %customer.name, new_name, "renamed customer");
        Ok(())
    }

    /// Delete a customer together with all of their transactions.
    pub async fn delete_customer(&self, id: CustomerId) -> Result<(), AppError> {
        if !self.repo.delete_customer(id).await? {
            return Err(AppError::CustomerNotFound(id));
        }
        debug!(id, "deleted customer and their transactions");
        Ok(())
    }

    /// List customers with their totals, most recently created first.
    /// A non-blank `filter` keeps only names containing it (case-sensitive).
    pub async fn list_customers(
        &self,
        filter: Option<&str>,
    ) -> Result<Vec<CustomerSummary>, AppError> {
        let filter = filter.map(str::trim).filter(|f| !f.is_empty());
        Ok(self.repo.list_customer_summaries(filter).await?)
    }

    /// Current running total for a customer.
    pub async fn customer_total(&self, id: CustomerId) -> Result<Cents, AppError> {
        self.get_customer(id).await?;
        Ok(self.repo.compute_total(id).await?)
    }

    // ========================
    // Transaction operations
    // ========================

    /// Record a buy or pay entry for a customer.
    ///
    /// `unsigned_amount` is user input such as "12.50" or "12,5"; it must be
    /// a positive number. The stored amount carries the sign of `kind`.
    pub async fn add_transaction(
        &self,
        customer_id: CustomerId,
        date: NaiveDate,
        description: &str,
        unsigned_amount: &str,
        kind: TransactionKind,
    ) -> Result<TransactionId, AppError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(AppError::EmptyDescription);
        }

        // Dates are stored and ordered as YYYY-MM-DD text
        if !(0..=9999).contains(&date.year()) {
            return Err(AppError::InvalidDate(date.to_string()));
        }

        let amount_cents = parse_amount(unsigned_amount).map_err(|e| {
            warn!(input = unsigned_amount, error = %e, "rejected transaction amount");
            AppError::InvalidAmount(format!("'{}': {}", unsigned_amount.trim(), e))
        })?;
        if amount_cents <= 0 {
            warn!(input = unsigned_amount, "rejected non-positive transaction amount");
            return Err(AppError::InvalidAmount(
                "Amount must be greater than zero".to_string(),
            ));
        }

        self.get_customer(customer_id).await?;

        let signed = kind.signed(amount_cents);
        let total = self.repo.compute_total(customer_id).await?;
        if total.checked_add(signed).is_none() {
            warn!(customer_id, total, amount_cents = signed, "rejected amount overflowing total");
            return Err(AppError::InvalidAmount(
                "Amount would overflow the customer's total".to_string(),
            ));
        }
        let id = self
            .repo
            .insert_transaction(customer_id, date, description, signed, kind)
            .await?;
        debug!(
            id,
            customer_id,
            date = %date.format(DATE_FORMAT),
            amount_cents = signed,
            kind = kind.as_str(),
            "added transaction"
        );
        Ok(id)
    }

    /// Get a transaction by ID.
    pub async fn get_transaction(&self, id: TransactionId) -> Result<Transaction, AppError> {
        self.repo
            .get_transaction(id)
            .await?
            .ok_or(AppError::TransactionNotFound(id))
    }

    /// Delete a single transaction.
    pub async fn delete_transaction(&self, id: TransactionId) -> Result<(), AppError> {
        if !self.repo.delete_transaction(id).await? {
            return Err(AppError::TransactionNotFound(id));
        }
        debug!(id, "deleted transaction");
        Ok(())
    }

    /// A customer's transactions for interactive viewing: newest date first,
    /// ties broken by newest ID. The total covers every transaction.
    ///
    /// An unknown customer yields an empty list, so a view can refresh after
    /// the customer has been deleted.
    pub async fn list_transactions(
        &self,
        customer_id: CustomerId,
    ) -> Result<TransactionList, AppError> {
        let transactions = self.repo.list_transactions_newest_first(customer_id).await?;
        Ok(TransactionList::new(transactions))
    }

    /// A customer's transactions for printing and export: oldest date first,
    /// ties broken by oldest ID. This is the reverse of `list_transactions`.
    pub async fn export_transactions(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Transaction>, AppError> {
        Ok(self
            .repo
            .list_transactions_chronological(customer_id)
            .await?)
    }
}

/// Parse a `YYYY-MM-DD` date as entered by a user.
pub fn parse_date(input: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| AppError::InvalidDate(input.to_string()))
}

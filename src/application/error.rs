use thiserror::Error;

use crate::domain::{CustomerId, TransactionId};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Customer name cannot be empty")]
    EmptyName,

    #[error("Transaction description cannot be empty")]
    EmptyDescription,

    #[error("Customer already exists: {0}")]
    DuplicateName(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Customer not found: {0}")]
    CustomerNotFound(CustomerId),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl AppError {
    /// Required input was missing or blank.
    pub fn is_empty_input(&self) -> bool {
        matches!(self, AppError::EmptyName | AppError::EmptyDescription)
    }

    /// The referenced customer or transaction does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AppError::CustomerNotFound(_) | AppError::TransactionNotFound(_)
        )
    }
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("no transactions to export")]
    NothingToExport,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use daftar::application::LedgerService;
use daftar::domain::{CustomerId, TransactionId, TransactionKind};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::open(&db_path).await?;
    Ok((service, temp_dir))
}

/// Helper to parse a date string into NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Record a purchase on credit
pub async fn buy(
    service: &LedgerService,
    customer: CustomerId,
    date: &str,
    description: &str,
    amount: &str,
) -> Result<TransactionId> {
    Ok(service
        .add_transaction(
            customer,
            parse_date(date),
            description,
            amount,
            TransactionKind::Buy,
        )
        .await?)
}

/// Record a payment
pub async fn pay(
    service: &LedgerService,
    customer: CustomerId,
    date: &str,
    description: &str,
    amount: &str,
) -> Result<TransactionId> {
    Ok(service
        .add_transaction(
            customer,
            parse_date(date),
            description,
            amount,
            TransactionKind::Pay,
        )
        .await?)
}

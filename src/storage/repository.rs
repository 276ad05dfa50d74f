use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use crate::domain::{
    Cents, Customer, CustomerId, CustomerSummary, DATE_FORMAT, Transaction, TransactionId,
    TransactionKind,
};

use super::MIGRATION_001_INITIAL;

/// Repository for persisting and querying customers and their transactions.
///
/// Every method is a single statement or a single SQL transaction, so each call
/// either commits completely or leaves the database untouched.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to the SQLite database file at `path`.
    /// Creates the file if it doesn't exist and enforces foreign keys.
    pub async fn connect(path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);

        // One owner, one connection: operations are strictly sequential.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a database (connect + migrate).
    pub async fn init(path: &Path) -> Result<Self> {
        let repo = Self::connect(path).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Close the pool, waiting for the connection to be released.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    // ========================
    // Customer operations
    // ========================

    /// Insert a customer and return its assigned ID.
    pub async fn insert_customer(&self, name: &str) -> Result<CustomerId> {
        let result = sqlx::query("INSERT INTO customers (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await
            .context("Failed to save customer")?;
        Ok(result.last_insert_rowid())
    }

    /// Get a customer by ID.
    pub async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>> {
        let row = sqlx::query("SELECT id, name FROM customers WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch customer")?;

        Ok(row.map(|row| Customer {
            id: row.get("id"),
            name: row.get("name"),
        }))
    }

    /// Find the ID of a customer with exactly this name, ignoring `excluding`.
    pub async fn find_customer_by_name(
        &self,
        name: &str,
        excluding: Option<CustomerId>,
    ) -> Result<Option<CustomerId>> {
        let row = match excluding {
            Some(id) => {
                sqlx::query("SELECT id FROM customers WHERE name = ? AND id != ?")
                    .bind(name)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await
            }
            None => {
                sqlx::query("SELECT id FROM customers WHERE name = ?")
                    .bind(name)
                    .fetch_optional(&self.pool)
                    .await
            }
        }
        .context("Failed to fetch customer by name")?;

        Ok(row.map(|row| row.get("id")))
    }

    /// Change a customer's name. Returns false if no such customer exists.
    pub async fn rename_customer(&self, id: CustomerId, name: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE customers SET name = ? WHERE id = ?")
            .bind(name)
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to rename customer")?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a customer and all of their transactions in one SQL transaction.
    /// Returns false (and changes nothing) if no such customer exists.
    pub async fn delete_customer(&self, id: CustomerId) -> Result<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        sqlx::query("DELETE FROM transactions WHERE customer_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete customer transactions")?;

        let result = sqlx::query("DELETE FROM customers WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete customer")?;

        if result.rows_affected() == 0 {
            tx.rollback().await.context("Failed to roll back")?;
            return Ok(false);
        }

        tx.commit().await.context("Failed to commit customer deletion")?;
        Ok(true)
    }

    /// List customers with their totals, most recently created first.
    /// `filter` is a case-sensitive substring of the name.
    pub async fn list_customer_summaries(
        &self,
        filter: Option<&str>,
    ) -> Result<Vec<CustomerSummary>> {
        let mut query = String::from(
            r#"
            SELECT c.id, c.name, COALESCE(SUM(t.amount_cents), 0) AS total
            FROM customers c
            LEFT JOIN transactions t ON t.customer_id = c.id
            "#,
        );

        // instr() is case-sensitive, unlike LIKE
        if filter.is_some() {
            query.push_str(" WHERE instr(c.name, ?) > 0");
        }
        query.push_str(" GROUP BY c.id, c.name ORDER BY c.id DESC");

        let mut sql_query = sqlx::query(&query);
        if let Some(text) = filter {
            sql_query = sql_query.bind(text);
        }

        let rows = sql_query
            .fetch_all(&self.pool)
            .await
            .context("Failed to list customers")?;

        Ok(rows
            .iter()
            .map(|row| CustomerSummary {
                id: row.get("id"),
                name: row.get("name"),
                total: row.get("total"),
            })
            .collect())
    }

    /// Sum of a customer's transaction amounts (zero when there are none).
    pub async fn compute_total(&self, customer_id: CustomerId) -> Result<Cents> {
        let row = sqlx::query(
            "SELECT COALESCE(SUM(amount_cents), 0) AS total FROM transactions WHERE customer_id = ?",
        )
        .bind(customer_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to compute total")?;

        Ok(row.get("total"))
    }

    // ========================
    // Transaction operations
    // ========================

    /// Insert a transaction and return its assigned ID.
    /// `amount_cents` must already carry the sign of `kind`.
    pub async fn insert_transaction(
        &self,
        customer_id: CustomerId,
        date: NaiveDate,
        description: &str,
        amount_cents: Cents,
        kind: TransactionKind,
    ) -> Result<TransactionId> {
        let result = sqlx::query(
            r#"
            INSERT INTO transactions (customer_id, date, description, amount_cents, kind)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(customer_id)
        .bind(date.format(DATE_FORMAT).to_string())
        .bind(description)
        .bind(amount_cents)
        .bind(kind.as_str())
        .execute(&self.pool)
        .await
        .context("Failed to save transaction")?;

        Ok(result.last_insert_rowid())
    }

    /// Delete a transaction. Returns false if no such transaction exists.
    pub async fn delete_transaction(&self, id: TransactionId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete transaction")?;
        Ok(result.rows_affected() > 0)
    }

    /// Get a transaction by ID.
    pub async fn get_transaction(&self, id: TransactionId) -> Result<Option<Transaction>> {
        let row = sqlx::query(
            r#"
            SELECT id, customer_id, date, description, amount_cents, kind
            FROM transactions
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch transaction")?;

        row.as_ref().map(Self::row_to_transaction).transpose()
    }

    /// A customer's transactions, newest first (date desc, then id desc).
    pub async fn list_transactions_newest_first(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(
            r#"
            SELECT id, customer_id, date, description, amount_cents, kind
            FROM transactions
            WHERE customer_id = ?
            ORDER BY date DESC, id DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list transactions")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    /// A customer's transactions in chronological order (date asc, then id asc).
    pub async fn list_transactions_chronological(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(
            r#"
            SELECT id, customer_id, date, description, amount_cents, kind
            FROM transactions
            WHERE customer_id = ?
            ORDER BY date ASC, id ASC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list transactions for export")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    fn row_to_transaction(row: &SqliteRow) -> Result<Transaction> {
        let date_str: String = row.get("date");
        let kind_str: String = row.get("kind");

        Ok(Transaction {
            id: row.get("id"),
            customer_id: row.get("customer_id"),
            date: NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
                .with_context(|| format!("Invalid transaction date: {}", date_str))?,
            description: row.get("description"),
            amount_cents: row.get("amount_cents"),
            kind: TransactionKind::from_str(&kind_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid transaction kind: {}", kind_str))?,
        })
    }
}

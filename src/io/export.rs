use std::io::Write;

use serde::Serialize;
use tracing::debug;

use crate::application::{AppError, ExportError, LedgerService};
use crate::domain::{
    Cents, CustomerId, Transaction, compute_total, format_plain, format_statement_amount,
};

/// Column headers of the CSV export, in order.
pub const CSV_HEADER: [&str; 4] = ["date", "description", "amount", "kind"];

/// One printed line of an account statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementRow {
    /// Rendered as "YYYY / MM / DD"
    pub date: String,
    pub description: String,
    pub amount: String,
    pub kind: String,
}

/// A customer's account statement: every transaction in chronological order
/// followed by the total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    pub title: String,
    pub customer_name: String,
    pub rows: Vec<StatementRow>,
    pub total: Cents,
    pub total_display: String,
}

/// Exporter for turning a customer's ledger into files for printing or sharing
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export a customer's transactions to CSV, oldest first.
    /// Returns the number of rows written (header excluded).
    pub async fn export_csv<W: Write>(
        &self,
        customer_id: CustomerId,
        writer: W,
    ) -> Result<usize, AppError> {
        let transactions = self.exportable_transactions(customer_id).await?;
        let count = write_csv(&transactions, writer)?;
        debug!(customer_id, count, "exported transactions to csv");
        Ok(count)
    }

    /// Build the account statement for a customer.
    pub async fn statement(&self, customer_id: CustomerId) -> Result<Statement, AppError> {
        let customer = self.service.get_customer(customer_id).await?;
        let transactions = self.exportable_transactions(customer_id).await?;
        Ok(build_statement(&customer.name, &transactions))
    }

    /// Render the account statement as a plain-text table.
    pub async fn write_statement<W: Write>(
        &self,
        customer_id: CustomerId,
        mut writer: W,
    ) -> Result<Statement, AppError> {
        let statement = self.statement(customer_id).await?;
        render_statement(&statement, &mut writer).map_err(ExportError::from)?;
        debug!(customer_id, rows = statement.rows.len(), "wrote account statement");
        Ok(statement)
    }

    async fn exportable_transactions(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Transaction>, AppError> {
        self.service.get_customer(customer_id).await?;
        let transactions = self.service.export_transactions(customer_id).await?;
        if transactions.is_empty() {
            return Err(ExportError::NothingToExport.into());
        }
        Ok(transactions)
    }
}

/// Write transactions as CSV with the fixed `date,description,amount,kind` layout.
pub fn write_csv<W: Write>(transactions: &[Transaction], writer: W) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADER)?;

    for transaction in transactions {
        csv_writer.write_record([
            transaction.date_string().as_str(),
            transaction.description.as_str(),
            format_plain(transaction.amount_cents).as_str(),
            transaction.kind.as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(transactions.len())
}

pub fn build_statement(customer_name: &str, transactions: &[Transaction]) -> Statement {
    let rows = transactions
        .iter()
        .map(|t| StatementRow {
            date: t.date.format("%Y / %m / %d").to_string(),
            description: t.description.clone(),
            amount: format_statement_amount(t.amount_cents),
            kind: t.kind.as_str().to_string(),
        })
        .collect();
    let total = compute_total(transactions);

    Statement {
        title: format!("Account statement - {}", customer_name),
        customer_name: customer_name.to_string(),
        rows,
        total,
        total_display: format_statement_amount(total),
    }
}

pub fn render_statement<W: Write>(statement: &Statement, writer: &mut W) -> std::io::Result<()> {
    const HEADERS: [&str; 4] = ["Date", "Description", "Amount", "Kind"];
    const TOTAL_LABEL: &str = "Account total";

    let mut widths = HEADERS.map(str::len);
    for row in &statement.rows {
        let cells = [&row.date, &row.description, &row.amount, &row.kind];
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }
    widths[1] = widths[1].max(TOTAL_LABEL.len());
    widths[2] = widths[2].max(statement.total_display.len());

    let rule = widths
        .iter()
        .map(|w| "-".repeat(w + 2))
        .collect::<Vec<_>>()
        .join("+");

    writeln!(writer, "{}", statement.title)?;
    writeln!(writer)?;
    write_line(writer, &widths, HEADERS)?;
    writeln!(writer, "{}", rule)?;
    for row in &statement.rows {
        write_line(
            writer,
            &widths,
            [&row.date, &row.description, &row.amount, &row.kind],
        )?;
    }
    writeln!(writer, "{}", rule)?;
    write_line(
        writer,
        &widths,
        ["", TOTAL_LABEL, statement.total_display.as_str(), ""],
    )?;
    writer.flush()
}

fn write_line<W: Write, S: AsRef<str>>(
    writer: &mut W,
    widths: &[usize; 4],
    cells: [S; 4],
) -> std::io::Result<()> {
    let line = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, width))| {
            // amounts right-aligned
            if i == 2 {
                format!(" {:>width$} ", cell.as_ref(), width = *width)
            } else {
                format!(" {:<width$} ", cell.as_ref(), width = *width)
            }
        })
        .collect::<Vec<_>>()
        .join("|");
    writeln!(writer, "{}", line.trim_end())
}

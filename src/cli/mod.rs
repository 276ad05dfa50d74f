use std::io::{BufRead, Write, stdin, stdout};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::warn;

use crate::application::{LedgerService, parse_date};
use crate::config::Config;
use crate::domain::{CustomerId, TransactionId, TransactionKind, format_amount, format_signed};
use crate::io::Exporter;

/// Daftar - customer ledger
#[derive(Parser)]
#[command(name = "daftar")]
#[command(about = "Track what each customer owes: record purchases on credit and payments")]
#[command(version)]
pub struct Cli {
    /// Database file path (defaults to the last one used, then ~/.daftar_accounts/accounts.db)
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Customer management commands
    #[command(subcommand)]
    Customer(CustomerCommands),

    /// Transaction commands
    #[command(subcommand)]
    Tx(TransactionCommands),

    /// Export a customer's transactions
    #[command(subcommand)]
    Export(ExportCommands),
}

#[derive(Subcommand)]
pub enum CustomerCommands {
    /// Add a new customer
    Add {
        /// Customer name (must be unique)
        name: String,
    },

    /// Rename a customer
    Rename {
        /// Customer ID
        id: CustomerId,

        /// New name
        name: String,
    },

    /// Delete a customer and all of their transactions
    Delete {
        /// Customer ID
        id: CustomerId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// List customers with their totals, newest first
    List {
        /// Only show names containing this text (case-sensitive)
        #[arg(short, long)]
        search: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a purchase on credit (or a payment with --pay)
    Add {
        /// Customer ID
        customer: CustomerId,

        /// Amount (e.g., "50.00", "50" or "50,5")
        amount: String,

        /// What was bought or paid
        #[arg(short, long)]
        description: String,

        /// Record a payment instead of a purchase
        #[arg(long)]
        pay: bool,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: TransactionId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show a customer's transactions, newest first, with the running total
    List {
        /// Customer ID
        customer: CustomerId,
    },
}

#[derive(Subcommand)]
pub enum ExportCommands {
    /// Export transactions as CSV (oldest first)
    Csv {
        /// Customer ID
        customer: CustomerId,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print an account statement with a total row
    Statement {
        /// Customer ID
        customer: CustomerId,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config_path = Config::default_path();
        let mut config = Config::load_from(&config_path);
        let database = config.resolve_database(self.database);

        let service = LedgerService::open(&database)
            .await
            .with_context(|| format!("Failed to open ledger: {}", database.display()))?;

        let result = match self.command {
            Commands::Customer(cmd) => run_customer_command(&service, cmd).await,
            Commands::Tx(cmd) => run_transaction_command(&service, cmd).await,
            Commands::Export(cmd) => run_export_command(&service, cmd).await,
        };

        // Release the database whether or not the command succeeded
        service.close().await;

        config.database = Some(database);
        if let Err(err) = config.save_to(&config_path) {
            warn!(error = %err, "failed to save config");
        }

        result
    }
}

async fn run_customer_command(service: &LedgerService, cmd: CustomerCommands) -> Result<()> {
    match cmd {
        CustomerCommands::Add { name } => {
            let id = service.add_customer(&name).await?;
            println!("Added customer: {} ({})", name.trim(), id);
        }

        CustomerCommands::Rename { id, name } => {
            service.rename_customer(id, &name).await?;
            println!("Renamed customer {} to: {}", id, name.trim());
        }

        CustomerCommands::Delete { id, yes } => {
            let customer = service.get_customer(id).await?;
            let prompt = format!("Delete customer '{}' and all their transactions?", customer.name);
            if !yes && !confirm(&prompt)? {
                println!("Cancelled");
                return Ok(());
            }
            service.delete_customer(id).await?;
            println!("Deleted customer: {}", customer.name);
        }

        CustomerCommands::List { search } => {
            let customers = service.list_customers(search.as_deref()).await?;
            if customers.is_empty() {
                println!("No customers found.");
                return Ok(());
            }

            println!("{:>6}  {:<30} {:>15}", "ID", "Name", "Total");
            println!("{}", "-".repeat(53));
            for customer in customers {
                println!(
                    "{:>6}  {:<30} {:>15}",
                    customer.id,
                    customer.name,
                    format_amount(customer.total)
                );
            }
        }
    }
    Ok(())
}

async fn run_transaction_command(service: &LedgerService, cmd: TransactionCommands) -> Result<()> {
    match cmd {
        TransactionCommands::Add {
            customer,
            amount,
            description,
            pay,
            date,
        } => {
            let date = match date {
                Some(date_str) => parse_date(&date_str)?,
                None => Local::now().date_naive(),
            };
            let kind = if pay {
                TransactionKind::Pay
            } else {
                TransactionKind::Buy
            };

            let id = service
                .add_transaction(customer, date, &description, &amount, kind)
                .await?;
            let total = service.customer_total(customer).await?;
            println!("Recorded {} ({})", kind, id);
            println!("New total: {}", format_amount(total));
        }

        TransactionCommands::Delete { id, yes } => {
            let transaction = service.get_transaction(id).await?;
            let prompt = format!(
                "Delete transaction {} '{}' ({})?",
                transaction.date_string(),
                transaction.description,
                format_signed(transaction.amount_cents)
            );
            if !yes && !confirm(&prompt)? {
                println!("Cancelled");
                return Ok(());
            }
            service.delete_transaction(id).await?;
            println!("Deleted transaction {}", id);
        }

        TransactionCommands::List { customer } => {
            let account = service.get_customer(customer).await?;
            let list = service.list_transactions(customer).await?;

            println!("Account: {}", account.name);
            if list.is_empty() {
                println!("No transactions.");
            } else {
                println!(
                    "{:>6}  {:<10}  {:<30} {:>15}  {}",
                    "ID", "Date", "Description", "Amount", "Kind"
                );
                println!("{}", "-".repeat(72));
                for t in &list.transactions {
                    println!(
                        "{:>6}  {:<10}  {:<30} {:>15}  {}",
                        t.id,
                        t.date_string(),
                        t.description,
                        format_signed(t.amount_cents),
                        t.kind
                    );
                }
            }
            println!();
            println!("{}", list.status);
        }
    }
    Ok(())
}

async fn run_export_command(service: &LedgerService, cmd: ExportCommands) -> Result<()> {
    let exporter = Exporter::new(service);

    match cmd {
        ExportCommands::Csv { customer, output } => {
            let writer = open_output(output.as_ref())?;
            let count = exporter.export_csv(customer, writer).await?;
            if let Some(path) = output {
                eprintln!("Exported {} transactions to {}", count, path.display());
            }
        }

        ExportCommands::Statement { customer, output } => {
            let writer = open_output(output.as_ref())?;
            let statement = exporter.write_statement(customer, writer).await?;
            if let Some(path) = output {
                eprintln!(
                    "Saved statement for {} ({} transactions) to {}",
                    statement.customer_name,
                    statement.rows.len(),
                    path.display()
                );
            }
        }
    }
    Ok(())
}

fn open_output(output: Option<&PathBuf>) -> Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    })
}

/// Ask a yes/no question on stdin. Anything but "y"/"yes" means no.
fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    stdout().flush()?;

    let mut answer = String::new();
    stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// CareLedger - Nursing home finance tracking and reporting
#[derive(Parser)]
#[command(name = "careledger")]
#[command(about = "Track facility finances and generate monthly reports", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "careledger.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set CARELEDGER_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Show database status (encryption, size, record counts)
    Status,

    /// Manage nursing home facilities
    Facilities {
        #[command(subcommand)]
        action: Option<FacilitiesAction>,
    },

    /// Manage residents
    Residents {
        #[command(subcommand)]
        action: Option<ResidentsAction>,
    },

    /// Manage financial transactions
    Transactions {
        #[command(subcommand)]
        action: Option<TransactionsAction>,
    },

    /// Manage report configurations
    Configs {
        #[command(subcommand)]
        action: Option<ConfigsAction>,
    },

    /// Generate and manage reports
    Report {
        #[command(subcommand)]
        action: ReportAction,
    },
}

#[derive(Subcommand)]
pub enum FacilitiesAction {
    /// List facilities
    List,

    /// Add a facility
    Add {
        /// Facility name
        name: String,

        #[arg(long)]
        city: String,

        #[arg(long)]
        state: String,

        /// Number of beds
        #[arg(long, default_value = "0")]
        capacity: i64,
    },

    /// Delete a facility
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum ResidentsAction {
    /// List residents
    List {
        /// Only residents of this facility
        #[arg(long)]
        facility: Option<i64>,
    },

    /// Add a resident
    Add {
        first_name: String,
        last_name: String,

        /// Facility the resident lives in
        #[arg(long)]
        facility: Option<i64>,

        /// Expected income types, comma-separated (e.g. "SSI,Private Pay")
        #[arg(long)]
        income_types: Option<String>,
    },

    /// Delete a resident
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum TransactionsAction {
    /// List transactions, newest first
    List {
        /// Only transactions for this facility
        #[arg(long)]
        facility: Option<i64>,

        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Add a transaction
    Add {
        /// income or expense
        #[arg(long = "type")]
        transaction_type: String,

        #[arg(long)]
        category: String,

        /// Non-negative amount
        #[arg(long)]
        amount: f64,

        /// Transaction date (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// pending, completed, or cancelled
        #[arg(long, default_value = "completed")]
        status: String,

        #[arg(long)]
        facility: Option<i64>,

        #[arg(long)]
        resident: Option<i64>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        payment_method: Option<String>,

        #[arg(long)]
        reference: Option<String>,
    },

    /// Delete a transaction
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum ConfigsAction {
    /// List report configurations
    List,

    /// Add a report configuration
    Add {
        /// Report type tag (e.g. residents_income_per_nursing_home_monthly)
        #[arg(long = "type")]
        report_type: String,

        /// Scope to one facility; omit for all facilities
        #[arg(long)]
        facility: Option<i64>,

        /// Range start (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Range end (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },

    /// Delete a configuration and its generated reports
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum ReportAction {
    /// Generate a report, recording the outcome
    Generate {
        /// Generate from a stored configuration
        #[arg(long, conflicts_with_all = ["report_type", "facility", "from", "to"])]
        config: Option<i64>,

        /// Report type tag for an ad-hoc report
        #[arg(long = "type")]
        report_type: Option<String>,

        /// Scope to one facility; omit for all facilities
        #[arg(long)]
        facility: Option<i64>,

        /// Range start (YYYY-MM-DD); defaults to Jan 1 of the current year
        #[arg(long)]
        from: Option<String>,

        /// Range end (YYYY-MM-DD); defaults to today
        #[arg(long)]
        to: Option<String>,
    },

    /// List generated reports
    List,

    /// Show a generated report
    Show { id: i64 },

    /// Delete a generated report
    Delete { id: i64 },

    /// Export a generated report to a file
    Export {
        /// Generated report id
        id: i64,

        /// document, workbook, or json
        #[arg(short, long, default_value = "document")]
        format: String,

        /// Output path (defaults to report_<id>.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

//! CareLedger CLI - Nursing home finance tracking and reporting
//!
//! Usage:
//!   careledger init                         Initialize database
//!   careledger facilities add "Oak Manor" --city Springfield --state IL
//!   careledger report generate --type residents_income_per_nursing_home_monthly
//!   careledger report export 1 --format workbook

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Status => commands::cmd_status(&cli.db, cli.no_encrypt),
        Commands::Facilities { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(FacilitiesAction::List) => commands::cmd_facilities_list(&db),
                Some(FacilitiesAction::Add {
                    name,
                    city,
                    state,
                    capacity,
                }) => commands::cmd_facilities_add(&db, &name, &city, &state, capacity),
                Some(FacilitiesAction::Delete { id }) => commands::cmd_facilities_delete(&db, id),
            }
        }
        Commands::Residents { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None => commands::cmd_residents_list(&db, None),
                Some(ResidentsAction::List { facility }) => {
                    commands::cmd_residents_list(&db, facility)
                }
                Some(ResidentsAction::Add {
                    first_name,
                    last_name,
                    facility,
                    income_types,
                }) => commands::cmd_residents_add(
                    &db,
                    &first_name,
                    &last_name,
                    facility,
                    income_types.as_deref(),
                ),
                Some(ResidentsAction::Delete { id }) => commands::cmd_residents_delete(&db, id),
            }
        }
        Commands::Transactions { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None => commands::cmd_transactions_list(&db, None, 20),
                Some(TransactionsAction::List { facility, limit }) => {
                    commands::cmd_transactions_list(&db, facility, limit)
                }
                Some(TransactionsAction::Add {
                    transaction_type,
                    category,
                    amount,
                    date,
                    status,
                    facility,
                    resident,
                    description,
                    payment_method,
                    reference,
                }) => commands::cmd_transactions_add(
                    &db,
                    &transaction_type,
                    &category,
                    amount,
                    &date,
                    &status,
                    facility,
                    resident,
                    description.as_deref(),
                    payment_method.as_deref(),
                    reference.as_deref(),
                ),
                Some(TransactionsAction::Delete { id }) => {
                    commands::cmd_transactions_delete(&db, id)
                }
            }
        }
        Commands::Configs { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(ConfigsAction::List) => commands::cmd_configs_list(&db),
                Some(ConfigsAction::Add {
                    report_type,
                    facility,
                    from,
                    to,
                }) => commands::cmd_configs_add(
                    &db,
                    &report_type,
                    facility,
                    from.as_deref(),
                    to.as_deref(),
                ),
                Some(ConfigsAction::Delete { id }) => commands::cmd_configs_delete(&db, id),
            }
        }
        Commands::Report { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                ReportAction::Generate {
                    config,
                    report_type,
                    facility,
                    from,
                    to,
                } => commands::cmd_report_generate(
                    &db,
                    config,
                    report_type.as_deref(),
                    facility,
                    from.as_deref(),
                    to.as_deref(),
                ),
                ReportAction::List => commands::cmd_report_list(&db),
                ReportAction::Show { id } => commands::cmd_report_show(&db, id),
                ReportAction::Delete { id } => commands::cmd_report_delete(&db, id),
                ReportAction::Export { id, format, output } => {
                    commands::cmd_report_export(&db, id, &format, output.as_deref())
                }
            }
        }
    }
}

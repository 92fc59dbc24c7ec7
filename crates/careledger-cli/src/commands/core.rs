//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` / `parse_date` - Shared utilities
//! - `cmd_init` - Initialize the database
//! - `cmd_status` - Show database status

use std::path::Path;

use anyhow::{Context, Result};
use careledger_core::db::Database;
use chrono::NaiveDate;

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path.to_str().context("Database path is not UTF-8")?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

/// Parse a YYYY-MM-DD argument
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}' (use YYYY-MM-DD)", s))
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let _db = open_db(db_path, no_encrypt)?;

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Add a facility: careledger facilities add \"Oak Manor\" --city Springfield --state IL");
    println!("  2. Add residents and transactions, then generate a report:");
    println!("     careledger report generate --type residents_income_per_nursing_home_monthly");

    Ok(())
}

pub fn cmd_status(db_path: &Path, no_encrypt: bool) -> Result<()> {
    let db = open_db(db_path, no_encrypt)?;

    let facilities = db.list_nursing_homes()?.len();
    let residents = db.list_residents(None)?.len();
    let configs = db.list_report_configs()?.len();
    let reports = db.list_generated_reports(None)?.len();

    let size = std::fs::metadata(db.path())
        .map(|m| m.len())
        .unwrap_or(0);

    println!();
    println!("📋 CareLedger Status");
    println!("   ─────────────────────────────");
    println!("   Database: {}", db.path());
    println!("   Size: {:.1} KB", size as f64 / 1024.0);
    println!(
        "   Encryption: {}",
        if db.is_encrypted()? { "enabled" } else { "disabled" }
    );
    println!("   Facilities: {}", facilities);
    println!("   Residents: {}", residents);
    println!("   Report configurations: {}", configs);
    println!("   Generated reports: {}", reports);

    Ok(())
}

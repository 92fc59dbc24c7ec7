//! Report configuration command implementations

use anyhow::Result;
use careledger_core::db::Database;
use careledger_core::models::NewReportConfiguration;

use super::parse_date;

pub fn cmd_configs_list(db: &Database) -> Result<()> {
    let configs = db.list_report_configs()?;

    if configs.is_empty() {
        println!("No report configurations found. Add one with:");
        println!("  careledger configs add --type nursing_home_expense_summary --facility 1");
        return Ok(());
    }

    println!();
    println!("⚙️  Report Configurations");
    println!("   ─────────────────────────────────────────────────────────────");

    for config in configs {
        let scope = config
            .nursing_home_id
            .map(|id| format!("facility {}", id))
            .unwrap_or_else(|| "all facilities".to_string());
        let range = match (config.date_range_start, config.date_range_end) {
            (Some(start), Some(end)) => format!("{} to {}", start, end),
            _ => "current year to date".to_string(),
        };
        println!(
            "   [{}] {} │ {} │ {}",
            config.id, config.report_type, scope, range
        );
    }

    Ok(())
}

pub fn cmd_configs_add(
    db: &Database,
    report_type: &str,
    facility: Option<i64>,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<()> {
    let report_type = report_type
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let date_range_start = from.map(parse_date).transpose()?;
    let date_range_end = to.map(parse_date).transpose()?;

    let id = db.insert_report_config(&NewReportConfiguration {
        report_type,
        nursing_home_id: facility,
        date_range_start,
        date_range_end,
    })?;

    println!("✅ Added report configuration [{}] {}", id, report_type);
    Ok(())
}

pub fn cmd_configs_delete(db: &Database, id: i64) -> Result<()> {
    db.delete_report_config(id)?;
    println!("✅ Deleted configuration [{}] and its generated reports", id);
    Ok(())
}

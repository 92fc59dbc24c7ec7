//! Report generation, inspection, and export commands

use std::path::Path;

use anyhow::{bail, Context, Result};
use careledger_core::db::Database;
use careledger_core::export::{render_document, write_report, ExportFormat};
use careledger_core::models::{DateRange, GeneratedReportStatus, ReportData};
use careledger_core::report::ReportGenerator;

use super::parse_date;

pub fn cmd_report_generate(
    db: &Database,
    config: Option<i64>,
    report_type: Option<&str>,
    facility: Option<i64>,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<()> {
    let generator = ReportGenerator::new(db);

    let report = match config {
        Some(config_id) => {
            // Record the outcome against the configuration either way
            let config = db.get_report_config(config_id)?;
            match generator.generate_for_config(config_id) {
                Ok(report) => {
                    let report_id = db.insert_generated_report(config_id, &report)?;
                    println!("✅ Generated report [{}] {}", report_id, report.name);
                    report
                }
                Err(e) => {
                    db.insert_failed_report(config_id, config.report_type, &e.to_string())?;
                    bail!("Report generation failed (recorded): {}", e);
                }
            }
        }
        None => {
            let Some(report_type) = report_type else {
                bail!("Either --config or --type is required");
            };
            let report_type = report_type
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?;
            let range = match (from, to) {
                (Some(from), Some(to)) => Some(DateRange::new(parse_date(from)?, parse_date(to)?)),
                (None, None) => None,
                _ => bail!("--from and --to must be given together"),
            };
            let report = generator.generate(report_type, facility, range)?;
            println!("✅ Generated ad-hoc report: {}", report.name);
            report
        }
    };

    print_report_summary(&report);
    Ok(())
}

pub fn cmd_report_list(db: &Database) -> Result<()> {
    let reports = db.list_generated_reports(None)?;

    if reports.is_empty() {
        println!("No generated reports. Generate one with:");
        println!("  careledger report generate --config 1");
        return Ok(());
    }

    println!();
    println!("📊 Generated Reports");
    println!("   ─────────────────────────────────────────────────────────────");

    for report in reports {
        let status = match report.status {
            GeneratedReportStatus::Completed => "✅",
            GeneratedReportStatus::Failed => "❌",
        };
        println!(
            "   [{}] {} {} │ config {} │ {}",
            report.id,
            status,
            report.name,
            report.config_id,
            report.created_at.format("%Y-%m-%d %H:%M")
        );
    }

    Ok(())
}

pub fn cmd_report_show(db: &Database, id: i64) -> Result<()> {
    let record = db.get_generated_report(id)?;

    match record.status {
        GeneratedReportStatus::Failed => {
            println!("❌ Report [{}] {} failed:", record.id, record.name);
            println!("   {}", record.error.as_deref().unwrap_or("unknown error"));
        }
        GeneratedReportStatus::Completed => {
            let report = parse_payload(&record.payload)?;
            println!("{}", render_document(&report)?);
        }
    }

    Ok(())
}

pub fn cmd_report_delete(db: &Database, id: i64) -> Result<()> {
    db.delete_generated_report(id)?;
    println!("✅ Deleted generated report [{}]", id);
    Ok(())
}

pub fn cmd_report_export(
    db: &Database,
    id: i64,
    format: &str,
    output: Option<&Path>,
) -> Result<()> {
    let format: ExportFormat = format.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let record = db.get_generated_report(id)?;

    if record.status == GeneratedReportStatus::Failed {
        bail!("Report [{}] failed; nothing to export", id);
    }
    let report = parse_payload(&record.payload)?;

    let default_path = format!("report_{}.{}", id, format.extension());
    let path = output
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or(default_path);

    write_report(&report, format, &path)?;
    println!("✅ Exported report [{}] to {} ({})", id, path, format);
    Ok(())
}

fn parse_payload(payload: &Option<String>) -> Result<ReportData> {
    let payload = payload
        .as_deref()
        .context("Generated report has no payload")?;
    serde_json::from_str(payload).context("Failed to parse stored report payload")
}

fn print_report_summary(report: &ReportData) {
    println!("   Period: {}", report.date_range);
    println!("   Rows: {}", report.data.len());
    for (key, value) in &report.summary {
        println!("   {}: {}", key, value);
    }
}

//! Export functionality for generated reports
//!
//! Supports:
//! - Formatted text document (title, timestamp, range, summary, data table)
//! - Spreadsheet workbook as CSV: a Summary sheet plus a Data sheet
//! - Pretty-printed JSON of the full report envelope
//!
//! All three are pure formatting over the `ReportData` envelope; no
//! aggregation happens here.

use chrono::Utc;

use crate::error::Result;
use crate::models::{ReportData, ReportRows};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Document,
    Workbook,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Workbook => "workbook",
            Self::Json => "json",
        }
    }

    /// Conventional file extension for the format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Document => "txt",
            Self::Workbook => "csv",
            Self::Json => "json",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "document" | "doc" | "txt" => Ok(Self::Document),
            "workbook" | "sheet" | "csv" => Ok(Self::Workbook),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown export format: {}", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Render a report in the requested format
pub fn render_report(report: &ReportData, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Document => render_document(report),
        ExportFormat::Workbook => render_workbook(report),
        ExportFormat::Json => render_json(report),
    }
}

/// Render a report and write it to a file
pub fn write_report(report: &ReportData, format: ExportFormat, path: &str) -> Result<()> {
    let content = render_report(report, format)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Render the report as a formatted text document
pub fn render_document(report: &ReportData) -> Result<String> {
    let (headers, rows) = flatten_rows(&report.data);

    let mut out = String::new();
    out.push_str(&report.name);
    out.push('\n');
    out.push_str(&"=".repeat(report.name.len()));
    out.push('\n');
    out.push_str(&format!("Generated: {}\n", Utc::now().format("%Y-%m-%d %H:%M UTC")));
    out.push_str(&format!("Period: {}\n\n", report.date_range));

    out.push_str("Summary\n-------\n");
    for (key, value) in &report.summary {
        out.push_str(&format!("{}: {}\n", display_key(key), value));
    }
    out.push('\n');

    out.push_str("Data\n----\n");
    if rows.is_empty() {
        out.push_str("(no rows)\n");
        return Ok(out);
    }

    // Column widths sized to the widest cell
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .map(|r| r[i].len())
                .chain(std::iter::once(h.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    out.push_str(&format_line(&headers));
    out.push('\n');
    out.push_str(&"-".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1)));
    out.push('\n');
    for row in &rows {
        out.push_str(&format_line(row));
        out.push('\n');
    }
    Ok(out)
}

/// Render the report as a two-sheet CSV workbook
///
/// The Summary sheet (metric/value pairs) and the Data sheet (flattened rows)
/// are concatenated with an empty separator record, each preceded by a sheet
/// marker row.
pub fn render_workbook(report: &ReportData) -> Result<String> {
    let (headers, rows) = flatten_rows(&report.data);

    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["Sheet", "Summary"])?;
    writer.write_record(["Metric", "Value"])?;
    writer.write_record(["Report", &report.name])?;
    writer.write_record(["Period", &report.date_range.to_string()])?;
    for (key, value) in &report.summary {
        writer.write_record([display_key(key).as_str(), value.to_string().as_str()])?;
    }
    writer.write_record([""; 2])?;

    writer.write_record(["Sheet", "Data"])?;
    writer.write_record(&headers)?;
    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    let bytes = writer
        .into_inner()
        .map_err(|e| crate::error::Error::InvalidData(format!("CSV buffer error: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| crate::error::Error::InvalidData(format!("CSV is not UTF-8: {}", e)))
}

/// Render the full report envelope as pretty-printed JSON
pub fn render_json(report: &ReportData) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Flatten top-level aggregated rows into a uniform table
fn flatten_rows(data: &ReportRows) -> (Vec<String>, Vec<Vec<String>>) {
    let money = |amount: f64| format!("{:.2}", amount);

    match data {
        ReportRows::MonthlyIncome(rows) => (
            str_headers(&["Facility", "Month", "Total Income", "Transactions", "Residents With Issues"]),
            rows.iter()
                .map(|r| {
                    vec![
                        r.nursing_home_name.clone(),
                        r.month.clone(),
                        money(r.total_income),
                        r.total_transactions.to_string(),
                        r.resident_details
                            .iter()
                            .filter(|d| d.has_income_issues)
                            .count()
                            .to_string(),
                    ]
                })
                .collect(),
        ),
        ReportRows::MonthCategory(rows) => (
            str_headers(&["Facility", "Month", "Total Income", "Total Expenses", "Net"]),
            rows.iter()
                .map(|r| {
                    vec![
                        r.nursing_home_name.clone(),
                        r.month.clone(),
                        money(r.total_income),
                        money(r.total_expenses),
                        money(r.net_amount),
                    ]
                })
                .collect(),
        ),
        ReportRows::FacilityExpense(rows) => (
            str_headers(&["Facility", "Month", "Total Expenses", "Transactions", "Top Category"]),
            rows.iter()
                .map(|r| {
                    vec![
                        r.nursing_home_name.clone(),
                        r.month.clone(),
                        money(r.total_expenses),
                        r.transaction_count.to_string(),
                        r.categories
                            .first()
                            .map(|c| c.category.clone())
                            .unwrap_or_else(|| "-".to_string()),
                    ]
                })
                .collect(),
        ),
        ReportRows::IncomeExpense(rows) => (
            str_headers(&["Facility", "Month", "Total Income", "Total Expenses", "Net"]),
            rows.iter()
                .map(|r| {
                    vec![
                        r.nursing_home_name.clone(),
                        r.month.clone(),
                        money(r.total_income),
                        money(r.total_expenses),
                        money(r.net_amount),
                    ]
                })
                .collect(),
        ),
        ReportRows::Transactions(rows) => (
            str_headers(&["Date", "Type", "Category", "Amount", "Status", "Resident", "Facility"]),
            rows.iter()
                .map(|t| {
                    vec![
                        t.transaction_date.to_string(),
                        t.transaction_type.to_string(),
                        t.category.clone(),
                        money(t.amount),
                        t.status.to_string(),
                        t.resident_name.clone(),
                        t.nursing_home_name.clone(),
                    ]
                })
                .collect(),
        ),
        ReportRows::Facilities(rows) => (
            str_headers(&["Name", "City", "State", "Capacity", "Residents"]),
            rows.iter()
                .map(|f| {
                    vec![
                        f.name.clone(),
                        f.city.clone(),
                        f.state.clone(),
                        f.capacity.to_string(),
                        f.resident_count.to_string(),
                    ]
                })
                .collect(),
        ),
        ReportRows::Residents(rows) => (
            str_headers(&["Name", "Facility", "Expected Income Types"]),
            rows.iter()
                .map(|r| {
                    vec![
                        r.full_name(),
                        r.nursing_home_name.clone(),
                        r.income_types.join(", "),
                    ]
                })
                .collect(),
        ),
        ReportRows::ResidentAnnual(rows) => (
            str_headers(&["Resident", "Facility", "Total Income", "Total Expenses", "Net"]),
            rows.iter()
                .map(|r| {
                    vec![
                        r.resident_name.clone(),
                        r.nursing_home_name.clone(),
                        money(r.total_income),
                        money(r.total_expenses),
                        money(r.net_amount),
                    ]
                })
                .collect(),
        ),
        ReportRows::FacilityAnnual(rows) => (
            str_headers(&["Facility", "Total Income", "Total Expenses", "Net"]),
            rows.iter()
                .map(|r| {
                    vec![
                        r.nursing_home_name.clone(),
                        money(r.total_income),
                        money(r.total_expenses),
                        money(r.net_amount),
                    ]
                })
                .collect(),
        ),
    }
}

fn str_headers(headers: &[&str]) -> Vec<String> {
    headers.iter().map(|h| h.to_string()).collect()
}

/// Turn a snake_case summary key into a display label
fn display_key(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::models::{
        DateRange, FacilityMonthlyIncome, ReportSummary, ReportType, SummaryValue,
    };

    fn sample_report() -> ReportData {
        let mut summary = ReportSummary::new();
        summary.insert("total_income".into(), SummaryValue::Number(500.0));
        summary.insert("month_count".into(), SummaryValue::Integer(2));

        ReportData {
            name: "Residents Income per Nursing Home (Monthly)".to_string(),
            report_type: ReportType::ResidentsIncomePerNursingHomeMonthly,
            date_range: DateRange::new(
                chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                chrono::NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(),
            ),
            data: ReportRows::MonthlyIncome(vec![
                FacilityMonthlyIncome {
                    nursing_home_id: 1,
                    nursing_home_name: "Oak Manor".to_string(),
                    month: "Jan 2024".to_string(),
                    month_key: "2024-01".to_string(),
                    total_income: 500.0,
                    total_transactions: 1,
                    resident_details: vec![],
                },
                FacilityMonthlyIncome {
                    nursing_home_id: 1,
                    nursing_home_name: "Oak Manor".to_string(),
                    month: "Feb 2024".to_string(),
                    month_key: "2024-02".to_string(),
                    total_income: 0.0,
                    total_transactions: 0,
                    resident_details: vec![],
                },
            ]),
            summary,
        }
    }

    #[test]
    fn test_export_format_parsing() {
        assert_eq!(ExportFormat::from_str("csv").unwrap(), ExportFormat::Workbook);
        assert_eq!(ExportFormat::from_str("Document").unwrap(), ExportFormat::Document);
        assert_eq!(ExportFormat::from_str("json").unwrap(), ExportFormat::Json);
        assert!(ExportFormat::from_str("pdf").is_err());
    }

    #[test]
    fn test_render_document() {
        let doc = render_document(&sample_report()).unwrap();
        assert!(doc.starts_with("Residents Income per Nursing Home (Monthly)\n"));
        assert!(doc.contains("Period: 2024-01-01 to 2024-02-28"));
        assert!(doc.contains("Total Income: 500.00"));
        assert!(doc.contains("Oak Manor"));
        assert!(doc.contains("Jan 2024"));
    }

    #[test]
    fn test_render_document_empty_rows() {
        let mut report = sample_report();
        report.data = ReportRows::MonthlyIncome(vec![]);
        let doc = render_document(&report).unwrap();
        assert!(doc.contains("(no rows)"));
    }

    #[test]
    fn test_render_workbook_has_both_sheets() {
        let csv = render_workbook(&sample_report()).unwrap();
        assert!(csv.contains("Sheet,Summary"));
        assert!(csv.contains("Sheet,Data"));
        assert!(csv.contains("Month Count,2"));
        assert!(csv.contains("Oak Manor,Jan 2024,500.00,1,0"));
    }

    #[test]
    fn test_render_json_round_trips() {
        let report = sample_report();
        let json = render_json(&report).unwrap();
        let parsed: ReportData = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_display_key() {
        assert_eq!(display_key("total_income"), "Total Income");
        assert_eq!(display_key("net"), "Net");
    }
}

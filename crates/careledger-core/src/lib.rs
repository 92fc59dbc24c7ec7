//! CareLedger Core Library
//!
//! Shared functionality for the CareLedger nursing-home finance tool:
//! - Encrypted record store access and migrations
//! - Denormalized data fetchers for report input
//! - Report aggregators (monthly income, category breakdowns, expense and
//!   annual summaries) with month bucketing and missing-income detection
//! - Summary calculators and the report orchestrator
//! - Report exporters (text document, CSV workbook, JSON)

pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod report;

pub use db::Database;
pub use error::{Error, Result};
pub use export::{render_report, write_report, ExportFormat};
pub use models::{
    DateRange, GeneratedReport, GeneratedReportStatus, MonthBucket, ReportConfiguration,
    ReportData, ReportRows, ReportSummary, ReportType, SummaryValue, TransactionStatus,
    TransactionType,
};
pub use report::ReportGenerator;

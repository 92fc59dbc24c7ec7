//! Domain models for careledger

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A nursing home facility
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NursingHome {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    /// Number of beds
    pub capacity: i64,
    pub created_at: DateTime<Utc>,
}

/// A nursing home to be created (before store insertion)
#[derive(Debug, Clone)]
pub struct NewNursingHome {
    pub name: String,
    pub city: String,
    pub state: String,
    pub capacity: i64,
}

/// A resident of a nursing home
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resident {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Facility this resident lives in; None while unassigned
    pub nursing_home_id: Option<i64>,
    /// Income categories this resident is expected to receive each month
    /// (e.g., "SSI", "Private Pay"); used to flag missing income
    pub income_types: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Resident {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A resident to be created (before store insertion)
#[derive(Debug, Clone)]
pub struct NewResident {
    pub first_name: String,
    pub last_name: String,
    pub nursing_home_id: Option<i64>,
    pub income_types: Vec<String>,
}

/// Whether a transaction is money coming in or going out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Settlement status of a transaction
///
/// Only completed transactions count toward income/expense totals; pending
/// transactions remain visible in report transaction lists but never sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    #[default]
    Completed,
    Cancelled,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("Unknown transaction status: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A financial transaction against a facility and/or resident
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialTransaction {
    pub id: i64,
    pub transaction_type: TransactionType,
    pub category: String,
    /// Non-negative; direction comes from transaction_type
    pub amount: f64,
    pub transaction_date: NaiveDate,
    pub status: TransactionStatus,
    pub nursing_home_id: Option<i64>,
    pub resident_id: Option<i64>,
    pub description: Option<String>,
    pub payment_method: Option<String>,
    pub reference_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A transaction to be created (before store insertion)
#[derive(Debug, Clone)]
pub struct NewFinancialTransaction {
    pub transaction_type: TransactionType,
    pub category: String,
    pub amount: f64,
    pub transaction_date: NaiveDate,
    pub status: TransactionStatus,
    pub nursing_home_id: Option<i64>,
    pub resident_id: Option<i64>,
    pub description: Option<String>,
    pub payment_method: Option<String>,
    pub reference_number: Option<String>,
}

/// A transaction row denormalized with display names, ready for aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionWithNames {
    pub id: i64,
    pub transaction_type: TransactionType,
    pub category: String,
    pub amount: f64,
    pub transaction_date: NaiveDate,
    pub status: TransactionStatus,
    pub nursing_home_id: Option<i64>,
    pub resident_id: Option<i64>,
    pub description: Option<String>,
    pub payment_method: Option<String>,
    pub reference_number: Option<String>,
    /// Resident display name, "-" when the transaction has no resident
    pub resident_name: String,
    /// Facility display name, "-" when the transaction has no facility
    pub nursing_home_name: String,
}

/// A resident row joined with its facility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResidentWithFacility {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub income_types: Vec<String>,
    pub nursing_home_id: i64,
    pub nursing_home_name: String,
}

impl ResidentWithFacility {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// The nine supported report types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    FinancialSummary,
    TransactionReport,
    NursingHomeReport,
    ResidentReport,
    ResidentAnnualFinancialSummary,
    NursingHomeAnnualFinancialSummary,
    ResidentsIncomePerNursingHomeMonthly,
    ResidentIncomeExpenseByMonthCategory,
    NursingHomeExpenseSummary,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FinancialSummary => "financial_summary",
            Self::TransactionReport => "transaction_report",
            Self::NursingHomeReport => "nursing_home_report",
            Self::ResidentReport => "resident_report",
            Self::ResidentAnnualFinancialSummary => "resident_annual_financial_summary",
            Self::NursingHomeAnnualFinancialSummary => "nursing_home_annual_financial_summary",
            Self::ResidentsIncomePerNursingHomeMonthly => {
                "residents_income_per_nursing_home_monthly"
            }
            Self::ResidentIncomeExpenseByMonthCategory => {
                "resident_income_expense_by_month_category"
            }
            Self::NursingHomeExpenseSummary => "nursing_home_expense_summary",
        }
    }

    /// Human-readable name used for the report envelope
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::FinancialSummary => "Financial Summary",
            Self::TransactionReport => "Transaction Report",
            Self::NursingHomeReport => "Nursing Home Report",
            Self::ResidentReport => "Resident Report",
            Self::ResidentAnnualFinancialSummary => "Resident Annual Financial Summary",
            Self::NursingHomeAnnualFinancialSummary => "Nursing Home Annual Financial Summary",
            Self::ResidentsIncomePerNursingHomeMonthly => {
                "Residents Income per Nursing Home (Monthly)"
            }
            Self::ResidentIncomeExpenseByMonthCategory => {
                "Resident Income/Expense by Month and Category"
            }
            Self::NursingHomeExpenseSummary => "Nursing Home Expense Summary",
        }
    }

    pub fn all() -> [ReportType; 9] {
        [
            Self::FinancialSummary,
            Self::TransactionReport,
            Self::NursingHomeReport,
            Self::ResidentReport,
            Self::ResidentAnnualFinancialSummary,
            Self::NursingHomeAnnualFinancialSummary,
            Self::ResidentsIncomePerNursingHomeMonthly,
            Self::ResidentIncomeExpenseByMonthCategory,
            Self::NursingHomeExpenseSummary,
        ]
    }
}

impl std::str::FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "financial_summary" => Ok(Self::FinancialSummary),
            "transaction_report" => Ok(Self::TransactionReport),
            "nursing_home_report" => Ok(Self::NursingHomeReport),
            "resident_report" => Ok(Self::ResidentReport),
            "resident_annual_financial_summary" => Ok(Self::ResidentAnnualFinancialSummary),
            "nursing_home_annual_financial_summary" => {
                Ok(Self::NursingHomeAnnualFinancialSummary)
            }
            "residents_income_per_nursing_home_monthly" => {
                Ok(Self::ResidentsIncomePerNursingHomeMonthly)
            }
            "resident_income_expense_by_month_category" => {
                Ok(Self::ResidentIncomeExpenseByMonthCategory)
            }
            "nursing_home_expense_summary" => Ok(Self::NursingHomeExpenseSummary),
            _ => Err(format!("Unsupported report type: {}", s)),
        }
    }
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Scopes a report request; nursing_home_id = None means all facilities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfiguration {
    pub id: i64,
    pub report_type: ReportType,
    pub nursing_home_id: Option<i64>,
    pub date_range_start: Option<NaiveDate>,
    pub date_range_end: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// A report configuration to be created (before store insertion)
#[derive(Debug, Clone)]
pub struct NewReportConfiguration {
    pub report_type: ReportType,
    pub nursing_home_id: Option<i64>,
    pub date_range_start: Option<NaiveDate>,
    pub date_range_end: Option<NaiveDate>,
}

/// Outcome status of a generated-report record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratedReportStatus {
    Completed,
    Failed,
}

impl GeneratedReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl std::str::FromStr for GeneratedReportStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("Unknown generated report status: {}", s)),
        }
    }
}

impl std::fmt::Display for GeneratedReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted generated report. Immutable once created except for deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedReport {
    pub id: i64,
    pub config_id: i64,
    pub name: String,
    pub report_type: ReportType,
    pub status: GeneratedReportStatus,
    /// Error message when status is failed
    pub error: Option<String>,
    /// Serialized ReportData envelope when status is completed
    pub payload: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Inclusive date range for a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Jan 1 of the current year through today, the default when a
    /// configuration carries no explicit range
    pub fn current_year_to_date() -> Self {
        let today = Utc::now().date_naive();
        let start = NaiveDate::from_ymd_opt(today.year(), 1, 1)
            .expect("Jan 1 is always a valid date");
        Self { start, end: today }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// One calendar month within a report's date range, the unit of aggregation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthBucket {
    /// Sortable key, "YYYY-MM"
    pub key: String,
    /// Display label, "MMM YYYY" (e.g. "Jan 2024")
    pub display: String,
}

// ---------------------------------------------------------------------------
// Aggregated report rows
// ---------------------------------------------------------------------------

/// One (facility, month) row of the monthly income report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityMonthlyIncome {
    pub nursing_home_id: i64,
    pub nursing_home_name: String,
    /// Display month, "MMM YYYY"
    pub month: String,
    /// Sortable month key, "YYYY-MM"
    pub month_key: String,
    /// Sum of completed income transactions across residents this month
    pub total_income: f64,
    /// All listed transactions this month, pending included
    pub total_transactions: i64,
    pub resident_details: Vec<ResidentIncomeDetail>,
}

/// Per-resident detail inside a monthly income row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResidentIncomeDetail {
    pub resident_id: i64,
    pub resident_name: String,
    pub expected_income_types: Vec<String>,
    /// Completed income this month
    pub total_income: f64,
    /// Income transactions this month, date descending, pending included
    pub transactions: Vec<TransactionWithNames>,
    /// Expected types (lower-cased) with no matching category observed
    pub missing_income_types: Vec<String>,
    pub has_income_issues: bool,
}

/// Transactions of one category within a resident-month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub category: String,
    pub total_amount: f64,
    pub transaction_count: i64,
    pub transactions: Vec<TransactionWithNames>,
}

/// Per-resident breakdown inside a month/category row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResidentCategoryDetail {
    pub resident_id: i64,
    pub resident_name: String,
    pub income_categories: Vec<CategoryGroup>,
    pub expense_categories: Vec<CategoryGroup>,
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_amount: f64,
}

/// One month row of the single-facility income/expense-by-category report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthCategoryRow {
    pub nursing_home_id: i64,
    pub nursing_home_name: String,
    pub month: String,
    pub month_key: String,
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_amount: f64,
    pub residents: Vec<ResidentCategoryDetail>,
}

/// Expense total for one category (no nested transactions)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseCategoryTotal {
    pub category: String,
    pub total_amount: f64,
    pub transaction_count: i64,
}

/// One (facility, month) row of the facility expense report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityExpenseMonth {
    pub nursing_home_id: i64,
    pub nursing_home_name: String,
    pub month: String,
    pub month_key: String,
    pub total_expenses: f64,
    pub transaction_count: i64,
    /// Sorted by total_amount descending
    pub categories: Vec<ExpenseCategoryTotal>,
}

/// Per-resident roll-up inside an income/expense summary row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResidentFinancialSummary {
    pub resident_id: i64,
    pub resident_name: String,
    pub monthly_income: f64,
    /// Sorted by total_amount descending
    pub monthly_expenses: Vec<ExpenseCategoryTotal>,
    pub total_expenses: f64,
    pub net_amount: f64,
}

/// One (facility, month) row of the income/expense summary report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityIncomeExpenseMonth {
    pub nursing_home_id: i64,
    pub nursing_home_name: String,
    pub month: String,
    pub month_key: String,
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_amount: f64,
    /// Sorted by net_amount descending
    pub resident_summaries: Vec<ResidentFinancialSummary>,
}

/// Income/expense/net totals for one month of an annual series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthTotals {
    pub month: String,
    pub month_key: String,
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
}

/// Annual financial series for one resident
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResidentAnnualSummary {
    pub resident_id: i64,
    pub resident_name: String,
    pub nursing_home_id: i64,
    pub nursing_home_name: String,
    pub months: Vec<MonthTotals>,
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_amount: f64,
}

/// Annual financial series for one facility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityAnnualSummary {
    pub nursing_home_id: i64,
    pub nursing_home_name: String,
    pub months: Vec<MonthTotals>,
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_amount: f64,
}

/// One facility row of the nursing home report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityOverview {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub capacity: i64,
    pub resident_count: i64,
}

/// Report data rows, one variant per aggregator output family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "rows", rename_all = "snake_case")]
pub enum ReportRows {
    MonthlyIncome(Vec<FacilityMonthlyIncome>),
    MonthCategory(Vec<MonthCategoryRow>),
    FacilityExpense(Vec<FacilityExpenseMonth>),
    IncomeExpense(Vec<FacilityIncomeExpenseMonth>),
    Transactions(Vec<TransactionWithNames>),
    Facilities(Vec<FacilityOverview>),
    Residents(Vec<ResidentWithFacility>),
    ResidentAnnual(Vec<ResidentAnnualSummary>),
    FacilityAnnual(Vec<FacilityAnnualSummary>),
}

impl ReportRows {
    /// Number of top-level rows
    pub fn len(&self) -> usize {
        match self {
            Self::MonthlyIncome(rows) => rows.len(),
            Self::MonthCategory(rows) => rows.len(),
            Self::FacilityExpense(rows) => rows.len(),
            Self::IncomeExpense(rows) => rows.len(),
            Self::Transactions(rows) => rows.len(),
            Self::Facilities(rows) => rows.len(),
            Self::Residents(rows) => rows.len(),
            Self::ResidentAnnual(rows) => rows.len(),
            Self::FacilityAnnual(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A scalar value in a report summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SummaryValue {
    Integer(i64),
    Number(f64),
    Text(String),
}

impl std::fmt::Display for SummaryValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{}", n),
            Self::Number(n) => write!(f, "{:.2}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Flat headline metrics for a report; BTreeMap keeps key order stable
pub type ReportSummary = BTreeMap<String, SummaryValue>;

/// The uniform report envelope returned for every report type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportData {
    pub name: String,
    pub report_type: ReportType,
    pub date_range: DateRange,
    pub data: ReportRows,
    pub summary: ReportSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_report_type_round_trip() {
        for rt in ReportType::all() {
            assert_eq!(ReportType::from_str(rt.as_str()).unwrap(), rt);
        }
    }

    #[test]
    fn test_report_type_unknown_fails() {
        let err = ReportType::from_str("quarterly_digest").unwrap_err();
        assert!(err.contains("Unsupported report type"));
    }

    #[test]
    fn test_transaction_status_parsing() {
        assert_eq!(
            TransactionStatus::from_str("Completed").unwrap(),
            TransactionStatus::Completed
        );
        assert!(TransactionStatus::from_str("settled").is_err());
    }

    #[test]
    fn test_date_range_contains_bounds() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(),
        );
        assert!(range.contains(range.start));
        assert!(range.contains(range.end));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
    }

    #[test]
    fn test_summary_value_serialization() {
        let mut summary = ReportSummary::new();
        summary.insert("total_income".into(), SummaryValue::Number(500.0));
        summary.insert("month_count".into(), SummaryValue::Integer(2));

        let json = serde_json::to_string(&summary).unwrap();
        assert_eq!(json, r#"{"month_count":2,"total_income":500.0}"#);
    }
}

//! Summary calculators
//!
//! One pure fold per report family, reducing aggregated rows to the flat
//! headline metrics shown above report tables and in export headers. Averages
//! guard against empty input instead of dividing by zero.

use std::collections::BTreeSet;

use crate::models::{
    FacilityAnnualSummary, FacilityExpenseMonth, FacilityIncomeExpenseMonth, FacilityMonthlyIncome,
    FacilityOverview, MonthCategoryRow, ReportSummary, ResidentAnnualSummary,
    ResidentWithFacility, SummaryValue, TransactionType, TransactionWithNames,
};

fn average(total: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

pub fn summarize_monthly_income(rows: &[FacilityMonthlyIncome]) -> ReportSummary {
    let total_income: f64 = rows.iter().map(|r| r.total_income).sum();
    let total_transactions: i64 = rows.iter().map(|r| r.total_transactions).sum();
    let facilities: BTreeSet<i64> = rows.iter().map(|r| r.nursing_home_id).collect();
    let months: BTreeSet<&str> = rows.iter().map(|r| r.month_key.as_str()).collect();
    let residents_with_issues = rows
        .iter()
        .flat_map(|r| &r.resident_details)
        .filter(|d| d.has_income_issues)
        .count();

    let mut summary = ReportSummary::new();
    summary.insert("total_income".into(), SummaryValue::Number(total_income));
    summary.insert("total_transactions".into(), SummaryValue::Integer(total_transactions));
    summary.insert("facility_count".into(), SummaryValue::Integer(facilities.len() as i64));
    summary.insert("month_count".into(), SummaryValue::Integer(months.len() as i64));
    summary.insert(
        "average_monthly_income".into(),
        SummaryValue::Number(average(total_income, months.len())),
    );
    summary.insert(
        "residents_with_income_issues".into(),
        SummaryValue::Integer(residents_with_issues as i64),
    );
    summary
}

pub fn summarize_month_category(rows: &[MonthCategoryRow]) -> ReportSummary {
    let total_income: f64 = rows.iter().map(|r| r.total_income).sum();
    let total_expenses: f64 = rows.iter().map(|r| r.total_expenses).sum();
    let residents: BTreeSet<i64> = rows
        .iter()
        .flat_map(|r| &r.residents)
        .map(|d| d.resident_id)
        .collect();

    let mut summary = ReportSummary::new();
    summary.insert("total_income".into(), SummaryValue::Number(total_income));
    summary.insert("total_expenses".into(), SummaryValue::Number(total_expenses));
    summary.insert("net_amount".into(), SummaryValue::Number(total_income - total_expenses));
    summary.insert("month_count".into(), SummaryValue::Integer(rows.len() as i64));
    summary.insert("resident_count".into(), SummaryValue::Integer(residents.len() as i64));
    summary.insert(
        "average_monthly_net".into(),
        SummaryValue::Number(average(total_income - total_expenses, rows.len())),
    );
    summary
}

pub fn summarize_facility_expenses(rows: &[FacilityExpenseMonth]) -> ReportSummary {
    let total_expenses: f64 = rows.iter().map(|r| r.total_expenses).sum();
    let transaction_count: i64 = rows.iter().map(|r| r.transaction_count).sum();
    let facilities: BTreeSet<i64> = rows.iter().map(|r| r.nursing_home_id).collect();
    let months: BTreeSet<&str> = rows.iter().map(|r| r.month_key.as_str()).collect();

    let mut summary = ReportSummary::new();
    summary.insert("total_expenses".into(), SummaryValue::Number(total_expenses));
    summary.insert("transaction_count".into(), SummaryValue::Integer(transaction_count));
    summary.insert("facility_count".into(), SummaryValue::Integer(facilities.len() as i64));
    summary.insert("month_count".into(), SummaryValue::Integer(months.len() as i64));
    summary.insert(
        "average_monthly_expenses".into(),
        SummaryValue::Number(average(total_expenses, months.len())),
    );
    summary
}

pub fn summarize_income_expense(rows: &[FacilityIncomeExpenseMonth]) -> ReportSummary {
    let total_income: f64 = rows.iter().map(|r| r.total_income).sum();
    let total_expenses: f64 = rows.iter().map(|r| r.total_expenses).sum();
    let facilities: BTreeSet<i64> = rows.iter().map(|r| r.nursing_home_id).collect();
    let months: BTreeSet<&str> = rows.iter().map(|r| r.month_key.as_str()).collect();

    let mut summary = ReportSummary::new();
    summary.insert("total_income".into(), SummaryValue::Number(total_income));
    summary.insert("total_expenses".into(), SummaryValue::Number(total_expenses));
    summary.insert("net_amount".into(), SummaryValue::Number(total_income - total_expenses));
    summary.insert("facility_count".into(), SummaryValue::Integer(facilities.len() as i64));
    summary.insert("month_count".into(), SummaryValue::Integer(months.len() as i64));
    summary.insert(
        "average_monthly_net".into(),
        SummaryValue::Number(average(total_income - total_expenses, months.len())),
    );
    summary
}

pub fn summarize_transactions(rows: &[TransactionWithNames]) -> ReportSummary {
    let total_income: f64 = rows
        .iter()
        .filter(|t| t.transaction_type == TransactionType::Income)
        .map(|t| t.amount)
        .sum();
    let total_expenses: f64 = rows
        .iter()
        .filter(|t| t.transaction_type == TransactionType::Expense)
        .map(|t| t.amount)
        .sum();

    let mut summary = ReportSummary::new();
    summary.insert("total_income".into(), SummaryValue::Number(total_income));
    summary.insert("total_expenses".into(), SummaryValue::Number(total_expenses));
    summary.insert("net_amount".into(), SummaryValue::Number(total_income - total_expenses));
    summary.insert("transaction_count".into(), SummaryValue::Integer(rows.len() as i64));
    summary
}

pub fn summarize_facilities(rows: &[FacilityOverview]) -> ReportSummary {
    let total_capacity: i64 = rows.iter().map(|f| f.capacity).sum();
    let total_residents: i64 = rows.iter().map(|f| f.resident_count).sum();

    let mut summary = ReportSummary::new();
    summary.insert("facility_count".into(), SummaryValue::Integer(rows.len() as i64));
    summary.insert("total_capacity".into(), SummaryValue::Integer(total_capacity));
    summary.insert("total_residents".into(), SummaryValue::Integer(total_residents));
    summary
}

pub fn summarize_residents(rows: &[ResidentWithFacility]) -> ReportSummary {
    let facilities: BTreeSet<i64> = rows.iter().map(|r| r.nursing_home_id).collect();

    let mut summary = ReportSummary::new();
    summary.insert("resident_count".into(), SummaryValue::Integer(rows.len() as i64));
    summary.insert("facility_count".into(), SummaryValue::Integer(facilities.len() as i64));
    summary
}

pub fn summarize_resident_annual(rows: &[ResidentAnnualSummary]) -> ReportSummary {
    let total_income: f64 = rows.iter().map(|r| r.total_income).sum();
    let total_expenses: f64 = rows.iter().map(|r| r.total_expenses).sum();

    let mut summary = ReportSummary::new();
    summary.insert("resident_count".into(), SummaryValue::Integer(rows.len() as i64));
    summary.insert("total_income".into(), SummaryValue::Number(total_income));
    summary.insert("total_expenses".into(), SummaryValue::Number(total_expenses));
    summary.insert("net_amount".into(), SummaryValue::Number(total_income - total_expenses));
    summary
}

pub fn summarize_facility_annual(rows: &[FacilityAnnualSummary]) -> ReportSummary {
    let total_income: f64 = rows.iter().map(|r| r.total_income).sum();
    let total_expenses: f64 = rows.iter().map(|r| r.total_expenses).sum();

    let mut summary = ReportSummary::new();
    summary.insert("facility_count".into(), SummaryValue::Integer(rows.len() as i64));
    summary.insert("total_income".into(), SummaryValue::Number(total_income));
    summary.insert("total_expenses".into(), SummaryValue::Number(total_expenses));
    summary.insert("net_amount".into(), SummaryValue::Number(total_income - total_expenses));
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_zero_averages() {
        let summary = summarize_monthly_income(&[]);
        assert_eq!(summary["average_monthly_income"], SummaryValue::Number(0.0));
        assert_eq!(summary["month_count"], SummaryValue::Integer(0));

        let summary = summarize_facility_expenses(&[]);
        assert_eq!(summary["average_monthly_expenses"], SummaryValue::Number(0.0));

        let summary = summarize_income_expense(&[]);
        assert_eq!(summary["average_monthly_net"], SummaryValue::Number(0.0));
    }

    #[test]
    fn test_monthly_income_summary_counts() {
        let rows = vec![
            FacilityMonthlyIncome {
                nursing_home_id: 1,
                nursing_home_name: "Oak Manor".to_string(),
                month: "Jan 2024".to_string(),
                month_key: "2024-01".to_string(),
                total_income: 500.0,
                total_transactions: 2,
                resident_details: vec![],
            },
            FacilityMonthlyIncome {
                nursing_home_id: 1,
                nursing_home_name: "Oak Manor".to_string(),
                month: "Feb 2024".to_string(),
                month_key: "2024-02".to_string(),
                total_income: 300.0,
                total_transactions: 1,
                resident_details: vec![],
            },
        ];

        let summary = summarize_monthly_income(&rows);
        assert_eq!(summary["total_income"], SummaryValue::Number(800.0));
        assert_eq!(summary["facility_count"], SummaryValue::Integer(1));
        assert_eq!(summary["month_count"], SummaryValue::Integer(2));
        assert_eq!(summary["average_monthly_income"], SummaryValue::Number(400.0));
    }

    #[test]
    fn test_transactions_summary_nets_income_against_expenses() {
        use chrono::NaiveDate;

        use crate::models::TransactionStatus;

        let mk = |id, transaction_type, amount| TransactionWithNames {
            id,
            transaction_type,
            category: "General".to_string(),
            amount,
            transaction_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            status: TransactionStatus::Completed,
            nursing_home_id: None,
            resident_id: None,
            description: None,
            payment_method: None,
            reference_number: None,
            resident_name: "-".to_string(),
            nursing_home_name: "-".to_string(),
        };
        let rows = vec![
            mk(1, TransactionType::Income, 200.0),
            mk(2, TransactionType::Expense, 50.0),
        ];

        let summary = summarize_transactions(&rows);
        assert_eq!(summary["net_amount"], SummaryValue::Number(150.0));
        assert_eq!(summary["transaction_count"], SummaryValue::Integer(2));
    }
}

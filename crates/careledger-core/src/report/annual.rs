//! Annual summary aggregators
//!
//! Month-by-month income/expense/net series over the report range, rolled up
//! per resident or per facility, zero-filled for quiet months.

use std::collections::BTreeMap;

use crate::models::{
    FacilityAnnualSummary, MonthBucket, MonthTotals, NursingHome, ResidentAnnualSummary,
    ResidentWithFacility, TransactionType, TransactionWithNames,
};

use super::buckets::month_key;

fn zero_months(buckets: &[MonthBucket]) -> Vec<MonthTotals> {
    buckets
        .iter()
        .map(|b| MonthTotals {
            month: b.display.clone(),
            month_key: b.key.clone(),
            income: 0.0,
            expenses: 0.0,
            net: 0.0,
        })
        .collect()
}

fn apply_tx(months: &mut [MonthTotals], tx: &TransactionWithNames) {
    let key = month_key(tx.transaction_date);
    let Some(month) = months.iter_mut().find(|m| m.month_key == key) else {
        return;
    };
    match tx.transaction_type {
        TransactionType::Income => month.income += tx.amount,
        TransactionType::Expense => month.expenses += tx.amount,
    }
}

fn finalize_months(months: &mut [MonthTotals]) -> (f64, f64) {
    let mut total_income = 0.0;
    let mut total_expenses = 0.0;
    for month in months.iter_mut() {
        month.net = month.income - month.expenses;
        total_income += month.income;
        total_expenses += month.expenses;
    }
    (total_income, total_expenses)
}

/// Build the annual series per resident
///
/// Transactions are expected to be completed rows for the given residents.
/// Output follows the resident input order (facility name, then resident
/// name).
pub fn aggregate_resident_annual(
    residents: &[ResidentWithFacility],
    transactions: &[TransactionWithNames],
    buckets: &[MonthBucket],
) -> Vec<ResidentAnnualSummary> {
    let mut summaries: Vec<ResidentAnnualSummary> = residents
        .iter()
        .map(|r| ResidentAnnualSummary {
            resident_id: r.id,
            resident_name: r.full_name(),
            nursing_home_id: r.nursing_home_id,
            nursing_home_name: r.nursing_home_name.clone(),
            months: zero_months(buckets),
            total_income: 0.0,
            total_expenses: 0.0,
            net_amount: 0.0,
        })
        .collect();

    let index: BTreeMap<i64, usize> = residents
        .iter()
        .enumerate()
        .map(|(i, r)| (r.id, i))
        .collect();

    for tx in transactions {
        let Some(resident_id) = tx.resident_id else {
            continue;
        };
        let Some(&i) = index.get(&resident_id) else {
            continue;
        };
        apply_tx(&mut summaries[i].months, tx);
    }

    for summary in &mut summaries {
        let (income, expenses) = finalize_months(&mut summary.months);
        summary.total_income = income;
        summary.total_expenses = expenses;
        summary.net_amount = income - expenses;
    }
    summaries
}

/// Build the annual series per facility
///
/// Transactions are expected to be completed rows, facility-attributed.
/// Output is sorted by facility name ascending.
pub fn aggregate_facility_annual(
    facilities: &[NursingHome],
    transactions: &[TransactionWithNames],
    buckets: &[MonthBucket],
) -> Vec<FacilityAnnualSummary> {
    let mut summaries: Vec<FacilityAnnualSummary> = facilities
        .iter()
        .map(|h| FacilityAnnualSummary {
            nursing_home_id: h.id,
            nursing_home_name: h.name.clone(),
            months: zero_months(buckets),
            total_income: 0.0,
            total_expenses: 0.0,
            net_amount: 0.0,
        })
        .collect();

    let index: BTreeMap<i64, usize> = facilities
        .iter()
        .enumerate()
        .map(|(i, h)| (h.id, i))
        .collect();

    for tx in transactions {
        let Some(home_id) = tx.nursing_home_id else {
            continue;
        };
        let Some(&i) = index.get(&home_id) else {
            continue;
        };
        apply_tx(&mut summaries[i].months, tx);
    }

    for summary in &mut summaries {
        let (income, expenses) = finalize_months(&mut summary.months);
        summary.total_income = income;
        summary.total_expenses = expenses;
        summary.net_amount = income - expenses;
    }
    summaries.sort_by(|a, b| a.nursing_home_name.cmp(&b.nursing_home_name));
    summaries
}

//! Monthly income aggregator (residents × nursing home × month)
//!
//! Produces one row per (facility, month) among the scoped residents, with a
//! per-resident detail for every resident of that facility in every bucket.
//! Facilities with no residents in scope produce no rows.

use std::collections::BTreeMap;

use crate::models::{
    FacilityMonthlyIncome, MonthBucket, ResidentIncomeDetail, ResidentWithFacility,
    TransactionStatus, TransactionWithNames,
};

use super::buckets::month_key;

/// Build the monthly income breakdown
///
/// Transactions are expected to be income rows for the given residents,
/// completed and pending. Pending rows are listed in each resident's
/// transaction list and count toward observed categories, but only completed
/// amounts sum into totals.
pub fn aggregate_monthly_income(
    residents: &[ResidentWithFacility],
    transactions: &[TransactionWithNames],
    buckets: &[MonthBucket],
) -> Vec<FacilityMonthlyIncome> {
    // Facility roster: residents grouped by facility id
    let mut roster: BTreeMap<i64, (String, Vec<&ResidentWithFacility>)> = BTreeMap::new();
    for resident in residents {
        roster
            .entry(resident.nursing_home_id)
            .or_insert_with(|| (resident.nursing_home_name.clone(), vec![]))
            .1
            .push(resident);
    }

    // One zero-filled row per (facility, month), every resident present
    let mut rows: BTreeMap<(i64, String), FacilityMonthlyIncome> = BTreeMap::new();
    for (&home_id, (home_name, members)) in &roster {
        for bucket in buckets {
            rows.insert(
                (home_id, bucket.key.clone()),
                FacilityMonthlyIncome {
                    nursing_home_id: home_id,
                    nursing_home_name: home_name.clone(),
                    month: bucket.display.clone(),
                    month_key: bucket.key.clone(),
                    total_income: 0.0,
                    total_transactions: 0,
                    resident_details: members
                        .iter()
                        .map(|r| ResidentIncomeDetail {
                            resident_id: r.id,
                            resident_name: r.full_name(),
                            expected_income_types: r.income_types.clone(),
                            total_income: 0.0,
                            transactions: vec![],
                            missing_income_types: vec![],
                            has_income_issues: false,
                        })
                        .collect(),
                },
            );
        }
    }

    // Resident -> facility index for transaction assignment
    let facility_of: BTreeMap<i64, i64> = residents
        .iter()
        .map(|r| (r.id, r.nursing_home_id))
        .collect();

    for tx in transactions {
        let Some(resident_id) = tx.resident_id else {
            continue;
        };
        let Some(&home_id) = facility_of.get(&resident_id) else {
            continue;
        };
        let Some(row) = rows.get_mut(&(home_id, month_key(tx.transaction_date))) else {
            // Outside the bucket range
            continue;
        };

        row.total_transactions += 1;
        let completed = tx.status == TransactionStatus::Completed;
        if completed {
            row.total_income += tx.amount;
        }
        if let Some(detail) = row
            .resident_details
            .iter_mut()
            .find(|d| d.resident_id == resident_id)
        {
            if completed {
                detail.total_income += tx.amount;
            }
            detail.transactions.push(tx.clone());
        }
    }

    let mut output: Vec<FacilityMonthlyIncome> = rows.into_values().collect();
    for row in &mut output {
        for detail in &mut row.resident_details {
            detail
                .transactions
                .sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date).then(b.id.cmp(&a.id)));
            detail.missing_income_types =
                missing_income_types(&detail.expected_income_types, &detail.transactions);
            detail.has_income_issues = !detail.missing_income_types.is_empty();
        }
    }
    output.sort_by(|a, b| {
        a.nursing_home_name
            .cmp(&b.nursing_home_name)
            .then(a.month_key.cmp(&b.month_key))
    });
    output
}

/// Expected income types (lower-cased) with no observed category that month
///
/// A type is matched when any observed category contains it or is contained
/// by it, compared case-insensitively. Pending transactions count as
/// observations.
fn missing_income_types(
    expected: &[String],
    observed: &[TransactionWithNames],
) -> Vec<String> {
    let categories: Vec<String> = observed.iter().map(|t| t.category.to_lowercase()).collect();
    expected
        .iter()
        .map(|e| e.to_lowercase())
        .filter(|e| !categories.iter().any(|c| c.contains(e.as_str()) || e.contains(c.as_str())))
        .collect()
}

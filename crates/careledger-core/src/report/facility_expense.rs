//! Facility expense aggregator
//!
//! One row per (facility, month), grouping completed expense transactions by
//! category with per-category totals and counts. Every facility in scope gets
//! a zero-filled row for every bucket.

use std::collections::BTreeMap;

use crate::models::{
    ExpenseCategoryTotal, FacilityExpenseMonth, MonthBucket, NursingHome, TransactionType,
    TransactionWithNames,
};

use super::buckets::month_key;

/// Build the expense breakdown per facility and month
pub fn aggregate_facility_expenses(
    facilities: &[NursingHome],
    transactions: &[TransactionWithNames],
    buckets: &[MonthBucket],
) -> Vec<FacilityExpenseMonth> {
    let mut rows: BTreeMap<(i64, String), FacilityExpenseMonth> = BTreeMap::new();
    for home in facilities {
        for bucket in buckets {
            rows.insert(
                (home.id, bucket.key.clone()),
                FacilityExpenseMonth {
                    nursing_home_id: home.id,
                    nursing_home_name: home.name.clone(),
                    month: bucket.display.clone(),
                    month_key: bucket.key.clone(),
                    total_expenses: 0.0,
                    transaction_count: 0,
                    categories: vec![],
                },
            );
        }
    }

    for tx in transactions {
        if tx.transaction_type != TransactionType::Expense {
            continue;
        }
        let Some(home_id) = tx.nursing_home_id else {
            continue;
        };
        let Some(row) = rows.get_mut(&(home_id, month_key(tx.transaction_date))) else {
            continue;
        };

        row.total_expenses += tx.amount;
        row.transaction_count += 1;
        match row.categories.iter_mut().find(|c| c.category == tx.category) {
            Some(cat) => {
                cat.total_amount += tx.amount;
                cat.transaction_count += 1;
            }
            None => row.categories.push(ExpenseCategoryTotal {
                category: tx.category.clone(),
                total_amount: tx.amount,
                transaction_count: 1,
            }),
        }
    }

    let mut output: Vec<FacilityExpenseMonth> = rows.into_values().collect();
    for row in &mut output {
        row.categories.sort_by(|a, b| {
            b.total_amount
                .partial_cmp(&a.total_amount)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.category.cmp(&b.category))
        });
    }
    output.sort_by(|a, b| {
        a.nursing_home_name
            .cmp(&b.nursing_home_name)
            .then(a.month_key.cmp(&b.month_key))
    });
    output
}

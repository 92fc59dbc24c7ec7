//! Income/expense-by-category aggregator (single facility)
//!
//! One row per month for the facility, each holding a per-resident breakdown
//! where that month's transactions are partitioned into income and expense
//! sides and grouped by category. The facility id is resolved by the
//! orchestrator; a configuration without one never reaches this module.

use std::collections::BTreeMap;

use crate::models::{
    CategoryGroup, MonthBucket, MonthCategoryRow, ResidentCategoryDetail, ResidentWithFacility,
    TransactionType, TransactionWithNames,
};

use super::buckets::month_key;

/// Build the month/category breakdown for one facility
///
/// Transactions are expected to be completed income and expense rows for the
/// facility's residents. A facility with no residents still yields one
/// zero-filled row per bucket.
pub fn aggregate_month_category(
    home_id: i64,
    home_name: &str,
    residents: &[ResidentWithFacility],
    transactions: &[TransactionWithNames],
    buckets: &[MonthBucket],
) -> Vec<MonthCategoryRow> {
    let mut rows: BTreeMap<String, MonthCategoryRow> = BTreeMap::new();
    for bucket in buckets {
        rows.insert(
            bucket.key.clone(),
            MonthCategoryRow {
                nursing_home_id: home_id,
                nursing_home_name: home_name.to_string(),
                month: bucket.display.clone(),
                month_key: bucket.key.clone(),
                total_income: 0.0,
                total_expenses: 0.0,
                net_amount: 0.0,
                residents: residents
                    .iter()
                    .map(|r| ResidentCategoryDetail {
                        resident_id: r.id,
                        resident_name: r.full_name(),
                        income_categories: vec![],
                        expense_categories: vec![],
                        total_income: 0.0,
                        total_expenses: 0.0,
                        net_amount: 0.0,
                    })
                    .collect(),
            },
        );
    }

    for tx in transactions {
        let Some(resident_id) = tx.resident_id else {
            continue;
        };
        let Some(row) = rows.get_mut(&month_key(tx.transaction_date)) else {
            continue;
        };
        let Some(detail) = row
            .residents
            .iter_mut()
            .find(|d| d.resident_id == resident_id)
        else {
            continue;
        };

        let groups = match tx.transaction_type {
            TransactionType::Income => &mut detail.income_categories,
            TransactionType::Expense => &mut detail.expense_categories,
        };
        push_into_group(groups, tx);
    }

    let mut output: Vec<MonthCategoryRow> = rows.into_values().collect();
    for row in &mut output {
        for detail in &mut row.residents {
            finalize_groups(&mut detail.income_categories);
            finalize_groups(&mut detail.expense_categories);
            detail.total_income = detail.income_categories.iter().map(|g| g.total_amount).sum();
            detail.total_expenses = detail.expense_categories.iter().map(|g| g.total_amount).sum();
            detail.net_amount = detail.total_income - detail.total_expenses;
        }
        row.total_income = row.residents.iter().map(|d| d.total_income).sum();
        row.total_expenses = row.residents.iter().map(|d| d.total_expenses).sum();
        row.net_amount = row.total_income - row.total_expenses;
    }
    output
}

fn push_into_group(groups: &mut Vec<CategoryGroup>, tx: &TransactionWithNames) {
    match groups.iter_mut().find(|g| g.category == tx.category) {
        Some(group) => {
            group.total_amount += tx.amount;
            group.transaction_count += 1;
            group.transactions.push(tx.clone());
        }
        None => groups.push(CategoryGroup {
            category: tx.category.clone(),
            total_amount: tx.amount,
            transaction_count: 1,
            transactions: vec![tx.clone()],
        }),
    }
}

fn finalize_groups(groups: &mut [CategoryGroup]) {
    for group in groups.iter_mut() {
        group
            .transactions
            .sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date).then(b.id.cmp(&a.id)));
    }
    groups.sort_by(|a, b| {
        b.total_amount
            .partial_cmp(&a.total_amount)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.category.cmp(&b.category))
    });
}

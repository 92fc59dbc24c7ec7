//! Income/expense summary aggregator (multi-resident, multi-facility)
//!
//! One row per (facility, month) among the scoped residents, carrying facility
//! totals plus a per-resident roll-up with categorized monthly expenses.

use std::collections::BTreeMap;

use crate::models::{
    ExpenseCategoryTotal, FacilityIncomeExpenseMonth, MonthBucket, ResidentFinancialSummary,
    ResidentWithFacility, TransactionType, TransactionWithNames,
};

use super::buckets::month_key;

/// Build the income/expense summary
///
/// Transactions are expected to be completed income and expense rows for the
/// given residents.
pub fn aggregate_income_expense(
    residents: &[ResidentWithFacility],
    transactions: &[TransactionWithNames],
    buckets: &[MonthBucket],
) -> Vec<FacilityIncomeExpenseMonth> {
    let mut roster: BTreeMap<i64, (String, Vec<&ResidentWithFacility>)> = BTreeMap::new();
    for resident in residents {
        roster
            .entry(resident.nursing_home_id)
            .or_insert_with(|| (resident.nursing_home_name.clone(), vec![]))
            .1
            .push(resident);
    }

    let mut rows: BTreeMap<(i64, String), FacilityIncomeExpenseMonth> = BTreeMap::new();
    for (&home_id, (home_name, members)) in &roster {
        for bucket in buckets {
            rows.insert(
                (home_id, bucket.key.clone()),
                FacilityIncomeExpenseMonth {
                    nursing_home_id: home_id,
                    nursing_home_name: home_name.clone(),
                    month: bucket.display.clone(),
                    month_key: bucket.key.clone(),
                    total_income: 0.0,
                    total_expenses: 0.0,
                    net_amount: 0.0,
                    resident_summaries: members
                        .iter()
                        .map(|r| ResidentFinancialSummary {
                            resident_id: r.id,
                            resident_name: r.full_name(),
                            monthly_income: 0.0,
                            monthly_expenses: vec![],
                            total_expenses: 0.0,
                            net_amount: 0.0,
                        })
                        .collect(),
                },
            );
        }
    }

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
            continue;
        };
        let Some(summary) = row
            .resident_summaries
            .iter_mut()
            .find(|s| s.resident_id == resident_id)
        else {
            continue;
        };

        match tx.transaction_type {
            TransactionType::Income => summary.monthly_income += tx.amount,
            TransactionType::Expense => {
                match summary
                    .monthly_expenses
                    .iter_mut()
                    .find(|c| c.category == tx.category)
                {
                    Some(cat) => {
                        cat.total_amount += tx.amount;
                        cat.transaction_count += 1;
                    }
                    None => summary.monthly_expenses.push(ExpenseCategoryTotal {
                        category: tx.category.clone(),
                        total_amount: tx.amount,
                        transaction_count: 1,
                    }),
                }
            }
        }
    }

    let mut output: Vec<FacilityIncomeExpenseMonth> = rows.into_values().collect();
    for row in &mut output {
        for summary in &mut row.resident_summaries {
            summary.monthly_expenses.sort_by(|a, b| {
                b.total_amount
                    .partial_cmp(&a.total_amount)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.category.cmp(&b.category))
            });
            summary.total_expenses = summary.monthly_expenses.iter().map(|c| c.total_amount).sum();
            summary.net_amount = summary.monthly_income - summary.total_expenses;
        }
        row.resident_summaries.sort_by(|a, b| {
            b.net_amount
                .partial_cmp(&a.net_amount)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.resident_name.cmp(&b.resident_name))
        });
        row.total_income = row.resident_summaries.iter().map(|s| s.monthly_income).sum();
        row.total_expenses = row.resident_summaries.iter().map(|s| s.total_expenses).sum();
        row.net_amount = row.total_income - row.total_expenses;
    }
    output.sort_by(|a, b| {
        a.nursing_home_name
            .cmp(&b.nursing_home_name)
            .then(a.month_key.cmp(&b.month_key))
    });
    output
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::{DateRange, TransactionStatus};
    use crate::report::buckets::month_buckets;

    fn resident(id: i64, first: &str, last: &str, home: (i64, &str)) -> ResidentWithFacility {
        ResidentWithFacility {
            id,
            first_name: first.to_string(),
            last_name: last.to_string(),
            income_types: vec![],
            nursing_home_id: home.0,
            nursing_home_name: home.1.to_string(),
        }
    }

    fn tx(
        id: i64,
        resident: &ResidentWithFacility,
        transaction_type: TransactionType,
        category: &str,
        amount: f64,
        date: (i32, u32, u32),
    ) -> TransactionWithNames {
        TransactionWithNames {
            id,
            transaction_type,
            category: category.to_string(),
            amount,
            transaction_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            status: TransactionStatus::Completed,
            nursing_home_id: Some(resident.nursing_home_id),
            resident_id: Some(resident.id),
            description: None,
            payment_method: None,
            reference_number: None,
            resident_name: resident.full_name(),
            nursing_home_name: resident.nursing_home_name.clone(),
        }
    }

    fn jan_only() -> Vec<MonthBucket> {
        month_buckets(&DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        ))
    }

    #[test]
    fn test_resident_rollup_and_facility_totals() {
        let jane = resident(1, "Jane", "Doe", (1, "Oak Manor"));
        let bob = resident(2, "Bob", "Ray", (1, "Oak Manor"));
        let txs = vec![
            tx(1, &jane, TransactionType::Income, "SSI", 900.0, (2024, 1, 3)),
            tx(2, &jane, TransactionType::Expense, "Pharmacy", 100.0, (2024, 1, 9)),
            tx(3, &bob, TransactionType::Income, "Pension", 400.0, (2024, 1, 4)),
            tx(4, &bob, TransactionType::Expense, "Supplies", 50.0, (2024, 1, 11)),
            tx(5, &bob, TransactionType::Expense, "Supplies", 25.0, (2024, 1, 18)),
        ];

        let rows = aggregate_income_expense(&[jane, bob], &txs, &jan_only());
        assert_eq!(rows.len(), 1);
        let row = &rows[0];

        assert_eq!(row.total_income, 1300.0);
        assert_eq!(row.total_expenses, 175.0);
        assert_eq!(row.net_amount, 1125.0);

        // Resident summaries sorted by net descending: Jane 800 before Bob 325
        assert_eq!(row.resident_summaries[0].resident_name, "Jane Doe");
        assert_eq!(row.resident_summaries[0].net_amount, 800.0);
        assert_eq!(row.resident_summaries[1].net_amount, 325.0);

        let bob_summary = &row.resident_summaries[1];
        assert_eq!(bob_summary.monthly_expenses.len(), 1);
        assert_eq!(bob_summary.monthly_expenses[0].total_amount, 75.0);
        assert_eq!(bob_summary.monthly_expenses[0].transaction_count, 2);
    }

    #[test]
    fn test_resident_totals_conserve_row_totals() {
        let jane = resident(1, "Jane", "Doe", (1, "Oak Manor"));
        let txs = vec![
            tx(1, &jane, TransactionType::Income, "SSI", 500.0, (2024, 1, 3)),
            tx(2, &jane, TransactionType::Expense, "Rent", 300.0, (2024, 1, 5)),
        ];
        let rows = aggregate_income_expense(&[jane], &txs, &jan_only());
        let row = &rows[0];
        let income: f64 = row.resident_summaries.iter().map(|s| s.monthly_income).sum();
        let expenses: f64 = row.resident_summaries.iter().map(|s| s.total_expenses).sum();
        assert_eq!(income, row.total_income);
        assert_eq!(expenses, row.total_expenses);
    }

    #[test]
    fn test_multi_facility_rows_keyed_by_resident_facilities() {
        let jane = resident(1, "Jane", "Doe", (1, "Oak Manor"));
        let zoe = resident(2, "Zoe", "Ames", (2, "Willow Court"));
        let rows = aggregate_income_expense(&[jane, zoe], &[], &jan_only());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].nursing_home_name, "Oak Manor");
        assert_eq!(rows[1].nursing_home_name, "Willow Court");
    }
}

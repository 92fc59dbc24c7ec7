//! Denormalized fetchers feeding the report aggregators
//!
//! Each fetcher translates a logical request into store queries and returns
//! flat rows with resident/facility display names joined in ("-" when absent).
//! No grouping happens here; that is the aggregators' job.

use super::{parse_income_types, Database};
use crate::error::Result;
use crate::models::{DateRange, ResidentWithFacility, TransactionWithNames};

const TX_WITH_NAMES_SELECT: &str = r#"
    SELECT t.id, t.transaction_type, t.category, t.amount, t.transaction_date,
           t.status, t.nursing_home_id, t.resident_id, t.description,
           t.payment_method, t.reference_number,
           COALESCE(r.first_name || ' ' || r.last_name, '-') AS resident_name,
           COALESCE(n.name, '-') AS nursing_home_name
    FROM transactions t
    LEFT JOIN residents r ON r.id = t.resident_id
    LEFT JOIN nursing_homes n ON n.id = t.nursing_home_id
"#;

impl Database {
    /// Fetch completed transactions, optionally bounded by date range and
    /// scoped to one facility, newest first
    pub fn fetch_transactions(
        &self,
        range: Option<&DateRange>,
        nursing_home_id: Option<i64>,
    ) -> Result<Vec<TransactionWithNames>> {
        let mut sql = format!("{} WHERE t.status = 'completed'", TX_WITH_NAMES_SELECT);
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![];

        if let Some(range) = range {
            sql.push_str(&format!(
                " AND t.transaction_date >= ?{} AND t.transaction_date <= ?{}",
                params_vec.len() + 1,
                params_vec.len() + 2
            ));
            params_vec.push(Box::new(range.start.to_string()));
            params_vec.push(Box::new(range.end.to_string()));
        }
        if let Some(home_id) = nursing_home_id {
            sql.push_str(&format!(" AND t.nursing_home_id = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(home_id));
        }
        sql.push_str(" ORDER BY t.transaction_date DESC, t.id DESC");

        self.query_transactions_with_names(&sql, &params_vec)
    }

    /// Fetch residents that belong to a facility, optionally scoped to one,
    /// ordered by facility name then resident name
    pub fn fetch_residents_with_facility(
        &self,
        nursing_home_id: Option<i64>,
    ) -> Result<Vec<ResidentWithFacility>> {
        let conn = self.conn()?;
        let mut sql = String::from(
            r#"
            SELECT r.id, r.first_name, r.last_name, r.income_types,
                   r.nursing_home_id, n.name AS nursing_home_name
            FROM residents r
            JOIN nursing_homes n ON n.id = r.nursing_home_id
            "#,
        );
        if nursing_home_id.is_some() {
            sql.push_str(" WHERE r.nursing_home_id = ?1");
        }
        sql.push_str(" ORDER BY n.name, r.last_name, r.first_name, r.id");

        let map_row = |row: &rusqlite::Row<'_>| -> rusqlite::Result<ResidentWithFacility> {
            let income_types: Option<String> = row.get(3)?;
            Ok(ResidentWithFacility {
                id: row.get(0)?,
                first_name: row.get(1)?,
                last_name: row.get(2)?,
                income_types: parse_income_types(income_types),
                nursing_home_id: row.get(4)?,
                nursing_home_name: row.get(5)?,
            })
        };

        let mut stmt = conn.prepare(&sql)?;
        let rows = if let Some(home_id) = nursing_home_id {
            stmt.query_map(rusqlite::params![home_id], map_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?
        } else {
            stmt.query_map([], map_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?
        };
        Ok(rows)
    }

    /// Fetch income transactions for the given residents, completed and
    /// pending (cancelled excluded), newest first
    ///
    /// Pending rows stay visible in monthly-income transaction lists and feed
    /// missing-income detection, but never contribute to totals.
    pub fn fetch_income_transactions(
        &self,
        resident_ids: &[i64],
        range: Option<&DateRange>,
    ) -> Result<Vec<TransactionWithNames>> {
        self.fetch_resident_transactions(
            resident_ids,
            range,
            "t.transaction_type = 'income' AND t.status IN ('completed', 'pending')",
        )
    }

    /// Fetch all completed transactions (income and expense) for the given
    /// residents, newest first
    pub fn fetch_all_transactions(
        &self,
        resident_ids: &[i64],
        range: Option<&DateRange>,
    ) -> Result<Vec<TransactionWithNames>> {
        self.fetch_resident_transactions(resident_ids, range, "t.status = 'completed'")
    }

    fn fetch_resident_transactions(
        &self,
        resident_ids: &[i64],
        range: Option<&DateRange>,
        filter: &str,
    ) -> Result<Vec<TransactionWithNames>> {
        if resident_ids.is_empty() {
            return Ok(vec![]);
        }

        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![];
        let placeholders: Vec<String> = resident_ids
            .iter()
            .enumerate()
            .map(|(i, _)| format!("?{}", i + 1))
            .collect();
        for id in resident_ids {
            params_vec.push(Box::new(*id));
        }

        let mut sql = format!(
            "{} WHERE {} AND t.resident_id IN ({})",
            TX_WITH_NAMES_SELECT,
            filter,
            placeholders.join(",")
        );
        if let Some(range) = range {
            sql.push_str(&format!(
                " AND t.transaction_date >= ?{} AND t.transaction_date <= ?{}",
                params_vec.len() + 1,
                params_vec.len() + 2
            ));
            params_vec.push(Box::new(range.start.to_string()));
            params_vec.push(Box::new(range.end.to_string()));
        }
        sql.push_str(" ORDER BY t.transaction_date DESC, t.id DESC");

        self.query_transactions_with_names(&sql, &params_vec)
    }

    fn query_transactions_with_names(
        &self,
        sql: &str,
        params_vec: &[Box<dyn rusqlite::ToSql>],
    ) -> Result<Vec<TransactionWithNames>> {
        let conn = self.conn()?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();

        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(param_refs.as_slice(), |row| {
            let type_str: String = row.get(1)?;
            let date_str: String = row.get(4)?;
            let status_str: String = row.get(5)?;
            Ok(TransactionWithNames {
                id: row.get(0)?,
                transaction_type: type_str.parse().map_err(|e: String| {
                    rusqlite::Error::FromSqlConversionFailure(
                        1,
                        rusqlite::types::Type::Text,
                        e.into(),
                    )
                })?,
                category: row.get(2)?,
                amount: row.get(3)?,
                transaction_date: chrono::NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
                    .map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            4,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?,
                status: status_str.parse().map_err(|e: String| {
                    rusqlite::Error::FromSqlConversionFailure(
                        5,
                        rusqlite::types::Type::Text,
                        e.into(),
                    )
                })?,
                nursing_home_id: row.get(6)?,
                resident_id: row.get(7)?,
                description: row.get(8)?,
                payment_method: row.get(9)?,
                reference_number: row.get(10)?,
                resident_name: row.get(11)?,
                nursing_home_name: row.get(12)?,
            })
        })?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::{
        NewFinancialTransaction, NewNursingHome, NewResident, TransactionStatus, TransactionType,
    };

    struct Fixture {
        db: Database,
        home_id: i64,
        resident_id: i64,
    }

    fn fixture() -> Fixture {
        let db = Database::in_memory().unwrap();
        let home_id = db
            .insert_nursing_home(&NewNursingHome {
                name: "Oak Manor".to_string(),
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                capacity: 80,
            })
            .unwrap();
        let resident_id = db
            .insert_resident(&NewResident {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                nursing_home_id: Some(home_id),
                income_types: vec!["SSI".to_string()],
            })
            .unwrap();
        Fixture {
            db,
            home_id,
            resident_id,
        }
    }

    fn insert_tx(
        fx: &Fixture,
        transaction_type: TransactionType,
        status: TransactionStatus,
        amount: f64,
        date: (i32, u32, u32),
    ) -> i64 {
        fx.db
            .insert_transaction(&NewFinancialTransaction {
                transaction_type,
                category: "SSI".to_string(),
                amount,
                transaction_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
                status,
                nursing_home_id: Some(fx.home_id),
                resident_id: Some(fx.resident_id),
                description: None,
                payment_method: None,
                reference_number: None,
            })
            .unwrap()
    }

    #[test]
    fn test_fetch_transactions_completed_only_with_names() {
        let fx = fixture();
        insert_tx(&fx, TransactionType::Income, TransactionStatus::Completed, 100.0, (2024, 1, 15));
        insert_tx(&fx, TransactionType::Income, TransactionStatus::Pending, 50.0, (2024, 1, 16));
        insert_tx(&fx, TransactionType::Income, TransactionStatus::Cancelled, 25.0, (2024, 1, 17));

        let rows = fx.db.fetch_transactions(None, None).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, 100.0);
        assert_eq!(rows[0].resident_name, "Jane Doe");
        assert_eq!(rows[0].nursing_home_name, "Oak Manor");
    }

    #[test]
    fn test_fetch_transactions_name_fallback() {
        let fx = fixture();
        fx.db
            .insert_transaction(&NewFinancialTransaction {
                transaction_type: TransactionType::Expense,
                category: "Supplies".to_string(),
                amount: 40.0,
                transaction_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
                status: TransactionStatus::Completed,
                nursing_home_id: None,
                resident_id: None,
                description: None,
                payment_method: None,
                reference_number: None,
            })
            .unwrap();

        let rows = fx.db.fetch_transactions(None, None).unwrap();
        assert_eq!(rows[0].resident_name, "-");
        assert_eq!(rows[0].nursing_home_name, "-");
    }

    #[test]
    fn test_fetch_transactions_date_and_facility_filters() {
        let fx = fixture();
        insert_tx(&fx, TransactionType::Income, TransactionStatus::Completed, 1.0, (2024, 1, 10));
        insert_tx(&fx, TransactionType::Income, TransactionStatus::Completed, 2.0, (2024, 2, 10));
        insert_tx(&fx, TransactionType::Income, TransactionStatus::Completed, 3.0, (2024, 3, 10));

        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
        );
        let rows = fx.db.fetch_transactions(Some(&range), Some(fx.home_id)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, 2.0);

        let none = fx.db.fetch_transactions(Some(&range), Some(fx.home_id + 99)).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_fetch_income_transactions_keeps_pending_drops_cancelled() {
        let fx = fixture();
        insert_tx(&fx, TransactionType::Income, TransactionStatus::Completed, 100.0, (2024, 1, 15));
        insert_tx(&fx, TransactionType::Income, TransactionStatus::Pending, 50.0, (2024, 1, 20));
        insert_tx(&fx, TransactionType::Income, TransactionStatus::Cancelled, 10.0, (2024, 1, 21));
        insert_tx(&fx, TransactionType::Expense, TransactionStatus::Completed, 30.0, (2024, 1, 22));

        let rows = fx
            .db
            .fetch_income_transactions(&[fx.resident_id], None)
            .unwrap();
        assert_eq!(rows.len(), 2);
        // Newest first
        assert_eq!(rows[0].status, TransactionStatus::Pending);
        assert_eq!(rows[1].status, TransactionStatus::Completed);
    }

    #[test]
    fn test_fetch_all_transactions_completed_both_types() {
        let fx = fixture();
        insert_tx(&fx, TransactionType::Income, TransactionStatus::Completed, 100.0, (2024, 1, 15));
        insert_tx(&fx, TransactionType::Expense, TransactionStatus::Completed, 30.0, (2024, 1, 16));
        insert_tx(&fx, TransactionType::Expense, TransactionStatus::Pending, 5.0, (2024, 1, 17));

        let rows = fx.db.fetch_all_transactions(&[fx.resident_id], None).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|t| t.status == TransactionStatus::Completed));
    }

    #[test]
    fn test_fetch_with_empty_resident_list() {
        let fx = fixture();
        assert!(fx.db.fetch_income_transactions(&[], None).unwrap().is_empty());
        assert!(fx.db.fetch_all_transactions(&[], None).unwrap().is_empty());
    }

    #[test]
    fn test_fetch_residents_with_facility() {
        let fx = fixture();
        // Resident without a facility is excluded
        fx.db
            .insert_resident(&NewResident {
                first_name: "Una".to_string(),
                last_name: "Assigned".to_string(),
                nursing_home_id: None,
                income_types: vec![],
            })
            .unwrap();

        let rows = fx.db.fetch_residents_with_facility(None).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].full_name(), "Jane Doe");
        assert_eq!(rows[0].nursing_home_name, "Oak Manor");
        assert_eq!(rows[0].income_types, vec!["SSI"]);
    }
}

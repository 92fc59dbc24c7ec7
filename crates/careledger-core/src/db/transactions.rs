//! Financial transaction operations

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{FinancialTransaction, NewFinancialTransaction};

impl Database {
    /// Insert a transaction, returning its new id
    ///
    /// Amounts are non-negative; direction comes from transaction_type.
    pub fn insert_transaction(&self, tx: &NewFinancialTransaction) -> Result<i64> {
        if tx.amount < 0.0 {
            return Err(Error::InvalidData(format!(
                "Transaction amount must be non-negative, got {}",
                tx.amount
            )));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO transactions
                (transaction_type, category, amount, transaction_date, status,
                 nursing_home_id, resident_id, description, payment_method, reference_number)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                tx.transaction_type.as_str(),
                tx.category,
                tx.amount,
                tx.transaction_date.to_string(),
                tx.status.as_str(),
                tx.nursing_home_id,
                tx.resident_id,
                tx.description,
                tx.payment_method,
                tx.reference_number,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get a transaction by id
    pub fn get_transaction(&self, id: i64) -> Result<FinancialTransaction> {
        let conn = self.conn()?;
        conn.query_row(
            r#"
            SELECT id, transaction_type, category, amount, transaction_date, status,
                   nursing_home_id, resident_id, description, payment_method,
                   reference_number, created_at
            FROM transactions WHERE id = ?1
            "#,
            params![id],
            map_transaction,
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("Transaction not found: {}", id)))
    }

    /// List transactions with offset/limit pagination, newest first
    pub fn list_transactions(
        &self,
        nursing_home_id: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FinancialTransaction>> {
        let conn = self.conn()?;
        let mut sql = String::from(
            r#"
            SELECT id, transaction_type, category, amount, transaction_date, status,
                   nursing_home_id, resident_id, description, payment_method,
                   reference_number, created_at
            FROM transactions
            "#,
        );

        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![];
        if let Some(home_id) = nursing_home_id {
            sql.push_str(&format!(" WHERE nursing_home_id = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(home_id));
        }
        sql.push_str(&format!(
            " ORDER BY transaction_date DESC, id DESC LIMIT ?{} OFFSET ?{}",
            params_vec.len() + 1,
            params_vec.len() + 2
        ));
        params_vec.push(Box::new(limit));
        params_vec.push(Box::new(offset));

        let param_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(param_refs.as_slice(), map_transaction)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    /// Delete a transaction
    pub fn delete_transaction(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM transactions WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Transaction not found: {}", id)));
        }
        Ok(())
    }
}

fn map_transaction(row: &rusqlite::Row<'_>) -> rusqlite::Result<FinancialTransaction> {
    let type_str: String = row.get(1)?;
    let status_str: String = row.get(5)?;
    let date_str: String = row.get(4)?;
    let created_at_str: String = row.get(11)?;
    Ok(FinancialTransaction {
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
        transaction_date: chrono::NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(
            |e| {
                rusqlite::Error::FromSqlConversionFailure(
                    4,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            },
        )?,
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
        created_at: parse_datetime(&created_at_str),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::models::{TransactionStatus, TransactionType};

    fn tx(amount: f64, day: u32) -> NewFinancialTransaction {
        NewFinancialTransaction {
            transaction_type: TransactionType::Income,
            category: "SSI".to_string(),
            amount,
            transaction_date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            status: TransactionStatus::Completed,
            nursing_home_id: None,
            resident_id: None,
            description: None,
            payment_method: None,
            reference_number: None,
        }
    }

    #[test]
    fn test_transaction_round_trip() {
        let db = Database::in_memory().unwrap();
        let id = db
            .insert_transaction(&NewFinancialTransaction {
                description: Some("March benefit".to_string()),
                payment_method: Some("check".to_string()),
                reference_number: Some("REF-001".to_string()),
                ..tx(712.5, 3)
            })
            .unwrap();

        let stored = db.get_transaction(id).unwrap();
        assert_eq!(stored.transaction_type, TransactionType::Income);
        assert_eq!(stored.status, TransactionStatus::Completed);
        assert_eq!(stored.amount, 712.5);
        assert_eq!(stored.category, "SSI");
        assert_eq!(stored.reference_number.as_deref(), Some("REF-001"));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let db = Database::in_memory().unwrap();
        let result = db.insert_transaction(&tx(-5.0, 1));
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_list_transactions_pagination_newest_first() {
        let db = Database::in_memory().unwrap();
        for day in 1..=5 {
            db.insert_transaction(&tx(day as f64, day)).unwrap();
        }

        let page = db.list_transactions(None, 2, 0).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].transaction_date.to_string(), "2024-03-05");
        assert_eq!(page[1].transaction_date.to_string(), "2024-03-04");

        let next = db.list_transactions(None, 2, 2).unwrap();
        assert_eq!(next[0].transaction_date.to_string(), "2024-03-03");
    }
}

//! Database tests

use super::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_db() {
        let db = Database::in_memory().unwrap();
        let homes = db.list_nursing_homes().unwrap();
        assert!(homes.is_empty());
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let db = Database::in_memory().unwrap();
        // Re-running against an existing schema must not fail
        db.run_migrations().unwrap();
        db.run_migrations().unwrap();
    }

    #[test]
    fn test_schema_tables_exist() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN \
                 ('nursing_homes', 'residents', 'transactions', 'report_configurations', 'generated_reports')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 5, "all five tables should exist");
    }

    #[test]
    fn test_transactions_schema_columns() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('transactions') WHERE name IN \
                 ('id', 'transaction_type', 'category', 'amount', 'transaction_date', 'status', \
                  'nursing_home_id', 'resident_id', 'description', 'payment_method', 'reference_number')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 11, "transactions table should have 11 expected columns");
    }

    #[test]
    fn test_amount_check_constraint() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();

        let result = conn.execute(
            "INSERT INTO transactions (transaction_type, category, amount, transaction_date, status) \
             VALUES ('income', 'SSI', -1.0, '2024-01-01', 'completed')",
            [],
        );
        assert!(result.is_err(), "negative amounts should violate the CHECK constraint");
    }

    #[test]
    fn test_status_defaults_to_completed() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();

        conn.execute(
            "INSERT INTO transactions (transaction_type, category, amount, transaction_date) \
             VALUES ('income', 'SSI', 10.0, '2024-01-01')",
            [],
        )
        .unwrap();
        let status: String = conn
            .query_row("SELECT status FROM transactions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(status, "completed");
    }

    #[test]
    fn test_derive_key_is_deterministic() {
        let a = derive_key("correct horse battery staple").unwrap();
        let b = derive_key("correct horse battery staple").unwrap();
        let c = derive_key("something else").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        // Hex encoded
        assert!(a.chars().all(|ch| ch.is_ascii_hexdigit()));
    }

    #[test]
    fn test_parse_datetime() {
        let dt = parse_datetime("2024-03-15 10:30:00");
        assert_eq!(dt.to_rfc3339(), "2024-03-15T10:30:00+00:00");
        // Unparseable input falls back to now rather than failing the row
        let fallback = parse_datetime("not a datetime");
        assert!(fallback <= Utc::now());
    }

    #[test]
    fn test_parse_income_types() {
        assert_eq!(
            parse_income_types(Some(r#"["SSI","Pension"]"#.to_string())),
            vec!["SSI".to_string(), "Pension".to_string()]
        );
        assert!(parse_income_types(Some("not json".to_string())).is_empty());
        assert!(parse_income_types(None).is_empty());
    }
}

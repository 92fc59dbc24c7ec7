//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use careledger_core::db::Database;
use careledger_core::models::{GeneratedReportStatus, NewReportConfiguration, ReportType};

use crate::commands::{self, truncate};

fn setup_test_db() -> Database {
    Database::in_memory().unwrap()
}

/// Seed a facility with one resident and one completed income transaction,
/// returning (facility_id, resident_id)
fn seed_facility(db: &Database) -> (i64, i64) {
    commands::cmd_facilities_add(db, "Oak Manor", "Springfield", "IL", 80).unwrap();
    let facility_id = db.list_nursing_homes().unwrap()[0].id;

    commands::cmd_residents_add(db, "Jane", "Doe", Some(facility_id), Some("SSI")).unwrap();
    let resident_id = db.list_residents(None).unwrap()[0].id;

    commands::cmd_transactions_add(
        db,
        "income",
        "SSI",
        500.0,
        "2024-01-15",
        "completed",
        Some(facility_id),
        Some(resident_id),
        None,
        None,
        None,
    )
    .unwrap();

    (facility_id, resident_id)
}

// ========== Facility Command Tests ==========

#[test]
fn test_cmd_facilities_add_and_list() {
    let db = setup_test_db();
    commands::cmd_facilities_add(&db, "Oak Manor", "Springfield", "IL", 80).unwrap();

    let homes = db.list_nursing_homes().unwrap();
    assert_eq!(homes.len(), 1);
    assert_eq!(homes[0].name, "Oak Manor");

    assert!(commands::cmd_facilities_list(&db).is_ok());
}

#[test]
fn test_cmd_facilities_delete_missing() {
    let db = setup_test_db();
    assert!(commands::cmd_facilities_delete(&db, 42).is_err());
}

// ========== Resident Command Tests ==========

#[test]
fn test_cmd_residents_add_parses_income_types() {
    let db = setup_test_db();
    commands::cmd_residents_add(&db, "Jane", "Doe", None, Some("SSI, Private Pay,")).unwrap();

    let residents = db.list_residents(None).unwrap();
    assert_eq!(residents[0].income_types, vec!["SSI", "Private Pay"]);
}

// ========== Transaction Command Tests ==========

#[test]
fn test_cmd_transactions_add_rejects_bad_input() {
    let db = setup_test_db();
    let bad_type = commands::cmd_transactions_add(
        &db, "transfer", "SSI", 10.0, "2024-01-01", "completed", None, None, None, None, None,
    );
    assert!(bad_type.is_err());

    let bad_date = commands::cmd_transactions_add(
        &db, "income", "SSI", 10.0, "01/15/2024", "completed", None, None, None, None, None,
    );
    assert!(bad_date.is_err());
}

#[test]
fn test_cmd_transactions_list() {
    let db = setup_test_db();
    seed_facility(&db);
    assert!(commands::cmd_transactions_list(&db, None, 20).is_ok());
}

// ========== Config Command Tests ==========

#[test]
fn test_cmd_configs_add_rejects_unknown_type() {
    let db = setup_test_db();
    let result = commands::cmd_configs_add(&db, "quarterly_digest", None, None, None);
    assert!(result.is_err());
}

// ========== Report Command Tests ==========

#[test]
fn test_cmd_report_generate_from_config_persists_record() {
    let db = setup_test_db();
    seed_facility(&db);

    commands::cmd_configs_add(
        &db,
        "residents_income_per_nursing_home_monthly",
        None,
        Some("2024-01-01"),
        Some("2024-02-28"),
    )
    .unwrap();
    let config_id = db.list_report_configs().unwrap()[0].id;

    commands::cmd_report_generate(&db, Some(config_id), None, None, None, None).unwrap();

    let reports = db.list_generated_reports(Some(config_id)).unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].status, GeneratedReportStatus::Completed);
    assert!(reports[0].payload.is_some());
}

#[test]
fn test_cmd_report_generate_records_failure() {
    let db = setup_test_db();
    seed_facility(&db);

    // Missing facility scope makes this report type fail
    let config_id = db
        .insert_report_config(&NewReportConfiguration {
            report_type: ReportType::ResidentIncomeExpenseByMonthCategory,
            nursing_home_id: None,
            date_range_start: None,
            date_range_end: None,
        })
        .unwrap();

    let result = commands::cmd_report_generate(&db, Some(config_id), None, None, None, None);
    assert!(result.is_err());

    let reports = db.list_generated_reports(Some(config_id)).unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].status, GeneratedReportStatus::Failed);
    assert!(reports[0].error.is_some());
}

#[test]
fn test_cmd_report_generate_ad_hoc_requires_type() {
    let db = setup_test_db();
    let result = commands::cmd_report_generate(&db, None, None, None, None, None);
    assert!(result.is_err());
}

#[test]
fn test_cmd_report_show_and_delete() {
    let db = setup_test_db();
    seed_facility(&db);

    commands::cmd_configs_add(
        &db,
        "transaction_report",
        None,
        Some("2024-01-01"),
        Some("2024-01-31"),
    )
    .unwrap();
    let config_id = db.list_report_configs().unwrap()[0].id;
    commands::cmd_report_generate(&db, Some(config_id), None, None, None, None).unwrap();

    let report_id = db.list_generated_reports(None).unwrap()[0].id;
    assert!(commands::cmd_report_show(&db, report_id).is_ok());

    commands::cmd_report_delete(&db, report_id).unwrap();
    assert!(db.get_generated_report(report_id).is_err());
}

#[test]
fn test_cmd_report_export_writes_file() {
    let db = setup_test_db();
    seed_facility(&db);

    commands::cmd_configs_add(
        &db,
        "transaction_report",
        None,
        Some("2024-01-01"),
        Some("2024-01-31"),
    )
    .unwrap();
    let config_id = db.list_report_configs().unwrap()[0].id;
    commands::cmd_report_generate(&db, Some(config_id), None, None, None, None).unwrap();
    let report_id = db.list_generated_reports(None).unwrap()[0].id;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    commands::cmd_report_export(&db, report_id, "workbook", Some(path.as_path())).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("Sheet,Summary"));
    assert!(content.contains("Sheet,Data"));
}

// ========== Utilities ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a longer string", 10), "a longe...");
}

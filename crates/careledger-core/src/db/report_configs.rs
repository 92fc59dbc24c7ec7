//! Report configurations and generated reports

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{
    GeneratedReport, GeneratedReportStatus, NewReportConfiguration, ReportConfiguration,
    ReportData, ReportType,
};

impl Database {
    /// Insert a report configuration, returning its new id
    pub fn insert_report_config(&self, config: &NewReportConfiguration) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO report_configurations
                (report_type, nursing_home_id, date_range_start, date_range_end)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                config.report_type.as_str(),
                config.nursing_home_id,
                config.date_range_start.map(|d| d.to_string()),
                config.date_range_end.map(|d| d.to_string()),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get a report configuration by id
    pub fn get_report_config(&self, id: i64) -> Result<ReportConfiguration> {
        let conn = self.conn()?;
        conn.query_row(
            r#"
            SELECT id, report_type, nursing_home_id, date_range_start, date_range_end, created_at
            FROM report_configurations WHERE id = ?1
            "#,
            params![id],
            map_report_config,
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("Report configuration not found: {}", id)))
    }

    /// List all report configurations, newest first
    pub fn list_report_configs(&self) -> Result<Vec<ReportConfiguration>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, report_type, nursing_home_id, date_range_start, date_range_end, created_at
            FROM report_configurations ORDER BY id DESC
            "#,
        )?;
        let rows = stmt.query_map([], map_report_config)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    /// Delete a report configuration and all reports generated from it
    ///
    /// The cascade is enforced here rather than by a database constraint.
    pub fn delete_report_config(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM generated_reports WHERE config_id = ?1",
            params![id],
        )?;
        let deleted = conn.execute(
            "DELETE FROM report_configurations WHERE id = ?1",
            params![id],
        )?;
        if deleted == 0 {
            return Err(Error::NotFound(format!(
                "Report configuration not found: {}",
                id
            )));
        }
        Ok(())
    }

    /// Record a successfully generated report, returning its new id
    pub fn insert_generated_report(&self, config_id: i64, report: &ReportData) -> Result<i64> {
        let conn = self.conn()?;
        let payload = serde_json::to_string(report)?;
        conn.execute(
            r#"
            INSERT INTO generated_reports (config_id, name, report_type, status, payload)
            VALUES (?1, ?2, ?3, 'completed', ?4)
            "#,
            params![config_id, report.name, report.report_type.as_str(), payload],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Record a failed report generation, returning its new id
    pub fn insert_failed_report(
        &self,
        config_id: i64,
        report_type: ReportType,
        error: &str,
    ) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO generated_reports (config_id, name, report_type, status, error)
            VALUES (?1, ?2, ?3, 'failed', ?4)
            "#,
            params![
                config_id,
                report_type.display_name(),
                report_type.as_str(),
                error
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get a generated report by id
    pub fn get_generated_report(&self, id: i64) -> Result<GeneratedReport> {
        let conn = self.conn()?;
        conn.query_row(
            r#"
            SELECT id, config_id, name, report_type, status, error, payload, created_at
            FROM generated_reports WHERE id = ?1
            "#,
            params![id],
            map_generated_report,
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("Generated report not found: {}", id)))
    }

    /// List generated reports, optionally scoped to one configuration, newest first
    pub fn list_generated_reports(&self, config_id: Option<i64>) -> Result<Vec<GeneratedReport>> {
        let conn = self.conn()?;
        let mut sql = String::from(
            r#"
            SELECT id, config_id, name, report_type, status, error, payload, created_at
            FROM generated_reports
            "#,
        );
        if config_id.is_some() {
            sql.push_str(" WHERE config_id = ?1");
        }
        sql.push_str(" ORDER BY id DESC");

        let mut stmt = conn.prepare(&sql)?;
        let rows = if let Some(cid) = config_id {
            stmt.query_map(params![cid], map_generated_report)?
                .collect::<std::result::Result<Vec<_>, _>>()?
        } else {
            stmt.query_map([], map_generated_report)?
                .collect::<std::result::Result<Vec<_>, _>>()?
        };
        Ok(rows)
    }

    /// Delete a generated report
    pub fn delete_generated_report(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM generated_reports WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Generated report not found: {}", id)));
        }
        Ok(())
    }
}

fn parse_report_type(idx: usize, raw: &str) -> rusqlite::Result<ReportType> {
    raw.parse().map_err(|e: String| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, e.into())
    })
}

fn parse_date_opt(idx: usize, raw: Option<String>) -> rusqlite::Result<Option<chrono::NaiveDate>> {
    raw.map(|s| {
        chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
    })
    .transpose()
}

fn map_report_config(row: &rusqlite::Row<'_>) -> rusqlite::Result<ReportConfiguration> {
    let type_str: String = row.get(1)?;
    let start: Option<String> = row.get(3)?;
    let end: Option<String> = row.get(4)?;
    let created_at_str: String = row.get(5)?;
    Ok(ReportConfiguration {
        id: row.get(0)?,
        report_type: parse_report_type(1, &type_str)?,
        nursing_home_id: row.get(2)?,
        date_range_start: parse_date_opt(3, start)?,
        date_range_end: parse_date_opt(4, end)?,
        created_at: parse_datetime(&created_at_str),
    })
}

fn map_generated_report(row: &rusqlite::Row<'_>) -> rusqlite::Result<GeneratedReport> {
    let type_str: String = row.get(3)?;
    let status_str: String = row.get(4)?;
    let created_at_str: String = row.get(7)?;
    Ok(GeneratedReport {
        id: row.get(0)?,
        config_id: row.get(1)?,
        name: row.get(2)?,
        report_type: parse_report_type(3, &type_str)?,
        status: status_str.parse::<GeneratedReportStatus>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, e.into())
        })?,
        error: row.get(5)?,
        payload: row.get(6)?,
        created_at: parse_datetime(&created_at_str),
    })
}

//! Report generation
//!
//! The orchestrator dispatches a report type to its fetch + aggregate +
//! summarize chain and wraps the result in the uniform `ReportData` envelope.
//! Aggregation itself is pure and deterministic; every generation reads fresh
//! rows from the store, so concurrent generations never share state.

use tracing::{debug, info};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{
    DateRange, FacilityOverview, NursingHome, ReportData, ReportRows, ReportType,
};

pub mod buckets;

mod annual;
mod facility_expense;
mod income_expense;
mod month_category;
mod monthly_income;
mod summary;

pub use annual::{aggregate_facility_annual, aggregate_resident_annual};
pub use facility_expense::aggregate_facility_expenses;
pub use income_expense::aggregate_income_expense;
pub use month_category::aggregate_month_category;
pub use monthly_income::aggregate_monthly_income;
pub use summary::*;

/// Dispatches report generation against a record store
pub struct ReportGenerator<'a> {
    db: &'a Database,
}

impl<'a> ReportGenerator<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Generate a report scoped by a stored configuration
    pub fn generate_for_config(&self, config_id: i64) -> Result<ReportData> {
        let config = self.db.get_report_config(config_id)?;
        let range = match (config.date_range_start, config.date_range_end) {
            (Some(start), Some(end)) => Some(DateRange::new(start, end)),
            _ => None,
        };
        self.generate(config.report_type, config.nursing_home_id, range)
    }

    /// Generate a report
    ///
    /// `nursing_home_id = None` means all facilities; a missing date range
    /// defaults to Jan 1 of the current year through today.
    pub fn generate(
        &self,
        report_type: ReportType,
        nursing_home_id: Option<i64>,
        range: Option<DateRange>,
    ) -> Result<ReportData> {
        let range = range.unwrap_or_else(DateRange::current_year_to_date);
        let buckets = buckets::month_buckets(&range);
        info!(%report_type, ?nursing_home_id, %range, "generating report");

        let (data, summary) = match report_type {
            ReportType::FinancialSummary => {
                let residents = self.db.fetch_residents_with_facility(nursing_home_id)?;
                let ids: Vec<i64> = residents.iter().map(|r| r.id).collect();
                let txs = self.db.fetch_all_transactions(&ids, Some(&range))?;
                let rows = aggregate_income_expense(&residents, &txs, &buckets);
                let summary = summarize_income_expense(&rows);
                (ReportRows::IncomeExpense(rows), summary)
            }
            ReportType::TransactionReport => {
                let txs = self.db.fetch_transactions(Some(&range), nursing_home_id)?;
                let summary = summarize_transactions(&txs);
                (ReportRows::Transactions(txs), summary)
            }
            ReportType::NursingHomeReport => {
                let facilities = self.scoped_facilities(nursing_home_id)?;
                let residents = self.db.fetch_residents_with_facility(nursing_home_id)?;
                let rows: Vec<FacilityOverview> = facilities
                    .into_iter()
                    .map(|h| {
                        let resident_count =
                            residents.iter().filter(|r| r.nursing_home_id == h.id).count() as i64;
                        FacilityOverview {
                            id: h.id,
                            name: h.name,
                            city: h.city,
                            state: h.state,
                            capacity: h.capacity,
                            resident_count,
                        }
                    })
                    .collect();
                let summary = summarize_facilities(&rows);
                (ReportRows::Facilities(rows), summary)
            }
            ReportType::ResidentReport => {
                let residents = self.db.fetch_residents_with_facility(nursing_home_id)?;
                let summary = summarize_residents(&residents);
                (ReportRows::Residents(residents), summary)
            }
            ReportType::ResidentAnnualFinancialSummary => {
                let residents = self.db.fetch_residents_with_facility(nursing_home_id)?;
                let ids: Vec<i64> = residents.iter().map(|r| r.id).collect();
                let txs = self.db.fetch_all_transactions(&ids, Some(&range))?;
                let rows = aggregate_resident_annual(&residents, &txs, &buckets);
                let summary = summarize_resident_annual(&rows);
                (ReportRows::ResidentAnnual(rows), summary)
            }
            ReportType::NursingHomeAnnualFinancialSummary => {
                let facilities = self.scoped_facilities(nursing_home_id)?;
                let txs = self.db.fetch_transactions(Some(&range), nursing_home_id)?;
                let rows = aggregate_facility_annual(&facilities, &txs, &buckets);
                let summary = summarize_facility_annual(&rows);
                (ReportRows::FacilityAnnual(rows), summary)
            }
            ReportType::ResidentsIncomePerNursingHomeMonthly => {
                let residents = self.db.fetch_residents_with_facility(nursing_home_id)?;
                let ids: Vec<i64> = residents.iter().map(|r| r.id).collect();
                let txs = self.db.fetch_income_transactions(&ids, Some(&range))?;
                let rows = aggregate_monthly_income(&residents, &txs, &buckets);
                let summary = summarize_monthly_income(&rows);
                (ReportRows::MonthlyIncome(rows), summary)
            }
            ReportType::ResidentIncomeExpenseByMonthCategory => {
                // This breakdown only makes sense for one facility; never
                // default to all of them.
                let home_id = nursing_home_id
                    .ok_or_else(|| Error::FacilityRequired(report_type.as_str().to_string()))?;
                let home = self.db.get_nursing_home(home_id)?;
                let residents = self.db.fetch_residents_with_facility(Some(home_id))?;
                let ids: Vec<i64> = residents.iter().map(|r| r.id).collect();
                let txs = self.db.fetch_all_transactions(&ids, Some(&range))?;
                let rows = aggregate_month_category(home.id, &home.name, &residents, &txs, &buckets);
                let summary = summarize_month_category(&rows);
                (ReportRows::MonthCategory(rows), summary)
            }
            ReportType::NursingHomeExpenseSummary => {
                let facilities = self.scoped_facilities(nursing_home_id)?;
                let txs = self.db.fetch_transactions(Some(&range), nursing_home_id)?;
                let rows = aggregate_facility_expenses(&facilities, &txs, &buckets);
                let summary = summarize_facility_expenses(&rows);
                (ReportRows::FacilityExpense(rows), summary)
            }
        };

        debug!(rows = data.len(), "report aggregation finished");
        Ok(ReportData {
            name: report_type.display_name().to_string(),
            report_type,
            date_range: range,
            data,
            summary,
        })
    }

    fn scoped_facilities(&self, nursing_home_id: Option<i64>) -> Result<Vec<NursingHome>> {
        match nursing_home_id {
            Some(id) => Ok(vec![self.db.get_nursing_home(id)?]),
            None => self.db.list_nursing_homes(),
        }
    }
}

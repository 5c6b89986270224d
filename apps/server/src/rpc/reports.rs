//! Reporting procedures.
//!
//! Thin wrappers: the date window expands to full days here, the
//! aggregation itself lives in the report repository.

use crate::error::ApiError;
use crate::AppState;
use chrono::NaiveDate;
use serde::Deserialize;
use till_core::DateRange;
use till_db::{ProfitLossReport, SalesReport};

/// Input shared by both reports: an inclusive calendar-date window
#[derive(Debug, Deserialize)]
pub struct ReportRangeInput {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ReportRangeInput {
    /// Expand to [start 00:00:00.000, end 23:59:59.999] UTC
    fn range(&self) -> DateRange {
        DateRange::from_dates(Some(self.start_date), Some(self.end_date))
    }
}

/// Takings, profit, top sellers, and payment mix for the window
pub async fn get_sales_report(
    state: &AppState,
    input: ReportRangeInput,
) -> Result<SalesReport, ApiError> {
    Ok(state.db.reports().sales_report(input.range()).await?)
}

/// Revenue, cost of goods, and margin for the window
pub async fn get_profit_loss_report(
    state: &AppState,
    input: ReportRangeInput,
) -> Result<ProfitLossReport, ApiError> {
    Ok(state.db.reports().profit_loss(input.range()).await?)
}

//! Monthly workplace reports.
//!
//! [`MonthlyReportGenerator`] aggregates one row per worker under contract
//! at a workplace during a month; a [`ReportWriter`] renders the rows.
//! [`CsvReportWriter`] produces the semicolon separated export.

mod aggregator;
mod csv_writer;

pub use aggregator::{MonthlyReportGenerator, workers_active_at};
pub use csv_writer::{CsvReportWriter, REPORT_HEADERS};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::Workplace;

/// One worker's totals for the month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyReportRow {
    /// The worker the row describes.
    pub worker_id: String,
    /// The worker's first name.
    pub first_name: String,
    /// The worker's last name.
    pub last_name: String,
    /// The worker's email, if known.
    pub email: Option<String>,
    /// Number of work shifts.
    pub worked_shifts: usize,
    /// Hours of work shifts.
    pub worked_hours: Decimal,
    /// Number of paid absence shifts.
    pub paid_absence_shifts: usize,
    /// Hours of paid absence shifts.
    pub paid_absence_hours: Decimal,
    /// Number of unpaid absence shifts.
    pub unpaid_absence_shifts: usize,
    /// Hours of unpaid absence shifts.
    pub unpaid_absence_hours: Decimal,
    /// Worked plus paid absence hours.
    pub paid_hours: Decimal,
    /// Wages for the month, rounded to cents.
    pub wages: Decimal,
}

/// The report of a workplace for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyReport {
    /// The reported workplace.
    pub workplace: Workplace,
    /// First day of the reported month.
    pub month: NaiveDate,
    /// One row per worker under contract during the month.
    pub rows: Vec<MonthlyReportRow>,
}

/// A destination for monthly reports.
pub trait ReportWriter {
    /// Writes the whole report.
    fn write_report(&mut self, report: &MonthlyReport) -> EngineResult<()>;
}

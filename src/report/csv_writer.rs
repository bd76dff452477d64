//! Semicolon separated CSV export of monthly reports.

use std::fs::File;
use std::io;
use std::path::Path;

use rust_decimal::Decimal;
use tracing::info;

use super::{MonthlyReport, MonthlyReportRow, ReportWriter};
use crate::error::{EngineError, EngineResult};

/// Column headers of the CSV export, in order.
pub const REPORT_HEADERS: [&str; 11] = [
    "Firstname",
    "Lastname",
    "Email",
    "Number of worked shifts",
    "Total of worked hours",
    "Number of paid absence shifts",
    "Total of paid absences hours",
    "Number of unpaid absence shifts",
    "Total of unpaid absence hours",
    "Total of paid hours",
    "Wages",
];

/// Writes reports as `;` delimited CSV with a header row.
///
/// Hours are written without trailing zeros, wages with exactly two decimals.
///
/// # Example
///
/// ```
/// use shift_ledger::report::CsvReportWriter;
///
/// let writer = CsvReportWriter::new(Vec::new());
/// let bytes = writer.into_inner().unwrap();
/// assert!(bytes.is_empty());
/// ```
pub struct CsvReportWriter<W: io::Write> {
    writer: csv::Writer<W>,
}

impl<W: io::Write> CsvReportWriter<W> {
    /// Wraps any byte sink.
    pub fn new(inner: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .from_writer(inner);
        Self { writer }
    }

    /// Flushes and returns the underlying sink.
    pub fn into_inner(self) -> EngineResult<W> {
        self.writer
            .into_inner()
            .map_err(|error| EngineError::ReportWrite {
                message: error.to_string(),
            })
    }

    fn write_row(&mut self, row: &MonthlyReportRow) -> EngineResult<()> {
        self.writer.write_record([
            row.first_name.clone(),
            row.last_name.clone(),
            row.email.clone().unwrap_or_default(),
            row.worked_shifts.to_string(),
            format_hours(row.worked_hours),
            row.paid_absence_shifts.to_string(),
            format_hours(row.paid_absence_hours),
            row.unpaid_absence_shifts.to_string(),
            format_hours(row.unpaid_absence_hours),
            format_hours(row.paid_hours),
            format_wages(row.wages),
        ])?;
        Ok(())
    }
}

impl CsvReportWriter<File> {
    /// Creates (or truncates) the file at `path`.
    pub fn create(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|error| EngineError::ReportWrite {
            message: format!("{}: {}", path.display(), error),
        })?;
        info!(path = %path.display(), "Writing monthly report");
        Ok(Self::new(file))
    }
}

impl<W: io::Write> ReportWriter for CsvReportWriter<W> {
    fn write_report(&mut self, report: &MonthlyReport) -> EngineResult<()> {
        self.writer.write_record(REPORT_HEADERS)?;
        for row in &report.rows {
            self.write_row(row)?;
        }
        self.writer.flush().map_err(|error| EngineError::ReportWrite {
            message: error.to_string(),
        })
    }
}

fn format_hours(hours: Decimal) -> String {
    hours.normalize().to_string()
}

fn format_wages(wages: Decimal) -> String {
    let mut wages = wages;
    wages.rescale(2);
    wages.to_string()
}

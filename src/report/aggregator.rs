//! Monthly report aggregation.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{info, warn};

use super::{MonthlyReport, MonthlyReportRow, ReportWriter};
use crate::calculation::monthly_wages;
use crate::error::{EngineError, EngineResult};
use crate::models::{Interval, ShiftCategory, Worker, Workplace, calendar_month, hours_from_seconds};
use crate::store::{ScheduleStore, ShiftQuery, StoreResult};

/// Workers with at least one contract at `workplace_id` overlapping
/// `period`.
///
/// Ordered by the start of each worker's most recent overlapping contract,
/// latest first, ties broken by worker id. Contracts referencing an unknown
/// worker are skipped.
pub fn workers_active_at<S: ScheduleStore + ?Sized>(
    store: &S,
    workplace_id: &str,
    period: &Interval,
) -> StoreResult<Vec<Worker>> {
    let mut latest_start: HashMap<String, NaiveDateTime> = HashMap::new();
    for contract in store.contracts_at_workplace(workplace_id, period)? {
        let start = contract.active_period.start;
        latest_start
            .entry(contract.worker_id)
            .and_modify(|current| *current = (*current).max(start))
            .or_insert(start);
    }

    let mut ordered: Vec<(String, NaiveDateTime)> = latest_start.into_iter().collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut workers = Vec::with_capacity(ordered.len());
    for (worker_id, _) in ordered {
        match store.worker(&worker_id)? {
            Some(worker) => workers.push(worker),
            None => warn!(worker_id = %worker_id, workplace_id, "Contract references unknown worker"),
        }
    }
    Ok(workers)
}

/// Builds the monthly report of one workplace.
///
/// # Example
///
/// ```
/// use shift_ledger::report::{CsvReportWriter, MonthlyReportGenerator};
/// use shift_ledger::store::{InMemoryStore, ScheduleStore};
/// use shift_ledger::models::Workplace;
/// use chrono::NaiveDate;
///
/// let store = InMemoryStore::new();
/// store.insert_workplace(Workplace { id: "shop_1".into(), name: "Mc Donalds".into() }).unwrap();
///
/// let generator = MonthlyReportGenerator::new(&store, "shop_1").unwrap();
/// let mut writer = CsvReportWriter::new(Vec::new());
/// let report = generator
///     .run(NaiveDate::from_ymd_opt(2020, 2, 15), Some(&mut writer))
///     .unwrap();
/// assert!(report.rows.is_empty());
///
/// let missing_date = generator.run(None, Some(&mut writer));
/// assert_eq!(missing_date.unwrap_err().to_string(), "ERROR: Date is missing");
/// ```
pub struct MonthlyReportGenerator<'a, S: ScheduleStore + ?Sized> {
    store: &'a S,
    workplace: Workplace,
}

impl<'a, S: ScheduleStore + ?Sized> MonthlyReportGenerator<'a, S> {
    /// Binds the generator to a workplace, which must exist.
    pub fn new(store: &'a S, workplace_id: &str) -> EngineResult<Self> {
        let workplace = store
            .workplace(workplace_id)?
            .ok_or_else(|| EngineError::WorkplaceNotFound {
                id: workplace_id.to_string(),
            })?;
        Ok(Self { store, workplace })
    }

    /// The reported workplace.
    pub fn workplace(&self) -> &Workplace {
        &self.workplace
    }

    /// Aggregates the rows for the calendar month containing `month`.
    pub fn aggregate(&self, month: NaiveDate) -> EngineResult<MonthlyReport> {
        let window = calendar_month(month);
        let workers = workers_active_at(self.store, &self.workplace.id, &window)?;

        let mut rows = Vec::with_capacity(workers.len());
        for worker in workers {
            rows.push(self.row_for(worker, &window, month)?);
        }

        info!(
            workplace_id = %self.workplace.id,
            month = %window,
            rows = rows.len(),
            "Aggregated monthly report"
        );

        Ok(MonthlyReport {
            workplace: self.workplace.clone(),
            month: window.start.date(),
            rows,
        })
    }

    /// Checks the arguments, aggregates the month and hands the report to
    /// `writer`.
    ///
    /// Both arguments are checked before anything is computed.
    pub fn run<W: ReportWriter + ?Sized>(
        &self,
        month: Option<NaiveDate>,
        writer: Option<&mut W>,
    ) -> EngineResult<MonthlyReport> {
        let month = month.ok_or_else(|| EngineError::MissingArgument {
            message: "Date is missing".to_string(),
        })?;
        let writer = writer.ok_or_else(|| EngineError::MissingArgument {
            message: "File name missing".to_string(),
        })?;

        let report = self.aggregate(month)?;
        writer.write_report(&report)?;
        Ok(report)
    }

    fn row_for(&self, worker: Worker, window: &Interval, month: NaiveDate) -> EngineResult<MonthlyReportRow> {
        let query = ShiftQuery::for_worker(&worker.id)
            .at_workplace(&self.workplace.id)
            .starting_within(*window);
        let shifts = self.store.shifts(&query)?;

        // (count, hours) per category, in ShiftCategory::ALL order
        let [worked, paid_absence, unpaid_absence] = ShiftCategory::ALL.map(|category| {
            let (count, seconds) = shifts
                .iter()
                .filter(|shift| shift.category == category)
                .fold((0usize, 0i64), |(count, seconds), shift| {
                    (count + 1, seconds + shift.duration().num_seconds())
                });
            (count, hours_from_seconds(seconds))
        });
        let wages = monthly_wages(self.store, &worker.id, &self.workplace.id, month)?;

        Ok(MonthlyReportRow {
            worked_shifts: worked.0,
            worked_hours: worked.1,
            paid_absence_shifts: paid_absence.0,
            paid_absence_hours: paid_absence.1,
            unpaid_absence_shifts: unpaid_absence.0,
            unpaid_absence_hours: unpaid_absence.1,
            paid_hours: worked.1 + paid_absence.1,
            wages,
            worker_id: worker.id,
            first_name: worker.first_name,
            last_name: worker.last_name,
            email: worker.email,
        })
    }
}

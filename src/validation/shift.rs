//! Shift duration validation.
//!
//! A shift is checked against its per-category cap and, when it is assigned
//! work time, against the daily and weekly work caps of its worker. The
//! sibling shifts needed for the aggregate caps are read through the
//! injected [`ScheduleStore`].

use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use super::contract::require;
use crate::config::{AggregateCap, CapScope, DurationPolicy};
use crate::error::{Validated, ValidationError, ValidationFailure};
use crate::models::{
    Interval, Shift, ShiftCategory, ShiftDraft, calendar_day, calendar_week, hours_from_seconds,
    seconds_from_hours,
};
use crate::store::{ScheduleStore, ShiftQuery, StoreResult};

/// The calendar window an aggregate cap is measured over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapPeriod {
    /// The calendar day of the shift's start.
    Day,
    /// The Monday-based calendar week of the shift's start.
    Week,
}

/// The set of sibling shifts an aggregate cap sums over, for one candidate
/// shift.
///
/// # Example
///
/// ```
/// use shift_ledger::config::DurationPolicy;
/// use shift_ledger::models::{Shift, ShiftCategory};
/// use shift_ledger::validation::{AggregateWindow, CapPeriod};
/// use chrono::NaiveDate;
///
/// let starts_at = NaiveDate::from_ymd_opt(2019, 2, 7).unwrap().and_hms_opt(10, 0, 0).unwrap();
/// let shift = Shift {
///     id: "s1".to_string(),
///     workplace_id: "shop_1".to_string(),
///     worker_id: Some("worker_1".to_string()),
///     category: ShiftCategory::Work,
///     starts_at,
///     ends_at: starts_at + chrono::Duration::hours(4),
/// };
///
/// let policy = DurationPolicy::default();
/// let daily = AggregateWindow::for_shift(&shift, CapPeriod::Day, &policy);
/// let weekly = AggregateWindow::for_shift(&shift, CapPeriod::Week, &policy);
///
/// assert_eq!(daily.workplace_id.as_deref(), Some("shop_1"));
/// assert_eq!(weekly.workplace_id, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateWindow {
    /// Which cap the window belongs to.
    pub period: CapPeriod,
    /// The calendar window sibling starts must fall in.
    pub interval: Interval,
    /// The workplace siblings must belong to, or `None` for every workplace.
    pub workplace_id: Option<String>,
    /// The cap in hours.
    pub cap_hours: Decimal,
}

impl AggregateWindow {
    /// Builds the window of `period` around `shift`, scoped per the policy.
    pub fn for_shift(shift: &Shift, period: CapPeriod, policy: &DurationPolicy) -> Self {
        let (interval, cap): (Interval, &AggregateCap) = match period {
            CapPeriod::Day => (calendar_day(shift.starts_at), &policy.daily_work),
            CapPeriod::Week => (calendar_week(shift.starts_at), &policy.weekly_work),
        };

        let workplace_id = match cap.scope {
            CapScope::Workplace => Some(shift.workplace_id.clone()),
            CapScope::Worker => None,
        };

        Self {
            period,
            interval,
            workplace_id,
            cap_hours: cap.hours,
        }
    }

    /// The store query selecting the worker's work shifts in this window.
    pub fn query(&self, worker_id: &str) -> ShiftQuery {
        let query = ShiftQuery::for_worker(worker_id)
            .with_categories(&[ShiftCategory::Work])
            .starting_within(self.interval);

        match &self.workplace_id {
            Some(workplace_id) => query.at_workplace(workplace_id.clone()),
            None => query,
        }
    }

    /// Checks the candidate plus `siblings` against the cap.
    ///
    /// Siblings sharing the candidate's id are the stored version of the
    /// candidate and are skipped.
    pub fn check(&self, candidate: &Shift, siblings: &[Shift]) -> Result<(), ValidationError> {
        let total_seconds: i64 = siblings
            .iter()
            .filter(|s| s.id != candidate.id)
            .map(|s| s.duration().num_seconds())
            .sum::<i64>()
            + candidate.duration().num_seconds();

        if Decimal::from(total_seconds) <= seconds_from_hours(self.cap_hours) {
            return Ok(());
        }

        let hours = hours_from_seconds(total_seconds).round_dp(2);
        let cap_hours = self.cap_hours;
        Err(match self.period {
            CapPeriod::Day => ValidationError::MaxDailyDurationExceeded { hours, cap_hours },
            CapPeriod::Week => ValidationError::MaxWeeklyDurationExceeded { hours, cap_hours },
        })
    }
}

/// Validates a shift draft and builds the shift.
///
/// Every violation is collected:
///
/// 1. `MissingField` for a missing workplace, start or end
/// 2. `EndBeforeStart` when the end is not after the start; no cap is
///    checked in that case
/// 3. `ShiftTooLong` when the shift outlasts its category cap
/// 4. `MaxDailyDurationExceeded` and `MaxWeeklyDurationExceeded` for
///    assigned work shifts
///
/// The outer `Result` carries store failures; the inner one the validation
/// outcome.
pub fn validate_shift<S: ScheduleStore + ?Sized>(
    draft: ShiftDraft,
    store: &S,
    policy: &DurationPolicy,
) -> StoreResult<Validated<Shift>> {
    let mut errors = Vec::new();

    let workplace_id = require(draft.workplace_id, "workplace_id", &mut errors);
    let starts_at = require(draft.starts_at, "starts_at", &mut errors);
    let ends_at = require(draft.ends_at, "ends_at", &mut errors);

    let (Some(workplace_id), Some(starts_at), Some(ends_at)) = (workplace_id, starts_at, ends_at)
    else {
        return Ok(Err(ValidationFailure { errors }));
    };

    if ends_at <= starts_at {
        errors.push(ValidationError::EndBeforeStart);
        return Ok(Err(ValidationFailure { errors }));
    }

    let shift = Shift {
        id: draft.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
        workplace_id,
        worker_id: draft.worker_id,
        category: draft.category,
        starts_at,
        ends_at,
    };

    let cap_hours = policy.cap_for(shift.category);
    if Decimal::from(shift.duration().num_seconds()) > seconds_from_hours(cap_hours) {
        errors.push(ValidationError::ShiftTooLong {
            category: shift.category,
            hours: shift.duration_in_hours().round_dp(2),
            cap_hours,
        });
    }

    if let (Some(worker_id), ShiftCategory::Work) = (shift.worker_id.as_deref(), shift.category) {
        for period in [CapPeriod::Day, CapPeriod::Week] {
            let window = AggregateWindow::for_shift(&shift, period, policy);
            let siblings = store.shifts(&window.query(worker_id))?;
            if let Err(error) = window.check(&shift, &siblings) {
                debug!(
                    shift_id = %shift.id,
                    worker_id,
                    window = %window.interval,
                    "Aggregate work cap exceeded"
                );
                errors.push(error);
            }
        }
    }

    Ok(ValidationFailure::check(errors, shift))
}

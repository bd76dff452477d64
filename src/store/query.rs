//! Shift query shape shared by every store implementation.

use crate::models::{Interval, Shift, ShiftCategory};

/// Selects the shifts of one worker, optionally narrowed to a workplace, a
/// set of categories and a window their start must fall in.
///
/// # Example
///
/// ```
/// use shift_ledger::models::{calendar_week, ShiftCategory};
/// use shift_ledger::store::ShiftQuery;
/// use chrono::NaiveDate;
///
/// let instant = NaiveDate::from_ymd_opt(2019, 2, 7).unwrap().and_hms_opt(10, 0, 0).unwrap();
/// let query = ShiftQuery::for_worker("worker_1")
///     .with_categories(&[ShiftCategory::Work])
///     .starting_within(calendar_week(instant));
/// assert!(query.workplace_id.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftQuery {
    /// The assigned worker.
    pub worker_id: String,
    /// Restrict to one workplace when set.
    pub workplace_id: Option<String>,
    /// Restrict to these categories; empty means every category.
    pub categories: Vec<ShiftCategory>,
    /// Restrict to shifts whose start lies in this window.
    pub starts_within: Option<Interval>,
}

impl ShiftQuery {
    /// Every shift assigned to the worker.
    pub fn for_worker(worker_id: impl Into<String>) -> Self {
        Self {
            worker_id: worker_id.into(),
            workplace_id: None,
            categories: Vec::new(),
            starts_within: None,
        }
    }

    /// Narrows the query to one workplace.
    pub fn at_workplace(mut self, workplace_id: impl Into<String>) -> Self {
        self.workplace_id = Some(workplace_id.into());
        self
    }

    /// Narrows the query to the given categories.
    pub fn with_categories(mut self, categories: &[ShiftCategory]) -> Self {
        self.categories = categories.to_vec();
        self
    }

    /// Narrows the query to shifts starting inside `window`.
    pub fn starting_within(mut self, window: Interval) -> Self {
        self.starts_within = Some(window);
        self
    }

    /// Returns true if the shift satisfies every criterion.
    pub fn matches(&self, shift: &Shift) -> bool {
        shift.is_assigned_to(&self.worker_id)
            && self
                .workplace_id
                .as_ref()
                .is_none_or(|id| *id == shift.workplace_id)
            && (self.categories.is_empty() || self.categories.contains(&shift.category))
            && self
                .starts_within
                .is_none_or(|window| window.contains_instant(shift.starts_at))
    }
}

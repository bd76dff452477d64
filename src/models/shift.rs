//! Shift model and related types.
//!
//! A shift is a bounded period at one workplace, optionally assigned to a
//! worker, spent working or on paid or unpaid absence.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::interval::Interval;

const SECONDS_PER_HOUR: i64 = 3600;

/// What a shift is spent on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftCategory {
    /// Time worked.
    #[default]
    Work,
    /// Absence that is still paid (e.g. paid leave).
    PaidAbsence,
    /// Absence that is not paid.
    UnpaidAbsence,
}

impl ShiftCategory {
    /// All categories, in reporting order.
    pub const ALL: [ShiftCategory; 3] = [
        ShiftCategory::Work,
        ShiftCategory::PaidAbsence,
        ShiftCategory::UnpaidAbsence,
    ];

    /// Returns true if time in this category is paid to the worker.
    ///
    /// ```
    /// use shift_ledger::models::ShiftCategory;
    ///
    /// assert!(ShiftCategory::PaidAbsence.is_payable());
    /// assert!(!ShiftCategory::UnpaidAbsence.is_payable());
    /// ```
    pub fn is_payable(self) -> bool {
        matches!(self, ShiftCategory::Work | ShiftCategory::PaidAbsence)
    }
}

impl std::fmt::Display for ShiftCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShiftCategory::Work => write!(f, "work"),
            ShiftCategory::PaidAbsence => write!(f, "paid_absence"),
            ShiftCategory::UnpaidAbsence => write!(f, "unpaid_absence"),
        }
    }
}

/// A validated shift.
///
/// Construct shifts through [`crate::validation::validate_shift`], which
/// guarantees `ends_at > starts_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    /// Unique identifier for the shift.
    pub id: String,
    /// The workplace the shift belongs to.
    pub workplace_id: String,
    /// The assigned worker, if any.
    #[serde(default)]
    pub worker_id: Option<String>,
    /// What the shift is spent on.
    #[serde(default)]
    pub category: ShiftCategory,
    /// The first instant of the shift.
    pub starts_at: NaiveDateTime,
    /// The end of the shift (exclusive).
    pub ends_at: NaiveDateTime,
}

impl Shift {
    /// The shift's period as a bounded interval.
    pub fn period(&self) -> Interval {
        Interval::bounded(self.starts_at, self.ends_at)
    }

    /// Returns true if the shift is assigned to a worker.
    pub fn is_assigned(&self) -> bool {
        self.worker_id.is_some()
    }

    /// Returns true if the shift is assigned to the given worker.
    pub fn is_assigned_to(&self, worker_id: &str) -> bool {
        self.worker_id.as_deref() == Some(worker_id)
    }

    /// Returns the length of the shift.
    pub fn duration(&self) -> Duration {
        self.ends_at - self.starts_at
    }

    /// Returns the length of the shift in hours.
    ///
    /// # Examples
    ///
    /// ```
    /// use shift_ledger::models::{Shift, ShiftCategory};
    /// use chrono::NaiveDateTime;
    /// use rust_decimal::Decimal;
    ///
    /// let shift = Shift {
    ///     id: "shift_001".to_string(),
    ///     workplace_id: "shop_1".to_string(),
    ///     worker_id: Some("worker_1".to_string()),
    ///     category: ShiftCategory::Work,
    ///     starts_at: NaiveDateTime::parse_from_str("2020-01-31 23:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
    ///     ends_at: NaiveDateTime::parse_from_str("2020-02-01 01:30:00", "%Y-%m-%d %H:%M:%S").unwrap(),
    /// };
    /// assert_eq!(shift.duration_in_hours(), Decimal::new(25, 1)); // 2.5 hours
    /// ```
    pub fn duration_in_hours(&self) -> Decimal {
        hours_from_seconds(self.duration().num_seconds())
    }
}

/// Converts a number of seconds to hours.
pub fn hours_from_seconds(seconds: i64) -> Decimal {
    Decimal::from(seconds) / Decimal::from(SECONDS_PER_HOUR)
}

/// Converts a number of hours to seconds.
pub fn seconds_from_hours(hours: Decimal) -> Decimal {
    hours * Decimal::from(SECONDS_PER_HOUR)
}

/// An unvalidated shift as submitted by a scheduling action.
///
/// Every field the validator checks for presence is optional here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftDraft {
    /// Identifier of the shift being edited; a new one is generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// The workplace the shift belongs to.
    #[serde(default)]
    pub workplace_id: Option<String>,
    /// The assigned worker, if any.
    #[serde(default)]
    pub worker_id: Option<String>,
    /// What the shift is spent on.
    #[serde(default)]
    pub category: ShiftCategory,
    /// The first instant of the shift.
    #[serde(default)]
    pub starts_at: Option<NaiveDateTime>,
    /// The end of the shift (exclusive).
    #[serde(default)]
    pub ends_at: Option<NaiveDateTime>,
}

/// Selects the shifts starting between midnight of `from` and midnight of
/// `to`, both instants included.
pub fn shifts_between(shifts: &[Shift], from: NaiveDate, to: NaiveDate) -> Vec<&Shift> {
    let lower = from.and_time(NaiveTime::MIN);
    let upper = to.and_time(NaiveTime::MIN);
    shifts
        .iter()
        .filter(|shift| lower <= shift.starts_at && shift.starts_at <= upper)
        .collect()
}

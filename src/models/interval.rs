//! Half-open time intervals and the calendar windows built on them.
//!
//! Every comparison between contract tenures, shift periods and reporting
//! windows in this crate goes through the functions in this module, so that
//! boundary semantics stay identical everywhere:
//!
//! - an interval includes its `start` and excludes its `end`,
//! - an interval without an `end` extends forever into the future,
//! - two intervals that merely touch (one ends where the other starts) do
//!   not overlap.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// A half-open time range `[start, end)`, optionally unbounded on the right.
///
/// # Example
///
/// ```
/// use shift_ledger::models::Interval;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let open = Interval::unbounded(start);
/// assert!(!open.is_bounded());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    /// The first instant of the interval (inclusive).
    pub start: NaiveDateTime,
    /// The end of the interval (exclusive), or `None` when unbounded.
    #[serde(default)]
    pub end: Option<NaiveDateTime>,
}

impl Interval {
    /// Creates an interval from a start and an optional end.
    pub fn new(start: NaiveDateTime, end: Option<NaiveDateTime>) -> Self {
        Self { start, end }
    }

    /// Creates a bounded interval `[start, end)`.
    pub fn bounded(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// Creates an interval starting at `start` that never ends.
    pub fn unbounded(start: NaiveDateTime) -> Self {
        Self { start, end: None }
    }

    /// Returns true if the interval has an end.
    pub fn is_bounded(&self) -> bool {
        self.end.is_some()
    }

    /// Returns true if the interval contains no instant at all.
    pub fn is_degenerate(&self) -> bool {
        !ends_after(self.start, self.end)
    }

    /// Returns true if `instant` lies inside the interval.
    pub fn contains_instant(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && ends_after(instant, self.end)
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.end {
            Some(end) => write!(f, "[{}, {})", self.start, end),
            None => write!(f, "[{}, ...)", self.start),
        }
    }
}

/// True if `instant` comes strictly before `end`, treating `None` as +inf.
fn ends_after(instant: NaiveDateTime, end: Option<NaiveDateTime>) -> bool {
    match end {
        Some(end) => instant < end,
        None => true,
    }
}

/// Returns true if the two intervals share at least one instant.
///
/// Touching boundaries do not count as an overlap, and the relation is
/// symmetric whichever side is unbounded.
///
/// # Example
///
/// ```
/// use shift_ledger::models::{overlaps, Interval};
/// use chrono::NaiveDate;
///
/// let day = |d: u32| NaiveDate::from_ymd_opt(2020, 2, d).unwrap().and_hms_opt(0, 0, 0).unwrap();
///
/// let january = Interval::bounded(day(1) - chrono::Duration::days(31), day(15));
/// let february = Interval::bounded(day(15), day(29));
/// assert!(!overlaps(&january, &february));
/// assert!(overlaps(&Interval::unbounded(day(20)), &february));
/// ```
pub fn overlaps(a: &Interval, b: &Interval) -> bool {
    ends_after(a.start, b.end) && ends_after(b.start, a.end)
}

/// Returns true if `outer` encloses the whole of `inner`.
///
/// An unbounded `inner` can only be contained by an unbounded `outer`.
pub fn contains(outer: &Interval, inner: &Interval) -> bool {
    if outer.start > inner.start {
        return false;
    }

    match (outer.end, inner.end) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(outer_end), Some(inner_end)) => inner_end <= outer_end,
    }
}

/// Returns the length of a bounded interval, or `None` when it is unbounded.
pub fn duration(interval: &Interval) -> Option<Duration> {
    interval.end.map(|end| end - interval.start)
}

/// Returns midnight at the start of the calendar day of `instant`.
pub fn start_of_day(instant: NaiveDateTime) -> NaiveDateTime {
    instant.date().and_time(NaiveTime::MIN)
}

/// The calendar day containing `instant`: `[00:00, next day 00:00)`.
pub fn calendar_day(instant: NaiveDateTime) -> Interval {
    let start = start_of_day(instant);
    Interval::bounded(start, start + Duration::days(1))
}

/// The calendar week containing `instant`: Monday 00:00 to the following
/// Monday 00:00.
///
/// # Example
///
/// ```
/// use shift_ledger::models::calendar_week;
/// use chrono::{Datelike, NaiveDate, Weekday};
///
/// // 2019-02-07 is a Thursday
/// let thursday = NaiveDate::from_ymd_opt(2019, 2, 7).unwrap().and_hms_opt(10, 0, 0).unwrap();
/// let week = calendar_week(thursday);
/// assert_eq!(week.start.weekday(), Weekday::Mon);
/// assert_eq!(week.start.date(), NaiveDate::from_ymd_opt(2019, 2, 4).unwrap());
/// ```
pub fn calendar_week(instant: NaiveDateTime) -> Interval {
    let days_since_monday = i64::from(instant.weekday().num_days_from_monday());
    let monday = start_of_day(instant) - Duration::days(days_since_monday);
    Interval::bounded(monday, monday + Duration::days(7))
}

/// The calendar month containing `date`: the first of the month 00:00 to the
/// first of the next month 00:00.
pub fn calendar_month(date: NaiveDate) -> Interval {
    let first = date - Duration::days(i64::from(date.day0()));
    let next = first
        .checked_add_months(Months::new(1))
        .map(|d| d.and_time(NaiveTime::MIN));
    Interval::new(first.and_time(NaiveTime::MIN), next)
}

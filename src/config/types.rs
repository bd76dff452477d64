//! Configuration types for shift validation policy.
//!
//! These are deserialized from the YAML policy file and passed explicitly
//! into the validators, so alternate policies can be exercised side by side.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::ShiftCategory;

/// Metadata about the policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyMetadata {
    /// Human-readable name of the policy.
    pub name: String,
    /// Version or effective date of the policy.
    pub version: String,
}

impl Default for PolicyMetadata {
    fn default() -> Self {
        Self {
            name: "Default labour policy".to_string(),
            version: "2020-09-09".to_string(),
        }
    }
}

/// Which shifts an aggregate cap sums over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapScope {
    /// Only shifts at the candidate shift's workplace.
    Workplace,
    /// Every shift of the worker, whatever the workplace.
    Worker,
}

/// Longest allowed single shift, per category, in hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftCaps {
    /// Cap for work shifts.
    pub work_hours: Decimal,
    /// Cap for paid absences.
    pub paid_absence_hours: Decimal,
    /// Cap for unpaid absences.
    pub unpaid_absence_hours: Decimal,
}

/// A cap on the summed work time inside a calendar window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateCap {
    /// Maximum total hours.
    pub hours: Decimal,
    /// Which shifts are summed.
    pub scope: CapScope,
}

/// Every duration rule a shift is validated against.
///
/// # Example
///
/// ```
/// use shift_ledger::config::{CapScope, DurationPolicy};
/// use shift_ledger::models::ShiftCategory;
/// use rust_decimal::Decimal;
///
/// let policy = DurationPolicy::default();
/// assert_eq!(policy.cap_for(ShiftCategory::PaidAbsence), Decimal::from(12));
/// assert_eq!(policy.daily_work.scope, CapScope::Workplace);
/// assert_eq!(policy.weekly_work.scope, CapScope::Worker);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationPolicy {
    /// Per-shift caps.
    pub shift_caps: ShiftCaps,
    /// Work time cap per calendar day.
    pub daily_work: AggregateCap,
    /// Work time cap per calendar week.
    pub weekly_work: AggregateCap,
}

impl DurationPolicy {
    /// Returns the single-shift cap in hours for a category.
    pub fn cap_for(&self, category: ShiftCategory) -> Decimal {
        match category {
            ShiftCategory::Work => self.shift_caps.work_hours,
            ShiftCategory::PaidAbsence => self.shift_caps.paid_absence_hours,
            ShiftCategory::UnpaidAbsence => self.shift_caps.unpaid_absence_hours,
        }
    }

    /// Lists every configured cap with a label, for validation and logging.
    pub(crate) fn labelled_caps(&self) -> [(&'static str, Decimal); 5] {
        [
            ("shift_caps.work_hours", self.shift_caps.work_hours),
            (
                "shift_caps.paid_absence_hours",
                self.shift_caps.paid_absence_hours,
            ),
            (
                "shift_caps.unpaid_absence_hours",
                self.shift_caps.unpaid_absence_hours,
            ),
            ("daily_work.hours", self.daily_work.hours),
            ("weekly_work.hours", self.weekly_work.hours),
        ]
    }
}

impl Default for DurationPolicy {
    fn default() -> Self {
        Self {
            shift_caps: ShiftCaps {
                work_hours: Decimal::from(10),
                paid_absence_hours: Decimal::from(12),
                unpaid_absence_hours: Decimal::from(24),
            },
            daily_work: AggregateCap {
                hours: Decimal::from(10),
                scope: CapScope::Workplace,
            },
            weekly_work: AggregateCap {
                hours: Decimal::from(35),
                scope: CapScope::Worker,
            },
        }
    }
}

/// Complete policy configuration, as stored in the policy YAML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Policy metadata.
    #[serde(default)]
    pub metadata: PolicyMetadata,
    /// Duration rules.
    pub durations: DurationPolicy,
}

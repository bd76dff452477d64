//! Employment contract model.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::interval::Interval;

/// An employment contract binding a worker to a workplace at an hourly rate.
///
/// For a given worker and workplace no two contracts have overlapping active
/// periods, so at most one contract is in effect at any instant.
///
/// # Example
///
/// ```
/// use shift_ledger::models::{Contract, Interval};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let contract = Contract {
///     id: "contract_001".to_string(),
///     worker_id: "worker_1".to_string(),
///     workplace_id: "shop_1".to_string(),
///     hourly_rate: Decimal::new(125, 1),
///     active_period: Interval::unbounded(start),
/// };
/// assert!(contract.is_open());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    /// Unique identifier for the contract.
    pub id: String,
    /// The employed worker.
    pub worker_id: String,
    /// The employing workplace.
    pub workplace_id: String,
    /// Pay per hour of work or paid absence.
    pub hourly_rate: Decimal,
    /// When the contract's rate applies; starts at midnight.
    pub active_period: Interval,
}

impl Contract {
    /// Returns true if the contract has no end date.
    pub fn is_open(&self) -> bool {
        !self.active_period.is_bounded()
    }

    /// Returns true if the contract binds the given worker and workplace.
    pub fn binds(&self, worker_id: &str, workplace_id: &str) -> bool {
        self.worker_id == worker_id && self.workplace_id == workplace_id
    }

    /// Returns true if the contract is in effect at `instant`.
    pub fn is_active_at(&self, instant: NaiveDateTime) -> bool {
        self.active_period.contains_instant(instant)
    }
}

/// An unvalidated contract as submitted by an administrative action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractDraft {
    /// Identifier of the contract being edited; a new one is generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// The employed worker.
    #[serde(default)]
    pub worker_id: Option<String>,
    /// The employing workplace.
    #[serde(default)]
    pub workplace_id: Option<String>,
    /// Pay per hour; must not be negative.
    #[serde(default)]
    pub hourly_rate: Option<Decimal>,
    /// Start of the contract; moved back to midnight on validation.
    #[serde(default)]
    pub starts_at: Option<NaiveDateTime>,
    /// End of the contract (exclusive), absent for an open-ended contract.
    #[serde(default)]
    pub ends_at: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn make_contract(end: Option<NaiveDateTime>) -> Contract {
        Contract {
            id: "c1".to_string(),
            worker_id: "worker_1".to_string(),
            workplace_id: "shop_1".to_string(),
            hourly_rate: Decimal::from(10),
            active_period: Interval::new(midnight(2020, 1, 10), end),
        }
    }

    #[test]
    fn test_is_active_at_respects_half_open_tenure() {
        let contract = make_contract(Some(midnight(2020, 1, 20)));

        assert!(contract.is_active_at(midnight(2020, 1, 10)));
        assert!(!contract.is_active_at(midnight(2020, 1, 20)));
        assert!(!contract.is_open());
    }

    #[test]
    fn test_binds_worker_and_workplace() {
        let contract = make_contract(None);

        assert!(contract.binds("worker_1", "shop_1"));
        assert!(!contract.binds("worker_1", "shop_2"));
        assert!(!contract.binds("worker_2", "shop_1"));
    }

    #[test]
    fn test_contract_deserialization_with_open_period() {
        let json = r#"{
            "id": "c1",
            "worker_id": "worker_1",
            "workplace_id": "shop_1",
            "hourly_rate": "14.70",
            "active_period": { "start": "2020-01-20T00:00:00" }
        }"#;

        let contract: Contract = serde_json::from_str(json).unwrap();
        assert!(contract.is_open());
        assert_eq!(contract.hourly_rate, Decimal::new(1470, 2));
    }
}

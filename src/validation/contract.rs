//! Contract overlap validation.
//!
//! For a fixed worker and workplace, contract tenures must never overlap, so
//! that exactly one hourly rate applies at any instant. Everything here is
//! pure: callers fetch the sibling contracts and persist on acceptance.

use tracing::debug;
use uuid::Uuid;

use crate::error::{Validated, ValidationError, ValidationFailure};
use crate::models::{Contract, ContractDraft, Interval, contains, overlaps, start_of_day};
use rust_decimal::Decimal;

/// Rejects `candidate` if its active period overlaps any contract in
/// `existing` for the same worker and workplace.
///
/// A contract with the candidate's own id is skipped, so an edited contract
/// is not compared with its stored version. The check is symmetric in which
/// side is open-ended.
///
/// # Example
///
/// ```
/// use shift_ledger::models::{Contract, Interval};
/// use shift_ledger::validation::check_overlap;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let day = |m, d| NaiveDate::from_ymd_opt(2020, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let contract = |id: &str, period| Contract {
///     id: id.to_string(),
///     worker_id: "worker_1".to_string(),
///     workplace_id: "shop_1".to_string(),
///     hourly_rate: Decimal::from(10),
///     active_period: period,
/// };
///
/// let existing = vec![contract("a", Interval::bounded(day(1, 1), day(2, 15)))];
/// let touching = contract("b", Interval::bounded(day(2, 15), day(3, 1)));
/// let overlapping = contract("c", Interval::bounded(day(2, 14), day(3, 1)));
///
/// assert!(check_overlap(&touching, &existing).is_ok());
/// assert!(check_overlap(&overlapping, &existing).is_err());
/// ```
pub fn check_overlap(candidate: &Contract, existing: &[Contract]) -> Result<(), ValidationError> {
    let clash = existing.iter().find(|other| {
        other.id != candidate.id
            && other.binds(&candidate.worker_id, &candidate.workplace_id)
            && overlaps(&candidate.active_period, &other.active_period)
    });

    match clash {
        Some(other) => {
            debug!(
                candidate = %candidate.id,
                existing = %other.id,
                "Contract overlaps an existing contract"
            );
            Err(ValidationError::OverlappingContract {
                contract_id: other.id.clone(),
            })
        }
        None => Ok(()),
    }
}

/// Returns the contracts of `workplace_id` in effect at some point of
/// `period`, i.e. whose active period overlaps it.
pub fn active_at<'a>(
    contracts: &'a [Contract],
    workplace_id: &str,
    period: &Interval,
) -> Vec<&'a Contract> {
    contracts
        .iter()
        .filter(|c| c.workplace_id == workplace_id && overlaps(&c.active_period, period))
        .collect()
}

/// Returns true if `query` lies entirely inside the contract's tenure.
pub fn contains_period(contract: &Contract, query: &Interval) -> bool {
    contains(&contract.active_period, query)
}

/// Validates a contract draft against its siblings and builds the contract.
///
/// The start is moved back to midnight before any comparison. Every
/// violation is reported:
///
/// - `MissingField` for a missing worker, workplace or start
/// - `InvalidHourlyRate` for a missing or negative rate
/// - `EndBeforeStart` when a bounded end is not after the normalized start
/// - `OverlappingContract` when the tenure overlaps a sibling
pub fn validate_contract(draft: ContractDraft, existing: &[Contract]) -> Validated<Contract> {
    let mut errors = Vec::new();

    let worker_id = require(draft.worker_id, "worker_id", &mut errors);
    let workplace_id = require(draft.workplace_id, "workplace_id", &mut errors);
    let starts_at = require(draft.starts_at, "starts_at", &mut errors).map(start_of_day);

    let hourly_rate = match draft.hourly_rate {
        Some(rate) if rate >= Decimal::ZERO => Some(rate),
        _ => {
            errors.push(ValidationError::InvalidHourlyRate);
            None
        }
    };

    let (Some(worker_id), Some(workplace_id), Some(starts_at), Some(hourly_rate)) =
        (worker_id, workplace_id, starts_at, hourly_rate)
    else {
        return Err(ValidationFailure { errors });
    };

    let active_period = Interval::new(starts_at, draft.ends_at);
    if active_period.is_degenerate() {
        errors.push(ValidationError::EndBeforeStart);
        return Err(ValidationFailure { errors });
    }

    let contract = Contract {
        id: draft.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
        worker_id,
        workplace_id,
        hourly_rate,
        active_period,
    };

    if let Err(error) = check_overlap(&contract, existing) {
        errors.push(error);
    }

    ValidationFailure::check(errors, contract)
}

pub(crate) fn require<T>(value: Option<T>, field: &str, errors: &mut Vec<ValidationError>) -> Option<T> {
    if value.is_none() {
        errors.push(ValidationError::MissingField {
            field: field.to_string(),
        });
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use std::str::FromStr;

    fn day(date: &str) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn make_contract(id: &str, start: &str, end: Option<&str>) -> Contract {
        Contract {
            id: id.to_string(),
            worker_id: "worker_1".to_string(),
            workplace_id: "shop_1".to_string(),
            hourly_rate: Decimal::from(10),
            active_period: Interval::new(day(start), end.map(day)),
        }
    }

    fn make_draft(start: NaiveDateTime, end: Option<NaiveDateTime>) -> ContractDraft {
        ContractDraft {
            id: None,
            worker_id: Some("worker_1".to_string()),
            workplace_id: Some("shop_1".to_string()),
            hourly_rate: Some(Decimal::from(15)),
            starts_at: Some(start),
            ends_at: end,
        }
    }

    fn reference_date() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 9, 1)
            .unwrap()
            .and_hms_opt(10, 15, 45)
            .unwrap()
    }

    fn is_overlap(failure: &ValidationFailure) -> bool {
        failure.has(|e| matches!(e, ValidationError::OverlappingContract { .. }))
    }

    #[test]
    fn test_active_at_regression_fixture() {
        let contracts = vec![
            make_contract("a", "2020-01-15", Some("2020-01-25")),
            make_contract("b", "2020-01-15", Some("2020-02-15")),
            make_contract("c", "2020-02-01", Some("2020-02-20")),
            make_contract("d", "2020-02-15", Some("2020-03-15")),
            make_contract("e", "2020-03-01", Some("2020-03-15")),
            make_contract("f", "2020-01-16", None),
            make_contract("g", "2020-02-16", None),
            make_contract("h", "2020-03-16", None),
        ];
        let period = Interval::bounded(day("2020-02-01"), day("2020-02-28"));

        let ids: Vec<&str> = active_at(&contracts, "shop_1", &period)
            .into_iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "c", "d", "f", "g"]);

        assert!(active_at(&contracts, "shop_2", &period).is_empty());
    }

    #[test]
    fn test_contains_period_differs_from_overlap() {
        let contract = make_contract("c", "2020-03-01", Some("2020-03-31"));
        let straddling = Interval::bounded(day("2020-03-15"), day("2020-04-15"));

        assert!(overlaps(&contract.active_period, &straddling));
        assert!(!contains_period(&contract, &straddling));
        assert!(contains_period(
            &contract,
            &Interval::bounded(day("2020-03-01"), day("2020-03-31"))
        ));
    }

    #[test]
    fn test_valid_contract_starts_at_midnight() {
        let contract = validate_contract(make_draft(reference_date(), None), &[]).unwrap();

        assert_eq!(contract.active_period.start, day("2020-09-01"));
        assert_eq!(contract.hourly_rate, Decimal::from(15));
        assert!(!contract.id.is_empty());
    }

    #[test]
    fn test_second_open_contract_is_rejected_whichever_starts_first() {
        let date = reference_date();
        let earlier = validate_contract(make_draft(date - Duration::days(10), None), &[]).unwrap();

        let later = validate_contract(make_draft(date - Duration::days(5), None), &[earlier.clone()]);
        assert!(is_overlap(&later.unwrap_err()));

        let before = validate_contract(make_draft(date - Duration::days(30), None), &[earlier]);
        assert!(is_overlap(&before.unwrap_err()));
    }

    #[test]
    fn test_overlap_cases_against_closed_contract() {
        let date = reference_date();
        let existing = validate_contract(
            make_draft(date - Duration::days(20), Some(date - Duration::days(10))),
            &[],
        )
        .unwrap();
        let existing = [existing];

        // starts before, ends during
        let draft = make_draft(date - Duration::days(25), Some(date - Duration::days(15)));
        assert!(is_overlap(&validate_contract(draft, &existing).unwrap_err()));

        // starts during, ends after
        let draft = make_draft(date - Duration::days(15), Some(date - Duration::days(5)));
        assert!(is_overlap(&validate_contract(draft, &existing).unwrap_err()));

        // starts and ends during
        let draft = make_draft(date - Duration::days(18), Some(date - Duration::days(12)));
        assert!(is_overlap(&validate_contract(draft, &existing).unwrap_err()));

        // open-ended, starting after the existing one ended
        let draft = make_draft(date - Duration::days(10), None);
        assert!(validate_contract(draft, &existing).is_ok());
    }

    #[test]
    fn test_boundary_touch_is_accepted() {
        let existing = [make_contract("a", "2020-01-01", Some("2020-02-15"))];
        let draft = make_draft(day("2020-02-15"), Some(day("2020-03-01")));
        assert!(validate_contract(draft, &existing).is_ok());

        let draft = make_draft(day("2020-02-14"), Some(day("2020-03-01")));
        assert!(validate_contract(draft, &existing).is_err());
    }

    #[test]
    fn test_update_is_not_compared_with_itself() {
        let existing = [make_contract("a", "2020-01-01", None)];
        let mut draft = make_draft(day("2020-01-01"), Some(day("2020-06-01")));
        draft.id = Some("a".to_string());

        assert!(validate_contract(draft, &existing).is_ok());
    }

    #[test]
    fn test_contracts_of_other_workplaces_are_ignored() {
        let mut other = make_contract("a", "2020-01-01", None);
        other.workplace_id = "shop_2".to_string();

        let draft = make_draft(day("2020-02-01"), None);
        assert!(validate_contract(draft, &[other]).is_ok());
    }

    #[test]
    fn test_missing_rate_and_fields_are_all_reported() {
        let draft = ContractDraft {
            starts_at: Some(reference_date()),
            ..ContractDraft::default()
        };

        let failure = validate_contract(draft, &[]).unwrap_err();
        assert_eq!(
            failure.errors,
            vec![
                ValidationError::MissingField {
                    field: "worker_id".to_string()
                },
                ValidationError::MissingField {
                    field: "workplace_id".to_string()
                },
                ValidationError::InvalidHourlyRate,
            ]
        );
    }

    #[test]
    fn test_negative_rate_is_rejected() {
        let mut draft = make_draft(reference_date(), None);
        draft.hourly_rate = Some(Decimal::from_str("-10").unwrap());

        let failure = validate_contract(draft, &[]).unwrap_err();
        assert_eq!(failure.errors, vec![ValidationError::InvalidHourlyRate]);
    }

    #[test]
    fn test_zero_rate_is_accepted() {
        let mut draft = make_draft(reference_date(), None);
        draft.hourly_rate = Some(Decimal::ZERO);
        assert!(validate_contract(draft, &[]).is_ok());
    }

    #[test]
    fn test_end_on_normalized_start_is_rejected() {
        // Ends at 08:00 on the day it starts; the start moves to midnight so
        // the contract still spans eight hours.
        let start = day("2020-09-01") + Duration::hours(10);
        let draft = make_draft(start, Some(day("2020-09-01") + Duration::hours(8)));
        assert!(validate_contract(draft, &[]).is_ok());

        let draft = make_draft(start, Some(day("2020-09-01")));
        let failure = validate_contract(draft, &[]).unwrap_err();
        assert_eq!(failure.errors, vec![ValidationError::EndBeforeStart]);
    }
}

//! Wage calculation.
//!
//! Each payable shift is attributed to the contract in effect at the shift's
//! start and paid at that contract's hourly rate. Amounts are carried as
//! exact decimals (rate times seconds, divided into hours once per contract)
//! and rounded to cents only by [`round_currency`].

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{Contract, Shift, ShiftCategory, calendar_month, hours_from_seconds};
use crate::store::{ScheduleStore, ShiftQuery};

/// Pay accrued under one contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WageLine {
    /// The contract the shifts were attributed to.
    pub contract_id: String,
    /// The contract's hourly rate.
    pub hourly_rate: Decimal,
    /// Number of shifts paid under the contract.
    pub shift_count: usize,
    /// Total hours paid under the contract.
    pub hours: Decimal,
    /// `hours * hourly_rate`, unrounded.
    pub amount: Decimal,
}

/// The outcome of a wage calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WageCalculation {
    /// One line per contract with at least one attributed shift, in contract
    /// start order.
    pub lines: Vec<WageLine>,
    /// Payable shifts that no contract covered; they contribute nothing.
    pub orphaned_shift_ids: Vec<String>,
    /// Sum of every line amount, unrounded.
    pub total: Decimal,
}

impl WageCalculation {
    /// The total rounded to cents.
    pub fn rounded_total(&self) -> Decimal {
        round_currency(self.total)
    }
}

/// Rounds an amount to 2 decimal places, halves away from zero.
///
/// # Example
///
/// ```
/// use shift_ledger::calculation::round_currency;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_currency(Decimal::from_str("10.125").unwrap()), Decimal::from_str("10.13").unwrap());
/// assert_eq!(round_currency(Decimal::from_str("-10.125").unwrap()), Decimal::from_str("-10.13").unwrap());
/// ```
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Pays `shifts` under `contracts`.
///
/// Unpayable categories are skipped. Each payable shift goes to the first
/// contract, by start, whose active period contains the shift's start;
/// contracts of one worker and workplace never overlap so at most one
/// applies. A shift no contract covers is recorded as orphaned and logged.
pub fn calculate_wages(shifts: &[Shift], contracts: &[Contract]) -> WageCalculation {
    let mut ordered: Vec<&Contract> = contracts.iter().collect();
    ordered.sort_by(|a, b| {
        a.active_period
            .start
            .cmp(&b.active_period.start)
            .then_with(|| a.id.cmp(&b.id))
    });

    // contract index -> (seconds, shift count)
    let mut accrued: HashMap<usize, (i64, usize)> = HashMap::new();
    let mut orphaned_shift_ids = Vec::new();

    for shift in shifts.iter().filter(|s| s.category.is_payable()) {
        match ordered
            .iter()
            .position(|c| c.active_period.contains_instant(shift.starts_at))
        {
            Some(index) => {
                let entry = accrued.entry(index).or_insert((0, 0));
                entry.0 += shift.duration().num_seconds();
                entry.1 += 1;
            }
            None => {
                warn!(
                    shift_id = %shift.id,
                    workplace_id = %shift.workplace_id,
                    starts_at = %shift.starts_at,
                    "Shift is not covered by any contract, paying nothing"
                );
                orphaned_shift_ids.push(shift.id.clone());
            }
        }
    }

    let lines: Vec<WageLine> = ordered
        .iter()
        .enumerate()
        .filter_map(|(index, contract)| {
            let (seconds, shift_count) = accrued.get(&index).copied()?;
            let hours = hours_from_seconds(seconds);
            Some(WageLine {
                contract_id: contract.id.clone(),
                hourly_rate: contract.hourly_rate,
                shift_count,
                hours,
                amount: contract.hourly_rate * Decimal::from(seconds) / Decimal::from(3600),
            })
        })
        .collect();

    let total = lines.iter().map(|line| line.amount).sum();

    WageCalculation {
        lines,
        orphaned_shift_ids,
        total,
    }
}

/// Computes the wage calculation of a worker at a workplace for the calendar
/// month containing `month`.
///
/// Only shifts starting inside the month are paid. Fails with
/// `WorkerNotFound` or `WorkplaceNotFound` for unknown ids.
pub fn monthly_wage_calculation<S: ScheduleStore + ?Sized>(
    store: &S,
    worker_id: &str,
    workplace_id: &str,
    month: NaiveDate,
) -> EngineResult<WageCalculation> {
    if store.worker(worker_id)?.is_none() {
        return Err(EngineError::WorkerNotFound {
            id: worker_id.to_string(),
        });
    }
    if store.workplace(workplace_id)?.is_none() {
        return Err(EngineError::WorkplaceNotFound {
            id: workplace_id.to_string(),
        });
    }

    let window = calendar_month(month);
    let query = ShiftQuery::for_worker(worker_id)
        .at_workplace(workplace_id)
        .with_categories(&[ShiftCategory::Work, ShiftCategory::PaidAbsence])
        .starting_within(window);

    let shifts = store.shifts(&query)?;
    let contracts = store.contracts_for(worker_id, workplace_id, Some(&window))?;
    let calculation = calculate_wages(&shifts, &contracts);

    debug!(
        worker_id,
        workplace_id,
        month = %window,
        shifts = shifts.len(),
        total = %calculation.total,
        "Computed monthly wages"
    );

    Ok(calculation)
}

/// Returns what a worker earned at a workplace in the calendar month
/// containing `month`, rounded to cents.
pub fn monthly_wages<S: ScheduleStore + ?Sized>(
    store: &S,
    worker_id: &str,
    workplace_id: &str,
    month: NaiveDate,
) -> EngineResult<Decimal> {
    Ok(monthly_wage_calculation(store, worker_id, workplace_id, month)?.rounded_total())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Interval, Worker, Workplace};
    use crate::store::InMemoryStore;
    use chrono::NaiveDateTime;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_datetime(value: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M").unwrap()
    }

    fn make_contract(id: &str, rate: &str, start: &str, end: Option<&str>) -> Contract {
        Contract {
            id: id.to_string(),
            worker_id: "worker_1".to_string(),
            workplace_id: "shop_1".to_string(),
            hourly_rate: dec(rate),
            active_period: Interval::new(make_datetime(start), end.map(make_datetime)),
        }
    }

    fn make_shift(id: &str, category: ShiftCategory, start: &str, end: &str) -> Shift {
        Shift {
            id: id.to_string(),
            workplace_id: "shop_1".to_string(),
            worker_id: Some("worker_1".to_string()),
            category,
            starts_at: make_datetime(start),
            ends_at: make_datetime(end),
        }
    }

    fn successive_contracts() -> Vec<Contract> {
        vec![
            make_contract("first", "10", "2020-01-01 00:00", Some("2020-01-10 00:00")),
            make_contract("second", "12.5", "2020-01-10 00:00", Some("2020-01-20 00:00")),
            make_contract("third", "14.7", "2020-01-20 00:00", None),
        ]
    }

    #[test]
    fn test_shifts_are_paid_at_the_rate_in_effect() {
        let shifts = vec![
            make_shift("a", ShiftCategory::Work, "2020-01-02 10:00", "2020-01-02 14:00"),
            make_shift("b", ShiftCategory::Work, "2020-01-10 10:00", "2020-01-10 12:00"),
            make_shift("c", ShiftCategory::PaidAbsence, "2020-01-22 10:00", "2020-01-22 13:00"),
            make_shift("d", ShiftCategory::UnpaidAbsence, "2020-01-25 14:00", "2020-01-25 18:00"),
        ];

        let result = calculate_wages(&shifts, &successive_contracts());

        assert_eq!(result.lines.len(), 3);
        assert_eq!(result.lines[0].amount, dec("40"));
        assert_eq!(result.lines[1].amount, dec("25"));
        assert_eq!(result.lines[2].hours, dec("3"));
        assert_eq!(result.lines[2].amount, dec("44.1"));
        assert_eq!(result.total, dec("109.1"));
        assert!(result.orphaned_shift_ids.is_empty());
    }

    #[test]
    fn test_boundary_start_goes_to_later_contract() {
        // Starts at the exact instant the first contract ends
        let shifts = vec![make_shift("s", ShiftCategory::Work, "2020-01-10 00:00", "2020-01-10 01:00")];

        let result = calculate_wages(&shifts, &successive_contracts());
        assert_eq!(result.lines.len(), 1);
        assert_eq!(result.lines[0].contract_id, "second");
    }

    #[test]
    fn test_attribution_uses_shift_start_only() {
        // Overnight shift straddling the contract change is paid entirely
        // under the contract it started in
        let shifts = vec![make_shift("s", ShiftCategory::Work, "2020-01-09 22:00", "2020-01-10 02:00")];

        let result = calculate_wages(&shifts, &successive_contracts());
        assert_eq!(result.lines[0].contract_id, "first");
        assert_eq!(result.total, dec("40"));
    }

    #[test]
    fn test_uncovered_shift_is_orphaned() {
        let contracts = vec![make_contract("c", "10", "2020-01-10 00:00", None)];
        let shifts = vec![
            make_shift("early", ShiftCategory::Work, "2020-01-05 10:00", "2020-01-05 12:00"),
            make_shift("covered", ShiftCategory::Work, "2020-01-12 10:00", "2020-01-12 12:00"),
        ];

        let result = calculate_wages(&shifts, &contracts);
        assert_eq!(result.orphaned_shift_ids, vec!["early".to_string()]);
        assert_eq!(result.total, dec("20"));
    }

    #[test]
    fn test_no_contracts_pays_nothing() {
        let shifts = vec![make_shift("s", ShiftCategory::Work, "2020-01-05 10:00", "2020-01-05 12:00")];
        let result = calculate_wages(&shifts, &[]);
        assert_eq!(result.total, Decimal::ZERO);
        assert!(result.lines.is_empty());
    }

    #[test]
    fn test_amounts_are_exact_until_rounded() {
        // 20 minutes at 10/h is 3.333...
        let contracts = vec![make_contract("c", "10", "2020-01-01 00:00", None)];
        let shifts = vec![
            make_shift("a", ShiftCategory::Work, "2020-01-02 10:00", "2020-01-02 10:20"),
            make_shift("b", ShiftCategory::Work, "2020-01-03 10:00", "2020-01-03 10:20"),
            make_shift("c", ShiftCategory::Work, "2020-01-04 10:00", "2020-01-04 10:20"),
        ];

        let result = calculate_wages(&shifts, &contracts);
        assert_eq!(result.total, dec("10"));
        assert_eq!(result.rounded_total(), dec("10.00"));
    }

    #[test]
    fn test_round_currency_midpoint() {
        assert_eq!(round_currency(dec("0.005")), dec("0.01"));
        assert_eq!(round_currency(dec("0.004")), dec("0.00"));
        assert_eq!(round_currency(dec("572.4")), dec("572.40"));
    }

    #[test]
    fn test_monthly_wages_excludes_other_months() {
        let store = InMemoryStore::new();
        store
            .insert_worker(Worker {
                id: "worker_1".to_string(),
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                email: None,
                credential: String::new(),
            })
            .unwrap();
        store
            .insert_workplace(Workplace {
                id: "shop_1".to_string(),
                name: "Mc Donalds".to_string(),
            })
            .unwrap();
        store
            .insert_contract(make_contract("c", "10", "2020-01-01 00:00", None))
            .unwrap();
        for shift in [
            make_shift("jan", ShiftCategory::Work, "2020-01-31 20:00", "2020-02-01 02:00"),
            make_shift("feb", ShiftCategory::Work, "2020-02-01 10:00", "2020-02-01 12:00"),
        ] {
            store.save_shift(shift).unwrap();
        }

        let january = NaiveDate::from_ymd_opt(2020, 1, 15).unwrap();
        assert_eq!(monthly_wages(&store, "worker_1", "shop_1", january).unwrap(), dec("60"));

        let february = NaiveDate::from_ymd_opt(2020, 2, 1).unwrap();
        assert_eq!(monthly_wages(&store, "worker_1", "shop_1", february).unwrap(), dec("20"));

        assert!(matches!(
            monthly_wages(&store, "nobody", "shop_1", january),
            Err(EngineError::WorkerNotFound { .. })
        ));
        assert!(matches!(
            monthly_wages(&store, "worker_1", "shop_9", january),
            Err(EngineError::WorkplaceNotFound { .. })
        ));
    }
}

//! Calculation logic for the shift ledger.
//!
//! This module computes what a worker earned at a workplace: shift
//! attribution to the contract in effect, exact accrual per contract and
//! rounding to cents at the output boundary.

mod wages;

pub use wages::{
    WageCalculation, WageLine, calculate_wages, monthly_wage_calculation, monthly_wages,
    round_currency,
};

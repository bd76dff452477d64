//! Core data models for the shift ledger.
//!
//! This module contains the domain records (workers, workplaces, contracts,
//! shifts) and the interval algebra every time comparison relies on.

mod contract;
mod interval;
mod shift;
mod worker;

pub use contract::{Contract, ContractDraft};
pub use interval::{
    Interval, calendar_day, calendar_month, calendar_week, contains, duration, overlaps,
    start_of_day,
};
pub use shift::{
    Shift, ShiftCategory, ShiftDraft, hours_from_seconds, seconds_from_hours, shifts_between,
};
pub use worker::{Worker, WorkerDraft, Workplace, is_valid_email};

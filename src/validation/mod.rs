//! Business rule validation for contracts and shifts.
//!
//! Validators are pure with respect to storage writes: they take a draft,
//! read whatever siblings they need and return either the built record or a
//! [`crate::error::ValidationFailure`] listing every broken rule.

mod contract;
mod shift;

pub use contract::{active_at, check_overlap, contains_period, validate_contract};
pub use shift::{AggregateWindow, CapPeriod, validate_shift};

//! Shift ledger: contracts, shifts and wages for staff working across
//! several workplaces.
//!
//! This crate validates employment contracts against overlapping tenures,
//! validates shifts against per-shift, daily and weekly duration caps,
//! computes monthly wages from the hourly rate in effect at each shift and
//! aggregates monthly workplace reports.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod service;
pub mod store;
pub mod validation;

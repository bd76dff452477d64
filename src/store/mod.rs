//! Storage collaborator interface.
//!
//! The validators and calculators never touch storage directly: they read
//! through [`ScheduleStore`] and persist only records that passed validation.
//! [`InMemoryStore`] is the reference implementation.

mod memory;
mod query;

pub use memory::InMemoryStore;
pub use query::ShiftQuery;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::models::{Contract, Interval, Shift, Worker, Workplace};

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// A commit-time constraint rejected the write.
    #[error("Constraint violated: {0}")]
    Conflict(String),

    /// The record to update does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The store could not serve the request.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result type of store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Read and write access to workplaces, workers, contracts and shifts.
///
/// Implementations must enforce the contract exclusion constraint in
/// [`ScheduleStore::insert_contract`] at commit time: two contracts of the
/// same worker and workplace whose active periods overlap must never both be
/// stored, even when two writers validated against the same stale snapshot.
pub trait ScheduleStore: Send + Sync {
    // Workplaces

    /// Get a workplace by id
    fn workplace(&self, id: &str) -> StoreResult<Option<Workplace>>;

    /// Get a workplace by its exact name
    fn workplace_by_name(&self, name: &str) -> StoreResult<Option<Workplace>>;

    /// Store a new workplace; names are unique
    fn insert_workplace(&self, workplace: Workplace) -> StoreResult<Workplace>;

    // Workers

    /// Get a worker by id
    fn worker(&self, id: &str) -> StoreResult<Option<Worker>>;

    /// Get a worker by email, ignoring case
    fn worker_by_email(&self, email: &str) -> StoreResult<Option<Worker>>;

    /// Store a new worker; emails are unique regardless of case
    fn insert_worker(&self, worker: Worker) -> StoreResult<Worker>;

    // Contracts

    /// Get a contract by id
    fn contract(&self, id: &str) -> StoreResult<Option<Contract>>;

    /// Contracts of a worker at a workplace, optionally only those whose
    /// active period overlaps `overlapping`
    fn contracts_for(
        &self,
        worker_id: &str,
        workplace_id: &str,
        overlapping: Option<&Interval>,
    ) -> StoreResult<Vec<Contract>>;

    /// Contracts of every worker at a workplace whose active period overlaps
    /// `overlapping`
    fn contracts_at_workplace(
        &self,
        workplace_id: &str,
        overlapping: &Interval,
    ) -> StoreResult<Vec<Contract>>;

    /// Store a new contract, enforcing the exclusion constraint
    fn insert_contract(&self, contract: Contract) -> StoreResult<Contract>;

    /// Set the end of an open contract
    fn close_contract(&self, id: &str, ends_at: NaiveDateTime) -> StoreResult<Contract>;

    // Shifts

    /// Shifts matching the query
    fn shifts(&self, query: &ShiftQuery) -> StoreResult<Vec<Shift>>;

    /// Store a shift, replacing any shift with the same id
    fn save_shift(&self, shift: Shift) -> StoreResult<Shift>;
}

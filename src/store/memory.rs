//! In-memory store implementation

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDateTime;
use tracing::debug;

use super::{ScheduleStore, ShiftQuery, StoreError, StoreResult};
use crate::models::{Contract, Interval, Shift, Worker, Workplace, overlaps};

#[derive(Debug, Default)]
struct Records {
    workplaces: BTreeMap<String, Workplace>,
    workers: BTreeMap<String, Worker>,
    contracts: BTreeMap<String, Contract>,
    shifts: BTreeMap<String, Shift>,
}

/// A [`ScheduleStore`] keeping every record in memory.
///
/// Writes take a single lock, so the constraint checks in the insert methods
/// run serialized with the commit they guard.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<Records>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Records>> {
        self.records
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Records>> {
        self.records
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }
}

impl ScheduleStore for InMemoryStore {
    fn workplace(&self, id: &str) -> StoreResult<Option<Workplace>> {
        Ok(self.read()?.workplaces.get(id).cloned())
    }

    fn workplace_by_name(&self, name: &str) -> StoreResult<Option<Workplace>> {
        Ok(self
            .read()?
            .workplaces
            .values()
            .find(|w| w.name == name)
            .cloned())
    }

    fn insert_workplace(&self, workplace: Workplace) -> StoreResult<Workplace> {
        let mut records = self.write()?;
        if records.workplaces.values().any(|w| w.name == workplace.name) {
            return Err(StoreError::Conflict(format!(
                "workplace name '{}' already exists",
                workplace.name
            )));
        }
        records
            .workplaces
            .insert(workplace.id.clone(), workplace.clone());
        Ok(workplace)
    }

    fn worker(&self, id: &str) -> StoreResult<Option<Worker>> {
        Ok(self.read()?.workers.get(id).cloned())
    }

    fn worker_by_email(&self, email: &str) -> StoreResult<Option<Worker>> {
        Ok(self
            .read()?
            .workers
            .values()
            .find(|w| w.has_email(email))
            .cloned())
    }

    fn insert_worker(&self, worker: Worker) -> StoreResult<Worker> {
        let mut records = self.write()?;
        if let Some(email) = worker.email.as_deref() {
            if records.workers.values().any(|w| w.has_email(email)) {
                return Err(StoreError::Conflict(format!(
                    "worker email '{}' already exists",
                    email
                )));
            }
        }
        records.workers.insert(worker.id.clone(), worker.clone());
        Ok(worker)
    }

    fn contract(&self, id: &str) -> StoreResult<Option<Contract>> {
        Ok(self.read()?.contracts.get(id).cloned())
    }

    fn contracts_for(
        &self,
        worker_id: &str,
        workplace_id: &str,
        overlapping: Option<&Interval>,
    ) -> StoreResult<Vec<Contract>> {
        Ok(self
            .read()?
            .contracts
            .values()
            .filter(|c| c.binds(worker_id, workplace_id))
            .filter(|c| overlapping.is_none_or(|period| overlaps(&c.active_period, period)))
            .cloned()
            .collect())
    }

    fn contracts_at_workplace(
        &self,
        workplace_id: &str,
        overlapping: &Interval,
    ) -> StoreResult<Vec<Contract>> {
        Ok(self
            .read()?
            .contracts
            .values()
            .filter(|c| c.workplace_id == workplace_id)
            .filter(|c| overlaps(&c.active_period, overlapping))
            .cloned()
            .collect())
    }

    fn insert_contract(&self, contract: Contract) -> StoreResult<Contract> {
        let mut records = self.write()?;

        if records.contracts.contains_key(&contract.id) {
            return Err(StoreError::Conflict(format!(
                "contract '{}' already exists",
                contract.id
            )));
        }

        // Exclusion constraint on (worker_id, workplace_id, active_period)
        if let Some(existing) = records.contracts.values().find(|c| {
            c.binds(&contract.worker_id, &contract.workplace_id)
                && overlaps(&c.active_period, &contract.active_period)
        }) {
            return Err(StoreError::Conflict(format!(
                "contract overlaps '{}'",
                existing.id
            )));
        }

        debug!(contract_id = %contract.id, period = %contract.active_period, "Storing contract");
        records
            .contracts
            .insert(contract.id.clone(), contract.clone());
        Ok(contract)
    }

    fn close_contract(&self, id: &str, ends_at: NaiveDateTime) -> StoreResult<Contract> {
        let mut records = self.write()?;
        let contract = records
            .contracts
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("contract '{}'", id)))?;

        if contract.active_period.end.is_some() {
            return Err(StoreError::Conflict(format!(
                "contract '{}' is already closed",
                id
            )));
        }

        if ends_at <= contract.active_period.start {
            return Err(StoreError::Conflict(format!(
                "contract '{}' must end after {}",
                id, contract.active_period.start
            )));
        }

        contract.active_period.end = Some(ends_at);
        Ok(contract.clone())
    }

    fn shifts(&self, query: &ShiftQuery) -> StoreResult<Vec<Shift>> {
        let mut shifts: Vec<Shift> = self
            .read()?
            .shifts
            .values()
            .filter(|s| query.matches(s))
            .cloned()
            .collect();
        shifts.sort_by(|a, b| a.starts_at.cmp(&b.starts_at).then_with(|| a.id.cmp(&b.id)));
        Ok(shifts)
    }

    fn save_shift(&self, shift: Shift) -> StoreResult<Shift> {
        self.write()?.shifts.insert(shift.id.clone(), shift.clone());
        Ok(shift)
    }
}

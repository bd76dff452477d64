//! Application state for the shift ledger API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::{ConfigLoader, DurationPolicy};
use crate::service::ScheduleService;
use crate::store::{InMemoryStore, ScheduleStore};

/// Shared application state.
///
/// Holds the store every handler reads and writes, and the loaded policy
/// the shift validator runs under.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn ScheduleStore>,
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates a new application state over `store` with the given policy.
    pub fn new(store: Arc<dyn ScheduleStore>, config: ConfigLoader) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// Creates a state backed by an empty [`InMemoryStore`].
    pub fn in_memory(config: ConfigLoader) -> Self {
        Self::new(Arc::new(InMemoryStore::new()), config)
    }

    /// Returns the store.
    pub fn store(&self) -> &(dyn ScheduleStore + 'static) {
        self.store.as_ref()
    }

    /// Returns the duration policy.
    pub fn policy(&self) -> &DurationPolicy {
        self.config.durations()
    }

    /// Returns a validating service over the store.
    pub fn service(&self) -> ScheduleService<'_, dyn ScheduleStore> {
        ScheduleService::new(self.store(), self.policy())
    }
}

//! Scheduling service.
//!
//! [`ScheduleService`] is the write path of the ledger: it checks references,
//! runs the validators and persists only records that passed them. Reads go
//! straight to [`crate::calculation`] and [`crate::report`].

use chrono::NaiveDateTime;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::DurationPolicy;
use crate::error::{EngineError, EngineResult, Validated, ValidationError, ValidationFailure};
use crate::models::{
    Contract, ContractDraft, Shift, ShiftDraft, Worker, WorkerDraft, Workplace, is_valid_email,
};
use crate::store::{ScheduleStore, StoreError};
use crate::validation::{check_overlap, validate_contract, validate_shift};

/// Validating write access to a [`ScheduleStore`].
///
/// # Example
///
/// ```
/// use shift_ledger::config::DurationPolicy;
/// use shift_ledger::models::{ContractDraft, WorkerDraft};
/// use shift_ledger::service::ScheduleService;
/// use shift_ledger::store::InMemoryStore;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let store = InMemoryStore::new();
/// let policy = DurationPolicy::default();
/// let service = ScheduleService::new(&store, &policy);
///
/// let shop = service.register_workplace("Mc Donalds").unwrap();
/// let worker = service
///     .register_worker(WorkerDraft {
///         first_name: "Jane".to_string(),
///         last_name: "Doe".to_string(),
///         ..WorkerDraft::default()
///     })
///     .unwrap();
///
/// let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap().and_hms_opt(9, 30, 0).unwrap();
/// let contract = service
///     .create_contract(ContractDraft {
///         worker_id: Some(worker.id),
///         workplace_id: Some(shop.id),
///         hourly_rate: Some(Decimal::from(10)),
///         starts_at: Some(start),
///         ..ContractDraft::default()
///     })
///     .unwrap();
/// assert_eq!(contract.active_period.start.to_string(), "2020-01-01 00:00:00");
/// ```
pub struct ScheduleService<'a, S: ScheduleStore + ?Sized> {
    store: &'a S,
    policy: &'a DurationPolicy,
}

impl<'a, S: ScheduleStore + ?Sized> ScheduleService<'a, S> {
    /// Creates a service writing to `store` under `policy`.
    pub fn new(store: &'a S, policy: &'a DurationPolicy) -> Self {
        Self { store, policy }
    }

    /// Registers a workplace under a unique, non-blank name.
    pub fn register_workplace(&self, name: &str) -> EngineResult<Workplace> {
        let name = name.trim();
        if name.is_empty() {
            return Err(missing("name"));
        }
        if self.store.workplace_by_name(name)?.is_some() {
            return Err(name_taken(name));
        }

        let workplace = Workplace {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
        };
        let workplace = self
            .store
            .insert_workplace(workplace)
            .map_err(|error| match error {
                StoreError::Conflict(_) => name_taken(name),
                other => other.into(),
            })?;

        info!(workplace_id = %workplace.id, name = %workplace.name, "Registered workplace");
        Ok(workplace)
    }

    /// Registers a worker.
    ///
    /// An empty email counts as no email. A present email must be well
    /// formed and unused by any other worker, ignoring case.
    pub fn register_worker(&self, draft: WorkerDraft) -> EngineResult<Worker> {
        let mut errors = Vec::new();
        if draft.first_name.trim().is_empty() {
            errors.push(missing_field("first_name"));
        }
        if draft.last_name.trim().is_empty() {
            errors.push(missing_field("last_name"));
        }

        let email = draft
            .email
            .map(|email| email.trim().to_string())
            .filter(|email| !email.is_empty());
        if let Some(email) = email.as_deref() {
            if !is_valid_email(email) {
                errors.push(ValidationError::InvalidEmail {
                    email: email.to_string(),
                });
            } else if self.store.worker_by_email(email)?.is_some() {
                errors.push(email_taken(email));
            }
        }

        let worker = ValidationFailure::check(
            errors,
            Worker {
                id: Uuid::new_v4().to_string(),
                first_name: draft.first_name.trim().to_string(),
                last_name: draft.last_name.trim().to_string(),
                email,
                credential: draft.credential,
            },
        )?;

        let taken = worker.email.clone().unwrap_or_default();
        let worker = self
            .store
            .insert_worker(worker)
            .map_err(|error| match error {
                StoreError::Conflict(_) => ValidationFailure::single(email_taken(&taken)).into(),
                other => EngineError::from(other),
            })?;

        info!(worker_id = %worker.id, "Registered worker");
        Ok(worker)
    }

    /// Validates and stores a contract.
    ///
    /// The worker and workplace must exist; an unknown one is reported as a
    /// missing field alongside every other violation.
    pub fn create_contract(&self, draft: ContractDraft) -> EngineResult<Contract> {
        let mut errors = Vec::new();
        if let Some(id) = draft.id.as_deref() {
            if self.store.contract(id)?.is_some() {
                errors.push(contract_exists(id));
            }
        }
        if let Some(id) = draft.worker_id.as_deref() {
            if self.store.worker(id)?.is_none() {
                errors.push(missing_field("worker_id"));
            }
        }
        if let Some(id) = draft.workplace_id.as_deref() {
            if self.store.workplace(id)?.is_none() {
                errors.push(missing_field("workplace_id"));
            }
        }

        let siblings = match (draft.worker_id.as_deref(), draft.workplace_id.as_deref()) {
            (Some(worker_id), Some(workplace_id)) => {
                self.store.contracts_for(worker_id, workplace_id, None)?
            }
            _ => Vec::new(),
        };

        let contract = merge(errors, validate_contract(draft, &siblings))?;

        let stored = match self.store.insert_contract(contract.clone()) {
            Ok(stored) => stored,
            Err(StoreError::Conflict(message)) => {
                // Lost a race against a concurrent insert; name the winner.
                debug!(contract_id = %contract.id, %message, "Store rejected contract");
                if self.store.contract(&contract.id)?.is_some() {
                    return Err(ValidationFailure::single(contract_exists(&contract.id)).into());
                }
                let current =
                    self.store
                        .contracts_for(&contract.worker_id, &contract.workplace_id, None)?;
                return Err(match check_overlap(&contract, &current) {
                    Err(error) => ValidationFailure::single(error).into(),
                    Ok(()) => StoreError::Conflict(message).into(),
                });
            }
            Err(other) => return Err(other.into()),
        };

        info!(
            contract_id = %stored.id,
            worker_id = %stored.worker_id,
            workplace_id = %stored.workplace_id,
            period = %stored.active_period,
            "Created contract"
        );
        Ok(stored)
    }

    /// Ends an open-ended contract at `ends_at`.
    pub fn close_contract(&self, contract_id: &str, ends_at: NaiveDateTime) -> EngineResult<Contract> {
        let contract = self
            .store
            .contract(contract_id)?
            .ok_or_else(|| EngineError::ContractNotFound {
                id: contract_id.to_string(),
            })?;

        if !contract.is_open() {
            return Err(already_closed(contract_id));
        }
        if ends_at <= contract.active_period.start {
            return Err(ValidationFailure::single(ValidationError::EndBeforeStart).into());
        }

        let closed = self
            .store
            .close_contract(contract_id, ends_at)
            .map_err(|error| match error {
                StoreError::Conflict(_) => already_closed(contract_id),
                StoreError::NotFound(_) => EngineError::ContractNotFound {
                    id: contract_id.to_string(),
                },
                other => other.into(),
            })?;

        info!(contract_id, period = %closed.active_period, "Closed contract");
        Ok(closed)
    }

    /// Validates and stores a shift, replacing the stored shift with the same
    /// id if any.
    ///
    /// The workplace and, when assigned, the worker must exist.
    pub fn save_shift(&self, draft: ShiftDraft) -> EngineResult<Shift> {
        let mut errors = Vec::new();
        if let Some(id) = draft.workplace_id.as_deref() {
            if self.store.workplace(id)?.is_none() {
                errors.push(missing_field("workplace_id"));
            }
        }
        if let Some(id) = draft.worker_id.as_deref() {
            if self.store.worker(id)?.is_none() {
                errors.push(missing_field("worker_id"));
            }
        }

        let shift = merge(errors, validate_shift(draft, self.store, self.policy)?)?;
        let shift = self.store.save_shift(shift)?;

        info!(
            shift_id = %shift.id,
            workplace_id = %shift.workplace_id,
            category = %shift.category,
            "Saved shift"
        );
        Ok(shift)
    }
}

/// Prepends reference errors to a validation outcome.
fn merge<T>(mut errors: Vec<ValidationError>, validated: Validated<T>) -> Validated<T> {
    match validated {
        Ok(value) => ValidationFailure::check(errors, value),
        Err(failure) => {
            errors.extend(failure.errors);
            Err(ValidationFailure { errors })
        }
    }
}

fn missing_field(field: &str) -> ValidationError {
    ValidationError::MissingField {
        field: field.to_string(),
    }
}

fn missing(field: &str) -> EngineError {
    ValidationFailure::single(missing_field(field)).into()
}

fn name_taken(name: &str) -> EngineError {
    ValidationFailure::single(ValidationError::NameTaken {
        name: name.to_string(),
    })
    .into()
}

fn email_taken(email: &str) -> ValidationError {
    ValidationError::EmailTaken {
        email: email.to_string(),
    }
}

fn contract_exists(contract_id: &str) -> ValidationError {
    ValidationError::ContractExists {
        contract_id: contract_id.to_string(),
    }
}

fn already_closed(contract_id: &str) -> EngineError {
    ValidationFailure::single(ValidationError::ContractAlreadyClosed {
        contract_id: contract_id.to_string(),
    })
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShiftCategory;
    use crate::store::InMemoryStore;
    use chrono::{Duration, NaiveDate};
    use rust_decimal::Decimal;

    fn midnight(m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn worker_draft(email: Option<&str>) -> WorkerDraft {
        WorkerDraft {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: email.map(str::to_string),
            credential: String::new(),
        }
    }

    fn errors_of(error: EngineError) -> Vec<ValidationError> {
        match error {
            EngineError::Validation(failure) => failure.errors,
            other => panic!("expected a validation failure, got {:?}", other),
        }
    }

    struct Setup {
        store: InMemoryStore,
        policy: DurationPolicy,
    }

    impl Setup {
        fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
                policy: DurationPolicy::default(),
            }
        }

        fn service(&self) -> ScheduleService<'_, InMemoryStore> {
            ScheduleService::new(&self.store, &self.policy)
        }

        fn worker_and_shop(&self) -> (Worker, Workplace) {
            let service = self.service();
            let worker = service.register_worker(worker_draft(None)).unwrap();
            let shop = service.register_workplace("Mc Donalds").unwrap();
            (worker, shop)
        }
    }

    fn contract_draft(worker: &Worker, shop: &Workplace, start: NaiveDateTime, end: Option<NaiveDateTime>) -> ContractDraft {
        ContractDraft {
            id: None,
            worker_id: Some(worker.id.clone()),
            workplace_id: Some(shop.id.clone()),
            hourly_rate: Some(Decimal::from(10)),
            starts_at: Some(start),
            ends_at: end,
        }
    }

    #[test]
    fn test_workplace_names_are_unique() {
        let setup = Setup::new();
        let service = setup.service();

        service.register_workplace("Five Guys").unwrap();
        assert_eq!(
            errors_of(service.register_workplace(" Five Guys ").unwrap_err()),
            vec![ValidationError::NameTaken {
                name: "Five Guys".to_string()
            }]
        );
        assert!(service.register_workplace("  ").is_err());
    }

    #[test]
    fn test_empty_email_is_accepted() {
        let setup = Setup::new();
        let worker = setup.service().register_worker(worker_draft(Some(""))).unwrap();
        assert_eq!(worker.email, None);
    }

    #[test]
    fn test_malformed_email_is_rejected() {
        let setup = Setup::new();
        let error = setup
            .service()
            .register_worker(worker_draft(Some("wrong@format.email@domain")))
            .unwrap_err();
        assert_eq!(
            errors_of(error),
            vec![ValidationError::InvalidEmail {
                email: "wrong@format.email@domain".to_string()
            }]
        );
    }

    #[test]
    fn test_taken_email_is_rejected_ignoring_case() {
        let setup = Setup::new();
        let service = setup.service();
        service
            .register_worker(worker_draft(Some("ALREADY-EXISTING@DOMAIN.COM")))
            .unwrap();

        let error = service
            .register_worker(worker_draft(Some("already-existing@domain.com")))
            .unwrap_err();
        assert!(matches!(
            errors_of(error).as_slice(),
            [ValidationError::EmailTaken { .. }]
        ));
    }

    #[test]
    fn test_contract_requires_known_worker_and_workplace() {
        let setup = Setup::new();
        let draft = ContractDraft {
            worker_id: Some("ghost".to_string()),
            workplace_id: Some("nowhere".to_string()),
            hourly_rate: Some(Decimal::from(10)),
            starts_at: Some(midnight(1, 1)),
            ..ContractDraft::default()
        };

        let errors = errors_of(setup.service().create_contract(draft).unwrap_err());
        assert_eq!(errors, vec![missing_field("worker_id"), missing_field("workplace_id")]);
    }

    #[test]
    fn test_second_open_contract_is_rejected() {
        let setup = Setup::new();
        let (worker, shop) = setup.worker_and_shop();
        let service = setup.service();

        let first = service
            .create_contract(contract_draft(&worker, &shop, midnight(1, 1), None))
            .unwrap();
        let error = service
            .create_contract(contract_draft(&worker, &shop, midnight(6, 1), None))
            .unwrap_err();

        assert_eq!(
            errors_of(error),
            vec![ValidationError::OverlappingContract {
                contract_id: first.id
            }]
        );
    }

    #[test]
    fn test_stored_contract_cannot_be_resubmitted() {
        let setup = Setup::new();
        let (worker, shop) = setup.worker_and_shop();
        let service = setup.service();

        let original = service
            .create_contract(contract_draft(&worker, &shop, midnight(1, 1), None))
            .unwrap();
        service
            .save_shift(ShiftDraft {
                id: None,
                workplace_id: Some(shop.id.clone()),
                worker_id: Some(worker.id.clone()),
                category: ShiftCategory::Work,
                starts_at: Some(midnight(1, 2) + Duration::hours(10)),
                ends_at: Some(midnight(1, 2) + Duration::hours(14)),
            })
            .unwrap();

        let rewrite = ContractDraft {
            id: Some(original.id.clone()),
            hourly_rate: Some(Decimal::from(99)),
            ..contract_draft(&worker, &shop, midnight(1, 1), None)
        };
        assert_eq!(
            errors_of(service.create_contract(rewrite).unwrap_err()),
            vec![ValidationError::ContractExists {
                contract_id: original.id.clone()
            }]
        );

        // Closed contracts cannot be reopened either
        service.close_contract(&original.id, midnight(2, 1)).unwrap();
        let reopen = ContractDraft {
            id: Some(original.id.clone()),
            ..contract_draft(&worker, &shop, midnight(1, 1), None)
        };
        assert!(matches!(
            errors_of(service.create_contract(reopen).unwrap_err()).as_slice(),
            [ValidationError::ContractExists { .. }]
        ));

        let stored = setup.store.contract(&original.id).unwrap().unwrap();
        assert_eq!(stored.hourly_rate, Decimal::from(10));
        assert_eq!(stored.active_period.end, Some(midnight(2, 1)));
        assert_eq!(
            crate::calculation::monthly_wages(&setup.store, &worker.id, &shop.id, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
                .unwrap(),
            Decimal::from(40)
        );
    }

    #[test]
    fn test_closing_then_renewing_contract() {
        let setup = Setup::new();
        let (worker, shop) = setup.worker_and_shop();
        let service = setup.service();

        let first = service
            .create_contract(contract_draft(&worker, &shop, midnight(1, 1), None))
            .unwrap();
        let closed = service.close_contract(&first.id, midnight(2, 1)).unwrap();
        assert!(!closed.is_open());

        service
            .create_contract(contract_draft(&worker, &shop, midnight(2, 1), None))
            .unwrap();

        let error = service.close_contract(&first.id, midnight(3, 1)).unwrap_err();
        assert!(matches!(
            errors_of(error).as_slice(),
            [ValidationError::ContractAlreadyClosed { .. }]
        ));
    }

    #[test]
    fn test_close_contract_rejects_early_end_and_unknown_id() {
        let setup = Setup::new();
        let (worker, shop) = setup.worker_and_shop();
        let service = setup.service();

        let contract = service
            .create_contract(contract_draft(&worker, &shop, midnight(3, 1), None))
            .unwrap();

        let error = service.close_contract(&contract.id, midnight(3, 1)).unwrap_err();
        assert_eq!(errors_of(error), vec![ValidationError::EndBeforeStart]);

        assert!(matches!(
            service.close_contract("missing", midnight(3, 1)),
            Err(EngineError::ContractNotFound { .. })
        ));
    }

    #[test]
    fn test_save_shift_checks_references() {
        let setup = Setup::new();
        let (worker, shop) = setup.worker_and_shop();
        let service = setup.service();

        let starts_at = midnight(1, 2) + Duration::hours(9);
        let draft = ShiftDraft {
            id: None,
            workplace_id: Some(shop.id.clone()),
            worker_id: Some(worker.id.clone()),
            category: ShiftCategory::Work,
            starts_at: Some(starts_at),
            ends_at: Some(starts_at + Duration::hours(3)),
        };
        let shift = service.save_shift(draft.clone()).unwrap();
        assert_eq!(shift.duration_in_hours(), Decimal::from(3));

        let mut unknown = draft.clone();
        unknown.worker_id = Some("ghost".to_string());
        unknown.workplace_id = Some("nowhere".to_string());
        let errors = errors_of(service.save_shift(unknown).unwrap_err());
        assert_eq!(errors, vec![missing_field("workplace_id"), missing_field("worker_id")]);
    }

    #[test]
    fn test_save_shift_accumulates_reference_and_rule_errors() {
        let setup = Setup::new();
        let (_, shop) = setup.worker_and_shop();
        let service = setup.service();

        let starts_at = midnight(1, 2);
        let draft = ShiftDraft {
            workplace_id: Some(shop.id),
            worker_id: Some("ghost".to_string()),
            starts_at: Some(starts_at),
            ends_at: Some(starts_at + Duration::hours(11)),
            ..ShiftDraft::default()
        };

        let errors = errors_of(service.save_shift(draft).unwrap_err());
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0], missing_field("worker_id"));
        assert!(matches!(errors[1], ValidationError::ShiftTooLong { .. }));
    }
}

//! Error types for the shift ledger.
//!
//! Two kinds of failure exist and they are kept apart on purpose:
//!
//! - [`ValidationError`]s describe data that breaks a business rule. They are
//!   collected into a [`ValidationFailure`] so that every violated rule can be
//!   surfaced at once.
//! - [`EngineError`]s are fatal for the call that produced them: unknown
//!   identifiers, missing arguments, broken configuration or a failing store.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::ShiftCategory;
use crate::store::StoreError;

/// A single broken business rule.
///
/// # Example
///
/// ```
/// use shift_ledger::error::ValidationError;
///
/// let error = ValidationError::MissingField { field: "starts_at".to_string() };
/// assert_eq!(error.to_string(), "starts_at is missing");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ValidationError {
    /// A required field was not provided, or references a record that does not exist.
    #[error("{field} is missing")]
    MissingField {
        /// The name of the missing field.
        field: String,
    },

    /// The end of a period is not strictly after its start.
    #[error("end must be after start")]
    EndBeforeStart,

    /// A single shift lasts longer than its category allows.
    #[error("{category} shift lasts {hours}h, more than the {cap_hours}h allowed")]
    ShiftTooLong {
        /// The category of the rejected shift.
        category: ShiftCategory,
        /// The length of the shift in hours.
        hours: Decimal,
        /// The cap for the category in hours.
        cap_hours: Decimal,
    },

    /// The worker's work time on the shift's calendar day would exceed the cap.
    #[error("daily work time would reach {hours}h, more than the {cap_hours}h allowed")]
    MaxDailyDurationExceeded {
        /// The total work hours for the day including the candidate shift.
        hours: Decimal,
        /// The daily cap in hours.
        cap_hours: Decimal,
    },

    /// The worker's work time in the shift's calendar week would exceed the cap.
    #[error("weekly work time would reach {hours}h, more than the {cap_hours}h allowed")]
    MaxWeeklyDurationExceeded {
        /// The total work hours for the week including the candidate shift.
        hours: Decimal,
        /// The weekly cap in hours.
        cap_hours: Decimal,
    },

    /// The contract's active period overlaps another contract of the same
    /// worker at the same workplace.
    #[error("contract overlaps existing contract '{contract_id}'")]
    OverlappingContract {
        /// The id of the contract that is overlapped.
        contract_id: String,
    },

    /// The hourly rate is missing or negative.
    #[error("hourly rate must be present and not negative")]
    InvalidHourlyRate,

    /// The email address is not well formed.
    #[error("email '{email}' is invalid")]
    InvalidEmail {
        /// The rejected address.
        email: String,
    },

    /// Another worker already uses this email address.
    #[error("email '{email}' is already taken")]
    EmailTaken {
        /// The rejected address.
        email: String,
    },

    /// Another workplace already uses this name.
    #[error("name '{name}' is already taken")]
    NameTaken {
        /// The rejected name.
        name: String,
    },

    /// A stored contract cannot be submitted again; only closing it is allowed.
    #[error("contract '{contract_id}' already exists")]
    ContractExists {
        /// The id of the stored contract.
        contract_id: String,
    },

    /// Only an open-ended contract can be closed.
    #[error("contract '{contract_id}' is already closed")]
    ContractAlreadyClosed {
        /// The id of the closed contract.
        contract_id: String,
    },
}

/// Every rule a record breaks, reported together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("validation failed: {}", joined(.errors))]
pub struct ValidationFailure {
    /// The violated rules, in the order they were checked.
    pub errors: Vec<ValidationError>,
}

impl ValidationFailure {
    /// Wraps a single violation.
    pub fn single(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }

    /// Returns true if any violation matches the predicate.
    pub fn has(&self, predicate: impl Fn(&ValidationError) -> bool) -> bool {
        self.errors.iter().any(predicate)
    }

    /// Turns a list of collected violations into a result.
    pub fn check<T>(errors: Vec<ValidationError>, value: T) -> Result<T, Self> {
        if errors.is_empty() {
            Ok(value)
        } else {
            Err(Self { errors })
        }
    }
}

fn joined(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result of a validation step: the validated record or every violation.
pub type Validated<T> = Result<T, ValidationFailure>;

/// The fatal error type of the shift ledger.
///
/// # Example
///
/// ```
/// use shift_ledger::error::EngineError;
///
/// let error = EngineError::WorkplaceNotFound { id: "shop_42".to_string() };
/// assert_eq!(error.to_string(), "Workplace not found: shop_42");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// No workplace exists with the given id.
    #[error("Workplace not found: {id}")]
    WorkplaceNotFound {
        /// The unknown workplace id.
        id: String,
    },

    /// No worker exists with the given id.
    #[error("Worker not found: {id}")]
    WorkerNotFound {
        /// The unknown worker id.
        id: String,
    },

    /// No contract exists with the given id.
    #[error("Contract not found: {id}")]
    ContractNotFound {
        /// The unknown contract id.
        id: String,
    },

    /// A required argument was not supplied by the caller.
    #[error("ERROR: {message}")]
    MissingArgument {
        /// A description of the missing argument.
        message: String,
    },

    /// A record was rejected by validation.
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration was parsed but holds unusable values.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// A description of the invalid value.
        message: String,
    },

    /// The storage collaborator failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The report could not be written to its destination.
    #[error("Failed to write report: {message}")]
    ReportWrite {
        /// A description of the write failure.
        message: String,
    },
}

impl From<csv::Error> for EngineError {
    fn from(error: csv::Error) -> Self {
        EngineError::ReportWrite {
            message: error.to_string(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

//! Worker and workplace models.

use serde::{Deserialize, Serialize};

/// A person who can hold contracts and be assigned shifts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    /// Unique identifier for the worker.
    pub id: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact address, unique across workers regardless of case.
    #[serde(default)]
    pub email: Option<String>,
    /// Opaque credential owned by the identity provider.
    #[serde(default, skip_serializing)]
    pub credential: String,
}

impl Worker {
    /// Returns true if the worker's email matches `email`, ignoring case.
    pub fn has_email(&self, email: &str) -> bool {
        self.email
            .as_deref()
            .is_some_and(|own| own.eq_ignore_ascii_case(email))
    }
}

/// An unvalidated worker registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerDraft {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact address; an empty string counts as no address.
    #[serde(default)]
    pub email: Option<String>,
    /// Opaque credential owned by the identity provider.
    #[serde(default)]
    pub credential: String,
}

/// A place of work owning contracts and shifts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workplace {
    /// Unique identifier for the workplace.
    pub id: String,
    /// Display name, unique across workplaces.
    pub name: String,
}

/// Checks the shape of an email address: one `@`, a non-empty local part and
/// a dotted domain, no whitespace.
///
/// ```
/// use shift_ledger::models::is_valid_email;
///
/// assert!(is_valid_email("test-email@domain.io"));
/// assert!(!is_valid_email("wrong@format.email@domain"));
/// ```
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

//! Request types for the shift ledger API.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{ContractDraft, ShiftCategory, ShiftDraft, WorkerDraft};

/// Request body for `POST /workplaces`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWorkplaceRequest {
    /// Display name, unique across workplaces.
    pub name: String,
}

/// Request body for `POST /workers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWorkerRequest {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact address.
    #[serde(default)]
    pub email: Option<String>,
}

impl From<CreateWorkerRequest> for WorkerDraft {
    fn from(req: CreateWorkerRequest) -> Self {
        WorkerDraft {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            credential: String::new(),
        }
    }
}

/// Request body for `POST /contracts`.
///
/// Every field is optional so that all missing ones are reported together.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateContractRequest {
    /// The employed worker.
    #[serde(default)]
    pub worker_id: Option<String>,
    /// The employing workplace.
    #[serde(default)]
    pub workplace_id: Option<String>,
    /// Pay per hour.
    #[serde(default)]
    pub hourly_rate: Option<Decimal>,
    /// Start of the contract.
    #[serde(default)]
    pub starts_at: Option<NaiveDateTime>,
    /// End of the contract, absent for open-ended contracts.
    #[serde(default)]
    pub ends_at: Option<NaiveDateTime>,
}

impl From<CreateContractRequest> for ContractDraft {
    fn from(req: CreateContractRequest) -> Self {
        ContractDraft {
            id: None,
            worker_id: req.worker_id,
            workplace_id: req.workplace_id,
            hourly_rate: req.hourly_rate,
            starts_at: req.starts_at,
            ends_at: req.ends_at,
        }
    }
}

/// Request body for `POST /contracts/:id/close`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloseContractRequest {
    /// The new end of the contract.
    pub ends_at: NaiveDateTime,
}

/// Request body for `POST /shifts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveShiftRequest {
    /// Id of the shift to replace, if editing.
    #[serde(default)]
    pub id: Option<String>,
    /// The workplace the shift belongs to.
    #[serde(default)]
    pub workplace_id: Option<String>,
    /// The assigned worker.
    #[serde(default)]
    pub worker_id: Option<String>,
    /// What the shift is spent on; work when absent.
    #[serde(default)]
    pub category: ShiftCategory,
    /// Start of the shift.
    #[serde(default)]
    pub starts_at: Option<NaiveDateTime>,
    /// End of the shift.
    #[serde(default)]
    pub ends_at: Option<NaiveDateTime>,
}

impl From<SaveShiftRequest> for ShiftDraft {
    fn from(req: SaveShiftRequest) -> Self {
        ShiftDraft {
            id: req.id,
            workplace_id: req.workplace_id,
            worker_id: req.worker_id,
            category: req.category,
            starts_at: req.starts_at,
            ends_at: req.ends_at,
        }
    }
}

/// Query string of `GET /workers/:worker_id/wages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WagesQuery {
    /// The workplace the wages were earned at.
    pub workplace_id: String,
    /// Any day of the month to compute.
    pub month: NaiveDate,
}

/// Output format of a monthly report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// The report as JSON.
    #[default]
    Json,
    /// The semicolon separated CSV export.
    Csv,
}

/// Query string of `GET /workplaces/:id/reports/monthly`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportQuery {
    /// Any day of the month to report on.
    #[serde(default)]
    pub month: Option<NaiveDate>,
    /// Output format.
    #[serde(default)]
    pub format: ReportFormat,
}

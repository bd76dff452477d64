//! Response types for the shift ledger API.
//!
//! This module defines the success bodies, the error body and the mapping
//! from [`EngineError`] to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{WageCalculation, WageLine};
use crate::error::{EngineError, ValidationError};
use crate::store::StoreError;

/// Response body of `GET /workers/:worker_id/wages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WagesResponse {
    /// The paid worker.
    pub worker_id: String,
    /// The workplace the wages were earned at.
    pub workplace_id: String,
    /// First day of the computed month.
    pub month: NaiveDate,
    /// Total for the month, rounded to cents.
    pub wages: Decimal,
    /// Accrual per contract, unrounded.
    pub lines: Vec<WageLine>,
    /// Payable shifts no contract covered.
    pub orphaned_shift_ids: Vec<String>,
}

impl WagesResponse {
    /// Builds the response from a calculation.
    pub fn new(worker_id: String, workplace_id: String, month: NaiveDate, calculation: WageCalculation) -> Self {
        Self {
            worker_id,
            workplace_id,
            month,
            wages: calculation.rounded_total(),
            lines: calculation.lines,
            orphaned_shift_ids: calculation.orphaned_shift_ids,
        }
    }
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Every broken business rule, for validation failures.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<ValidationError>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            violations: Vec::new(),
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            details: Some(details.into()),
            ..Self::new(code, message)
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates an invalid query string error response.
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::new("INVALID_QUERY", message)
    }

    fn not_found(kind: &str, id: &str) -> Self {
        Self::with_details(
            format!("{}_NOT_FOUND", kind.to_uppercase()),
            format!("{} not found: {}", kind, id),
            format!("No {} exists with id '{}'", kind, id),
        )
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let (status, error) = match error {
            EngineError::WorkplaceNotFound { id } => {
                (StatusCode::NOT_FOUND, ApiError::not_found("Workplace", &id))
            }
            EngineError::WorkerNotFound { id } => {
                (StatusCode::NOT_FOUND, ApiError::not_found("Worker", &id))
            }
            EngineError::ContractNotFound { id } => {
                (StatusCode::NOT_FOUND, ApiError::not_found("Contract", &id))
            }
            EngineError::MissingArgument { message } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("MISSING_ARGUMENT", format!("ERROR: {}", message)),
            ),
            EngineError::Validation(failure) => {
                let message = failure.to_string();
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ApiError {
                        violations: failure.errors,
                        ..ApiError::new("VALIDATION_ERROR", message)
                    },
                )
            }
            EngineError::ConfigNotFound { path } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            ),
            EngineError::ConfigParseError { path, message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            ),
            EngineError::InvalidConfig { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Invalid configuration", message),
            ),
            EngineError::Store(StoreError::Conflict(message)) => (
                StatusCode::CONFLICT,
                ApiError::with_details("CONFLICT", "Write rejected by the store", message),
            ),
            EngineError::Store(other) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiError::with_details("STORE_ERROR", "Store failure", other.to_string()),
            ),
            EngineError::ReportWrite { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("REPORT_ERROR", "Report could not be written", message),
            ),
        };
        ApiErrorResponse { status, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationFailure;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
        assert!(!json.contains("violations"));
    }

    #[test]
    fn test_unknown_ids_map_to_not_found() {
        let response: ApiErrorResponse = EngineError::WorkplaceNotFound {
            id: "shop_9".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.error.code, "WORKPLACE_NOT_FOUND");
        assert!(response.error.message.contains("shop_9"));
    }

    #[test]
    fn test_validation_failure_lists_violations() {
        let failure = ValidationFailure {
            errors: vec![
                ValidationError::EndBeforeStart,
                ValidationError::InvalidHourlyRate,
            ],
        };
        let response: ApiErrorResponse = EngineError::from(failure).into();

        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.error.violations.len(), 2);

        let json = serde_json::to_value(&response.error).unwrap();
        assert_eq!(json["violations"][0]["code"], "end_before_start");
    }

    #[test]
    fn test_missing_argument_is_bad_request() {
        let response: ApiErrorResponse = EngineError::MissingArgument {
            message: "Date is missing".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.message, "ERROR: Date is missing");
    }
}

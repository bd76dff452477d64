//! HTTP request handlers for the shift ledger API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::monthly_wage_calculation;
use crate::error::{EngineError, EngineResult};
use crate::models::calendar_month;
use crate::report::{CsvReportWriter, MonthlyReportGenerator};

use super::request::{
    CloseContractRequest, CreateContractRequest, CreateWorkerRequest, CreateWorkplaceRequest,
    ReportFormat, ReportQuery, SaveShiftRequest, WagesQuery,
};
use super::response::{ApiError, ApiErrorResponse, WagesResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/workplaces", post(create_workplace_handler))
        .route("/workers", post(create_worker_handler))
        .route("/contracts", post(create_contract_handler))
        .route("/contracts/:id/close", post(close_contract_handler))
        .route("/shifts", post(save_shift_handler))
        .route("/workers/:worker_id/wages", get(wages_handler))
        .route("/workplaces/:id/reports/monthly", get(monthly_report_handler))
        .with_state(state)
}

/// Handler for POST /workplaces.
async fn create_workplace_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateWorkplaceRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing workplace registration");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };

    respond(
        correlation_id,
        StatusCode::CREATED,
        state.service().register_workplace(&request.name),
    )
}

/// Handler for POST /workers.
async fn create_worker_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateWorkerRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing worker registration");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };

    respond(
        correlation_id,
        StatusCode::CREATED,
        state.service().register_worker(request.into()),
    )
}

/// Handler for POST /contracts.
async fn create_contract_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateContractRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing contract creation");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };

    respond(
        correlation_id,
        StatusCode::CREATED,
        state.service().create_contract(request.into()),
    )
}

/// Handler for POST /contracts/:id/close.
async fn close_contract_handler(
    State(state): State<AppState>,
    Path(contract_id): Path<String>,
    payload: Result<Json<CloseContractRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, contract_id = %contract_id, "Processing contract closing");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };

    respond(
        correlation_id,
        StatusCode::OK,
        state.service().close_contract(&contract_id, request.ends_at),
    )
}

/// Handler for POST /shifts.
async fn save_shift_handler(
    State(state): State<AppState>,
    payload: Result<Json<SaveShiftRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing shift");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };

    respond(
        correlation_id,
        StatusCode::CREATED,
        state.service().save_shift(request.into()),
    )
}

/// Handler for GET /workers/:worker_id/wages.
async fn wages_handler(
    State(state): State<AppState>,
    Path(worker_id): Path<String>,
    query: Result<Query<WagesQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, worker_id = %worker_id, "Processing wages request");

    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return query_rejection_response(correlation_id, rejection),
    };

    let month = calendar_month(query.month).start.date();
    let result = monthly_wage_calculation(state.store(), &worker_id, &query.workplace_id, query.month)
        .map(|calculation| WagesResponse::new(worker_id.clone(), query.workplace_id.clone(), month, calculation));

    respond(correlation_id, StatusCode::OK, result)
}

/// Handler for GET /workplaces/:id/reports/monthly.
///
/// Answers JSON by default and the CSV export with `format=csv`.
async fn monthly_report_handler(
    State(state): State<AppState>,
    Path(workplace_id): Path<String>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, workplace_id = %workplace_id, "Processing monthly report");

    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return query_rejection_response(correlation_id, rejection),
    };

    let generator = match MonthlyReportGenerator::new(state.store(), &workplace_id) {
        Ok(generator) => generator,
        Err(err) => return error_response(correlation_id, err),
    };

    match query.format {
        ReportFormat::Json => {
            let result = query
                .month
                .ok_or_else(|| EngineError::MissingArgument {
                    message: "Date is missing".to_string(),
                })
                .and_then(|month| generator.aggregate(month));
            respond(correlation_id, StatusCode::OK, result)
        }
        ReportFormat::Csv => {
            let mut writer = CsvReportWriter::new(Vec::new());
            let result = generator
                .run(query.month, Some(&mut writer))
                .and_then(|_| writer.into_inner());
            match result {
                Ok(bytes) => {
                    info!(correlation_id = %correlation_id, bytes = bytes.len(), "Report exported");
                    (
                        StatusCode::OK,
                        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
                        bytes,
                    )
                        .into_response()
                }
                Err(err) => error_response(correlation_id, err),
            }
        }
    }
}

/// Turns an operation outcome into a JSON response.
fn respond<T: Serialize>(correlation_id: Uuid, status: StatusCode, result: EngineResult<T>) -> Response {
    match result {
        Ok(body) => {
            info!(correlation_id = %correlation_id, status = status.as_u16(), "Request completed");
            (status, [(header::CONTENT_TYPE, "application/json")], Json(body)).into_response()
        }
        Err(err) => error_response(correlation_id, err),
    }
}

fn error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    let api_error: ApiErrorResponse = err.into();
    (
        api_error.status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(api_error.error),
    )
        .into_response()
}

fn json_rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    (
        StatusCode::BAD_REQUEST,
        [(header::CONTENT_TYPE, "application/json")],
        Json(error),
    )
        .into_response()
}

fn query_rejection_response(correlation_id: Uuid, rejection: QueryRejection) -> Response {
    let body_text = rejection.body_text();
    warn!(
        correlation_id = %correlation_id,
        error = %body_text,
        "Query string error"
    );
    (
        StatusCode::BAD_REQUEST,
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiError::invalid_query(body_text)),
    )
        .into_response()
}

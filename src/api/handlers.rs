//! HTTP request handlers for the vacation pay API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::calculate_vacation;
use crate::config::ConfigLoader;
use crate::error::EngineResult;
use crate::models::{AuditWarning, VacationResult};

use super::request::CalculationRequest;
use super::response::{ApiError, ApiErrorResponse};

/// Warning raised when the vacation starts before every configured table set.
pub const EARLIEST_TABLES_WARNING: &str = "EARLIEST_TABLES_APPLIED";
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route(
            "/simulations",
            post(create_simulation_handler)
                .get(list_simulations_handler)
                .delete(clear_simulations_handler),
        )
        .route("/simulations/:id", get(get_simulation_handler))
        .with_state(state)
}

/// Handler for POST /calculate endpoint.
///
/// Accepts a calculation request and returns the vacation pay result.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = match parse_payload(payload, correlation_id) {
        Ok(request) => request,
        Err(error) => return error_response(error),
    };

    match timed_calculation(&request, state.config(), correlation_id) {
        Ok(result) => json_response(StatusCode::OK, &result),
        Err(error) => error_response(error),
    }
}

/// Handler for POST /simulations endpoint.
///
/// Calculates like `/calculate` and records the result in the history.
async fn create_simulation_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing simulation request");

    let request = match parse_payload(payload, correlation_id) {
        Ok(request) => request,
        Err(error) => return error_response(error),
    };

    let result = match timed_calculation(&request, state.config(), correlation_id) {
        Ok(result) => result,
        Err(error) => return error_response(error),
    };

    // The shared history only changes once the store has accepted the update
    let mut history = state.history().write().await;
    let mut next = history.clone();
    let record = next.record(request.vacation, result, Utc::now()).clone();

    if let Err(err) = state.persist(&next).await {
        warn!(correlation_id = %correlation_id, error = %err, "Failed to save simulation history");
        return error_response(err.into());
    }
    *history = next;

    info!(
        correlation_id = %correlation_id,
        simulation_id = %record.id,
        stored = history.len(),
        "Simulation recorded"
    );
    json_response(StatusCode::CREATED, &record)
}

/// Handler for GET /simulations endpoint.
///
/// Returns the recorded simulations, newest first.
async fn list_simulations_handler(State(state): State<AppState>) -> Response {
    let history = state.history().read().await;
    json_response(StatusCode::OK, history.simulations())
}

/// Handler for GET /simulations/:id endpoint.
async fn get_simulation_handler(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    let history = state.history().read().await;
    match history.get(id) {
        Some(record) => json_response(StatusCode::OK, record),
        None => error_response(ApiErrorResponse::not_found(ApiError::new(
            "SIMULATION_NOT_FOUND",
            format!("No simulation with id {}", id),
        ))),
    }
}

/// Handler for DELETE /simulations endpoint.
async fn clear_simulations_handler(State(state): State<AppState>) -> Response {
    let mut history = state.history().write().await;
    let removed = history.len();
    let mut next = history.clone();
    next.clear();

    if let Err(err) = state.persist(&next).await {
        warn!(error = %err, "Failed to save cleared simulation history");
        return error_response(err.into());
    }
    *history = next;

    info!(removed, "Simulation history cleared");
    StatusCode::NO_CONTENT.into_response()
}

/// Turns a JSON extraction failure into an API error.
fn parse_payload(
    payload: Result<Json<CalculationRequest>, JsonRejection>,
    correlation_id: Uuid,
) -> Result<CalculationRequest, ApiErrorResponse> {
    let rejection = match payload {
        Ok(Json(request)) => return Ok(request),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's message, including the field path
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
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

    Err(ApiErrorResponse::bad_request(error))
}

/// Runs the calculation and logs its outcome.
fn timed_calculation(
    request: &CalculationRequest,
    config: &ConfigLoader,
    correlation_id: Uuid,
) -> Result<VacationResult, ApiErrorResponse> {
    let start_time = Instant::now();

    match perform_calculation(request, config) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                start_date = %request.vacation.start_date,
                vacation_days = request.vacation.vacation_days,
                sold_days = request.vacation.sold_days,
                net = %result.liquido_ferias,
                duration_us = start_time.elapsed().as_micros(),
                "Calculation completed successfully"
            );
            Ok(result)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Calculation failed"
            );
            Err(err.into())
        }
    }
}

/// Selects the tables in force on the vacation start date and calculates.
///
/// A start date before every configured table set is calculated with the
/// earliest set and flagged with [`EARLIEST_TABLES_WARNING`].
fn perform_calculation(
    request: &CalculationRequest,
    config: &ConfigLoader,
) -> EngineResult<VacationResult> {
    let start_date = request.vacation.start_date;
    let (tables, fell_back) = config.tables_or_earliest(start_date)?;
    let mut result = calculate_vacation(&request.profile, &request.vacation, tables)?;

    if fell_back {
        warn!(
            start_date = %start_date,
            effective_date = %tables.effective_date,
            "No tax tables in force on start date, using earliest"
        );
        result.audit_trace.warnings.push(AuditWarning {
            code: EARLIEST_TABLES_WARNING.to_string(),
            message: format!(
                "No INSS/IRRF tables in force on {}; applied the earliest tables, effective {}",
                start_date, tables.effective_date
            ),
            severity: "medium".to_string(),
        });
    }
    Ok(result)
}

fn json_response<T: serde::Serialize + ?Sized>(status: StatusCode, body: &T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(error: ApiErrorResponse) -> Response {
    json_response(error.status, &error.error)
}

//! Medication endpoints.
//!
//! - `POST /api/medicine/add` stores one medication document as submitted.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ApiResponse};
use crate::db::create_medication;
use crate::models::{MedicationInput, MedicationRecord};

pub const SAVED_MESSAGE: &str = "Medication saved successfully";
pub const SAVE_FAILED_MESSAGE: &str = "Server error while saving medication";

/// `POST /api/medicine/add`
///
/// Body fields are copied verbatim. A body that is not JSON is a 400;
/// a JSON value that doesn't fit the medication shape, or any store
/// failure, is a 500.
pub async fn add(
    State(ctx): State<ApiContext>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<MedicationRecord>>), ApiError> {
    let Json(value) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let input: MedicationInput = serde_json::from_value(value)
        .map_err(|e| ApiError::internal(SAVE_FAILED_MESSAGE, e))?;

    let record = ctx
        .store
        .with_conn(|conn| create_medication(conn, input))
        .map_err(|e| ApiError::internal(SAVE_FAILED_MESSAGE, e))?;

    tracing::info!(id = %record.id, "Medication saved");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(SAVED_MESSAGE, record)),
    ))
}

//! # REST API for Blood Requests

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use shared::CreateBloodRequestRequest;
use tracing::info;

use crate::io::rest::error_response::error_response;
use crate::io::rest::mappers::blood_request_mapper::BloodRequestMapper;
use crate::AppState;

/// Record a blood request and email it to every configured recipient.
///
/// Delivery failures do not fail the request; they are listed in
/// `failedEmails` with whether a retry could help.
pub async fn create_blood_request(
    State(state): State<AppState>,
    payload: Result<Json<CreateBloodRequestRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    info!(
        "POST /api/blood-request - {} x{} at {}",
        request.blood_group, request.units_required, request.hospital_name
    );

    let command = BloodRequestMapper::to_create_command(request);

    match state.blood_request_service.create_blood_request(command).await {
        Ok(result) => {
            let response = BloodRequestMapper::to_create_response(result);
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

//! # REST API for SOS Alerts

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use shared::{CreateSosAlertRequest, CreateSosAlertResponse, NearbyQuery};
use tracing::info;

use crate::io::rest::error_response::{error_response, required_origin};
use crate::io::rest::mappers::alert_mapper::AlertMapper;
use crate::AppState;

/// Raise an SOS alert for hospitals and ambulances
pub async fn create_sos_alert(
    State(state): State<AppState>,
    payload: Result<Json<CreateSosAlertRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    info!("POST /api/alert - location: {:?}", request.location);

    let command = match AlertMapper::to_create_command(request) {
        Ok(command) => command,
        Err(e) => return e.into_response(),
    };

    match state.alert_service.raise_alert(command).await {
        Ok(alert) => {
            let response = CreateSosAlertResponse {
                success: true,
                alert_id: alert.id,
                message: "SOS alert broadcasted to hospitals and ambulances".to_string(),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Active alerts near the querying hospital, nearest first
pub async fn list_nearby_sos_alerts(
    State(state): State<AppState>,
    query: Result<Query<NearbyQuery>, QueryRejection>,
) -> impl IntoResponse {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    info!("GET /api/sos-alerts - query: {:?}", query);

    let origin = match required_origin(&query) {
        Ok(origin) => origin,
        Err(e) => return e.into_response(),
    };

    match state.alert_service.list_nearby_alerts(origin).await {
        Ok(matches) => (StatusCode::OK, Json(AlertMapper::to_nearby_dto_list(matches))).into_response(),
        Err(e) => e.into_response(),
    }
}

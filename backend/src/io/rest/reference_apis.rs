//! # REST API for Reference Data
//!
//! Static lookups clients use to populate forms: the emergency types, first
//! aid guidance and the location to assume when the device has none.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use shared::{EmergencyType, EmergencyTypesResponse, FallbackLocationResponse, FirstAidQuery, FirstAidResponse};
use tracing::info;

use crate::domain::first_aid;
use crate::io::rest::error_response::error_response;
use crate::io::rest::mappers::location_mapper::LocationMapper;
use crate::AppState;

pub async fn list_emergency_types() -> impl IntoResponse {
    info!("GET /api/emergency-types");

    let response = EmergencyTypesResponse {
        emergency_types: EmergencyType::ALL.to_vec(),
    };
    (StatusCode::OK, Json(response))
}

/// First aid instructions for an emergency, in `?lang=` (English by default)
pub async fn get_first_aid(
    Path(emergency): Path<String>,
    query: Result<Query<FirstAidQuery>, QueryRejection>,
) -> impl IntoResponse {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    info!("GET /api/first-aid/{} - lang: {:?}", emergency, query.lang);

    let emergency: EmergencyType = match emergency.parse() {
        Ok(emergency) => emergency,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };
    let language = query.lang.unwrap_or_default();

    match first_aid::instructions(emergency, language) {
        Some(instructions) => {
            let response = FirstAidResponse {
                emergency,
                language,
                instructions: instructions.to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        None => error_response(
            StatusCode::NOT_FOUND,
            format!("No first aid guidance for {}", emergency),
        ),
    }
}

pub async fn get_fallback_location(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/location/fallback");

    let response = FallbackLocationResponse {
        location: LocationMapper::to_dto(state.fallback_location),
    };
    (StatusCode::OK, Json(response))
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shared::{ErrorResponse, NearbyQuery};
use tracing::{error, warn};

use crate::domain::models::errors::ServiceError;
use crate::domain::models::location::Location;

/// Build a `{ "error": message }` response with the given status
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse { error: message.into() })).into_response()
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        match self {
            ServiceError::Validation(message) => {
                warn!("Rejected request: {}", message);
                error_response(StatusCode::BAD_REQUEST, message)
            }
            e @ ServiceError::NotFound(_) => error_response(StatusCode::NOT_FOUND, e.to_string()),
            e @ ServiceError::AlreadyAssigned(_) => error_response(StatusCode::CONFLICT, e.to_string()),
            ServiceError::Storage(e) => {
                // Details stay in the log; clients get a generic message
                error!("Storage failure: {:#}", e);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

/// The querying party's position from `?lat=..&lng=..`
pub fn required_origin(query: &NearbyQuery) -> Result<Location, ServiceError> {
    match (query.lat, query.lng) {
        (Some(lat), Some(lng)) => Ok(Location::new(lat, lng)),
        _ => Err(ServiceError::validation("Latitude and longitude are required")),
    }
}

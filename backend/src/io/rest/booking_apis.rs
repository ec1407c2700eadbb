//! # REST API for Ambulance Bookings
//!
//! Patients book an ambulance; drivers list nearby unassigned bookings and
//! accept one.

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use shared::{AcceptBookingRequest, AcceptBookingResponse, CreateBookingRequest, CreateBookingResponse, NearbyQuery};
use tracing::info;

use crate::io::rest::error_response::{error_response, required_origin};
use crate::io::rest::mappers::booking_mapper::BookingMapper;
use crate::AppState;

/// Book an ambulance
pub async fn create_booking(
    State(state): State<AppState>,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    info!("POST /api/book-ambulance - emergency: {}", request.emergency);

    let command = match BookingMapper::to_create_command(request) {
        Ok(command) => command,
        Err(e) => return e.into_response(),
    };

    match state.booking_service.create_booking(command).await {
        Ok(booking) => {
            let response = CreateBookingResponse {
                success: true,
                booking_id: booking.id,
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Unassigned bookings near the querying driver, nearest first
pub async fn list_nearby_bookings(
    State(state): State<AppState>,
    query: Result<Query<NearbyQuery>, QueryRejection>,
) -> impl IntoResponse {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    info!("GET /api/emergencies - query: {:?}", query);

    let origin = match required_origin(&query) {
        Ok(origin) => origin,
        Err(e) => return e.into_response(),
    };

    match state.booking_service.list_nearby_bookings(origin).await {
        Ok(matches) => (StatusCode::OK, Json(BookingMapper::to_nearby_dto_list(matches))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Claim a booking. Only the first driver wins; later attempts get 409.
pub async fn accept_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
    payload: Result<Json<AcceptBookingRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    info!(
        "POST /api/accept-booking/{} - driver: {}, ambulance: {}",
        booking_id, request.driver_name, request.ambulance_id
    );

    let command = BookingMapper::to_accept_command(booking_id, request);

    match state.booking_service.accept_booking(command).await {
        Ok(()) => {
            let response = AcceptBookingResponse {
                success: true,
                message: "Booking accepted successfully".to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

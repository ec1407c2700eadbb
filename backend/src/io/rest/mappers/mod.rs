//! Conversions between the wire DTOs in `shared` and domain types

pub mod alert_mapper;
pub mod blood_request_mapper;
pub mod booking_mapper;
pub mod location_mapper;

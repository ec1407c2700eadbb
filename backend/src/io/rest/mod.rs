//! # REST API Interface Layer
//!
//! One `*_apis` module per resource. Handlers log the request, build a domain
//! command, call the service and map the result back to a DTO. Business rules
//! live in the domain layer.

pub mod alert_apis;
pub mod blood_request_apis;
pub mod booking_apis;
pub mod error_response;
pub mod mappers;
pub mod reference_apis;

pub use alert_apis::{create_sos_alert, list_nearby_sos_alerts};
pub use blood_request_apis::create_blood_request;
pub use booking_apis::{accept_booking, create_booking, list_nearby_bookings};
pub use reference_apis::{get_fallback_location, get_first_aid, list_emergency_types};

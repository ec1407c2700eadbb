//! # Domain Layer
//!
//! Business rules for the emergency-response backend:
//! - ambulance bookings and the one-driver-per-booking assignment gate
//! - SOS alerts and their visibility window
//! - blood requests and the email dispatch batch they trigger
//! - proximity matching shared by drivers and hospitals
//!
//! Services own `Arc<dyn ...Storage>` handles and never see HTTP types; the
//! REST layer in `io` maps DTOs from the `shared` crate onto the commands here.

pub mod alert_lifecycle;
pub mod alert_service;
pub mod blood_request_service;
pub mod booking_service;
pub mod commands;
pub mod email_service;
pub mod first_aid;
pub mod geo;
pub mod models;
pub mod proximity;

pub use alert_lifecycle::AlertWindow;
pub use alert_service::AlertService;
pub use blood_request_service::BloodRequestService;
pub use booking_service::BookingService;
pub use geo::distance_km;
pub use models::errors::ServiceError;
pub use proximity::{nearby, Nearby};

//! # IO Module
//!
//! Adapter layer between HTTP clients and the domain services. Handlers
//! deserialize the `shared` DTOs, map them onto domain commands, and translate
//! `ServiceError` into status codes with a JSON `{ "error": ... }` body.
//!
//! ## Supported Operations
//!
//! - **POST /api/book-ambulance**: Book an ambulance
//! - **GET /api/emergencies**: Unassigned bookings near a driver
//! - **POST /api/accept-booking/:id**: Claim a booking for a driver
//! - **POST /api/alert**: Raise an SOS alert
//! - **GET /api/sos-alerts**: Active alerts near a hospital
//! - **POST /api/blood-request**: Record and email a blood request
//! - **GET /api/emergency-types**, **/api/first-aid/:emergency**,
//!   **/api/location/fallback**: Reference data for clients

pub mod rest;

pub use rest::*;

//! # Storage Module
//!
//! Persistence for bookings, SOS alerts and blood requests.
//!
//! The domain layer depends only on the traits in [`traits`]; the SQLite
//! repositories in [`repositories`] implement them on top of a shared
//! [`DbConnection`] pool. Every statement runs under the connection's
//! operation timeout, and a timeout surfaces as an ordinary storage error.
//!
//! The only write that needs concurrency control is claiming a booking, which
//! is a single conditional `UPDATE` so that independent server processes
//! sharing the database still agree on one winner.

pub mod connection;
pub mod repositories;
pub mod traits;

pub use connection::DbConnection;
pub use repositories::{AlertRepository, BloodRequestRepository, BookingRepository};
pub use traits::{AlertStorage, BloodRequestStorage, BookingStorage};

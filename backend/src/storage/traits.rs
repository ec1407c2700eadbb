//! # Storage Traits
//!
//! Storage abstraction the domain services depend on. Each collection gets
//! its own trait so services only see the operations they need.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::models::alert::SosAlert;
use crate::domain::models::blood_request::BloodRequest;
use crate::domain::models::booking::{AmbulanceBooking, DriverAssignment};

#[async_trait]
pub trait BookingStorage: Send + Sync {
    /// Store a new, unassigned booking
    async fn store_booking(&self, booking: &AmbulanceBooking) -> Result<()>;

    async fn get_booking(&self, booking_id: &str) -> Result<Option<AmbulanceBooking>>;

    /// All bookings no driver has claimed yet, oldest first
    async fn list_unassigned_bookings(&self) -> Result<Vec<AmbulanceBooking>>;

    /// Atomically claim the booking for a driver.
    ///
    /// The write only applies while the booking is still unassigned. Returns
    /// `false` when nothing matched, i.e. the booking does not exist or was
    /// already claimed.
    async fn assign_if_unassigned(&self, booking_id: &str, assignment: &DriverAssignment) -> Result<bool>;
}

#[async_trait]
pub trait AlertStorage: Send + Sync {
    async fn store_alert(&self, alert: &SosAlert) -> Result<()>;

    async fn get_alert(&self, alert_id: &str) -> Result<Option<SosAlert>>;

    /// Active alerts created at or after `since`, oldest first
    async fn list_active_alerts_since(&self, since: DateTime<Utc>) -> Result<Vec<SosAlert>>;
}

#[async_trait]
pub trait BloodRequestStorage: Send + Sync {
    async fn store_blood_request(&self, request: &BloodRequest) -> Result<()>;

    async fn get_blood_request(&self, request_id: &str) -> Result<Option<BloodRequest>>;

    /// Record how many emails went out. Returns `false` if the request is unknown.
    async fn record_emails_sent(&self, request_id: &str, emails_sent: u32) -> Result<bool>;
}

use chrono::{DateTime, Utc};
use shared::EmergencyType;

use super::location::{Located, Location};

/// An ambulance request raised by a patient.
///
/// `assignment` is the single source of truth for whether a driver has taken
/// the booking, so "assigned without a driver" cannot be represented.
#[derive(Debug, Clone, PartialEq)]
pub struct AmbulanceBooking {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub emergency: EmergencyType,
    pub location: Option<Location>,
    pub destination: String,
    pub details: String,
    pub created_at: DateTime<Utc>,
    pub assignment: Option<DriverAssignment>,
}

impl AmbulanceBooking {
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    pub fn is_assigned(&self) -> bool {
        self.assignment.is_some()
    }
}

impl Located for AmbulanceBooking {
    fn location(&self) -> Option<Location> {
        self.location
    }
}

/// The driver who claimed a booking. Written once by the assignment gate.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverAssignment {
    pub driver_name: String,
    pub ambulance_id: String,
    pub location: Location,
    pub accepted_at: DateTime<Utc>,
}

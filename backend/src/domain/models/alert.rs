use chrono::{DateTime, Utc};
use shared::AlertStatus;

use super::location::{Located, Location};

pub const SOS_ALERT_TYPE: &str = "SOS";

/// A one-tap distress signal. Alerts are never mutated after creation; their
/// relevance is decided at query time by the alert window.
#[derive(Debug, Clone, PartialEq)]
pub struct SosAlert {
    pub id: String,
    pub location: Option<Location>,
    pub created_at: DateTime<Utc>,
    pub status: AlertStatus,
    pub broadcast_to_hospitals: bool,
    pub broadcast_to_ambulances: bool,
}

impl SosAlert {
    /// A fresh active alert broadcast to both hospitals and ambulances
    pub fn new(location: Option<Location>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            location,
            created_at,
            status: AlertStatus::Active,
            broadcast_to_hospitals: true,
            broadcast_to_ambulances: true,
        }
    }
}

impl Located for SosAlert {
    fn location(&self) -> Option<Location> {
        self.location
    }
}

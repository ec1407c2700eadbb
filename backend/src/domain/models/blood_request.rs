use chrono::{DateTime, Utc};
use shared::{BloodGroup, BloodRequestStatus, Urgency};

use super::location::Location;

#[derive(Debug, Clone, PartialEq)]
pub struct BloodRequest {
    pub id: String,
    pub blood_group: BloodGroup,
    pub units_required: u32,
    pub urgency: Urgency,
    pub hospital_name: String,
    pub hospital_address: String,
    pub contact_number: String,
    pub additional_notes: String,
    pub location: Option<Location>,
    pub created_at: DateTime<Utc>,
    pub status: BloodRequestStatus,
    /// Recipients the request email was delivered to
    pub emails_sent: u32,
}

impl BloodRequest {
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

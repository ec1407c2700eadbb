use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A point on the earth's surface in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

/// Emergency category selected by the patient when booking an ambulance.
///
/// The wire names are the labels shown to patients, so existing clients that
/// post `"Heart Attack"` keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmergencyType {
    #[serde(rename = "Heart Attack")]
    HeartAttack,
    #[serde(rename = "Stroke")]
    Stroke,
    #[serde(rename = "Accident")]
    Accident,
    #[serde(rename = "Breathing Problems")]
    BreathingProblems,
    #[serde(rename = "Severe Bleeding")]
    SevereBleeding,
    #[serde(rename = "Unconscious")]
    Unconscious,
    #[serde(rename = "Poisoning")]
    Poisoning,
    #[serde(rename = "Burns")]
    Burns,
    #[serde(rename = "Other")]
    Other,
}

impl EmergencyType {
    pub const ALL: [EmergencyType; 9] = [
        EmergencyType::HeartAttack,
        EmergencyType::Stroke,
        EmergencyType::Accident,
        EmergencyType::BreathingProblems,
        EmergencyType::SevereBleeding,
        EmergencyType::Unconscious,
        EmergencyType::Poisoning,
        EmergencyType::Burns,
        EmergencyType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmergencyType::HeartAttack => "Heart Attack",
            EmergencyType::Stroke => "Stroke",
            EmergencyType::Accident => "Accident",
            EmergencyType::BreathingProblems => "Breathing Problems",
            EmergencyType::SevereBleeding => "Severe Bleeding",
            EmergencyType::Unconscious => "Unconscious",
            EmergencyType::Poisoning => "Poisoning",
            EmergencyType::Burns => "Burns",
            EmergencyType::Other => "Other",
        }
    }
}

/// ABO/Rh blood group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            BloodGroup::APositive => "A+",
            BloodGroup::ANegative => "A-",
            BloodGroup::BPositive => "B+",
            BloodGroup::BNegative => "B-",
            BloodGroup::AbPositive => "AB+",
            BloodGroup::AbNegative => "AB-",
            BloodGroup::OPositive => "O+",
            BloodGroup::ONegative => "O-",
        }
    }
}

/// How quickly a hospital needs the requested blood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Normal,
    Urgent,
    Critical,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Normal => "normal",
            Urgency::Urgent => "urgent",
            Urgency::Critical => "critical",
        }
    }
}

/// Status of an SOS alert. Only `Active` is ever written today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Active,
    Resolved,
    Expired,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Active => "active",
            AlertStatus::Resolved => "resolved",
            AlertStatus::Expired => "expired",
        }
    }
}

/// Status of a blood request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BloodRequestStatus {
    Active,
}

impl BloodRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BloodRequestStatus::Active => "active",
        }
    }
}

/// Languages first-aid guidance is published in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English
    #[default]
    En,
    /// Kannada
    Kn,
    /// Tulu
    Tcy,
    /// Konkani
    Kok,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Kn => "kn",
            Language::Tcy => "tcy",
            Language::Kok => "kok",
        }
    }
}

/// Error returned when a stored or submitted label does not name a known variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown {}: {}", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

macro_rules! label_enum {
    ($ty:ident, $kind:literal, [$($variant:ident),+ $(,)?]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                [$($ty::$variant),+]
                    .into_iter()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| UnknownVariant { kind: $kind, value: s.to_string() })
            }
        }
    };
}

label_enum!(EmergencyType, "emergency type", [
    HeartAttack, Stroke, Accident, BreathingProblems, SevereBleeding,
    Unconscious, Poisoning, Burns, Other,
]);
label_enum!(BloodGroup, "blood group", [
    APositive, ANegative, BPositive, BNegative, AbPositive, AbNegative, OPositive, ONegative,
]);
label_enum!(Urgency, "urgency", [Normal, Urgent, Critical]);
label_enum!(AlertStatus, "alert status", [Active, Resolved, Expired]);
label_enum!(BloodRequestStatus, "blood request status", [Active]);
label_enum!(Language, "language", [En, Kn, Tcy, Kok]);

// ---------------------------------------------------------------------------
// Ambulance bookings
// ---------------------------------------------------------------------------

/// Request for booking an ambulance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub name: String,
    pub phone: String,
    pub emergency: EmergencyType,
    /// Required. Optional here so a missing location is reported as a
    /// validation message rather than an extractor rejection.
    pub location: Option<Location>,
    pub destination: Option<String>,
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingResponse {
    pub success: bool,
    pub booking_id: String,
}

/// Driver that accepted a booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverAssignment {
    pub name: String,
    pub ambulance_id: String,
    pub location: Location,
    /// RFC 3339 timestamp
    pub accepted_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmbulanceBooking {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub emergency: EmergencyType,
    pub location: Option<Location>,
    pub destination: String,
    pub details: String,
    /// RFC 3339 timestamp
    pub timestamp: String,
    pub assigned: bool,
    pub driver: Option<DriverAssignment>,
}

/// A booking annotated with its distance (km) from the querying driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyBooking {
    #[serde(flatten)]
    pub booking: AmbulanceBooking,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptBookingRequest {
    pub driver_name: String,
    pub ambulance_id: String,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptBookingResponse {
    pub success: bool,
    pub message: String,
}

/// Query string for the proximity listings. Both fields are required; they
/// are optional here so a missing one becomes a validation message rather
/// than an extractor rejection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NearbyQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

// ---------------------------------------------------------------------------
// SOS alerts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateSosAlertRequest {
    /// Required, see [`CreateBookingRequest::location`]
    pub location: Option<Location>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSosAlertResponse {
    pub success: bool,
    pub alert_id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SosAlert {
    pub id: String,
    pub location: Option<Location>,
    /// RFC 3339 timestamp
    pub timestamp: String,
    #[serde(rename = "type")]
    pub alert_type: String,
    pub status: AlertStatus,
    pub broadcast_to_hospitals: bool,
    pub broadcast_to_ambulances: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbySosAlert {
    #[serde(flatten)]
    pub alert: SosAlert,
    pub distance: f64,
}

// ---------------------------------------------------------------------------
// Blood requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBloodRequestRequest {
    pub blood_group: BloodGroup,
    /// Browser forms post this as text, so `"3"` and `3` are both accepted
    #[serde(deserialize_with = "count_from_number_or_text")]
    pub units_required: u32,
    pub urgency: Urgency,
    pub hospital_name: String,
    pub hospital_address: String,
    pub contact_number: String,
    pub additional_notes: Option<String>,
    pub location: Option<Location>,
}

fn count_from_number_or_text<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    struct CountVisitor;

    impl<'de> Visitor<'de> for CountVisitor {
        type Value = u32;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a whole number, as a number or a numeric string")
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<u32, E> {
            u32::try_from(value).map_err(|_| E::custom(format!("{} is too large", value)))
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<u32, E> {
            u32::try_from(value).map_err(|_| E::custom(format!("{} is not a positive count", value)))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<u32, E> {
            value
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("{:?} is not a whole number", value)))
        }
    }

    deserializer.deserialize_any(CountVisitor)
}

/// One recipient the blood request could not be delivered to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedEmail {
    pub email: String,
    pub error: String,
    pub retryable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBloodRequestResponse {
    pub success: bool,
    pub request_id: String,
    pub emails_sent: u32,
    pub failed_emails: Vec<FailedEmail>,
}

// ---------------------------------------------------------------------------
// Reference data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyTypesResponse {
    pub emergency_types: Vec<EmergencyType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FirstAidQuery {
    pub lang: Option<Language>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirstAidResponse {
    pub emergency: EmergencyType,
    pub language: Language,
    pub instructions: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackLocationResponse {
    pub location: Location,
}

/// Body of every non-2xx response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

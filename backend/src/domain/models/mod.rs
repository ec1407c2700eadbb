//! Domain entities. These mirror the wire DTOs in the `shared` crate but carry
//! typed timestamps and enforce the booking assignment invariant structurally.

pub mod alert;
pub mod blood_request;
pub mod booking;
pub mod errors;
pub mod location;

use chrono::{DateTime, SecondsFormat, Utc};

/// Canonical timestamp text: RFC 3339, UTC, millisecond precision.
///
/// Every stored timestamp uses this exact shape, so stored values order
/// lexicographically in the same order as in time.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_timestamp(value: &str) -> anyhow::Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(value)
        .map_err(|e| anyhow::anyhow!("Invalid timestamp {:?}: {}", value, e))?;
    Ok(parsed.with_timezone(&Utc))
}

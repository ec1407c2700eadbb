use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::booking::{AmbulanceBooking, DriverAssignment};
use crate::domain::models::location::Location;
use crate::domain::models::{format_timestamp, parse_timestamp};
use crate::storage::connection::{location_from_columns, DbConnection};
use crate::storage::traits::BookingStorage;

const BOOKING_COLUMNS: &str = r#"
    id, name, phone, emergency, lat, lng, destination, details, created_at,
    assigned, driver_name, driver_ambulance_id, driver_lat, driver_lng, driver_accepted_at
"#;

/// Repository for ambulance booking operations
#[derive(Clone)]
pub struct BookingRepository {
    db: DbConnection,
}

impl BookingRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn booking_from_row(row: &SqliteRow) -> Result<AmbulanceBooking> {
        let emergency: String = row.try_get("emergency")?;
        let created_at: String = row.try_get("created_at")?;
        let assigned: bool = row.try_get("assigned")?;

        let assignment = if assigned {
            let accepted_at: String = row.try_get("driver_accepted_at")?;
            Some(DriverAssignment {
                driver_name: row.try_get("driver_name")?,
                ambulance_id: row.try_get("driver_ambulance_id")?,
                location: Location::new(row.try_get("driver_lat")?, row.try_get("driver_lng")?),
                accepted_at: parse_timestamp(&accepted_at)?,
            })
        } else {
            None
        };

        Ok(AmbulanceBooking {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            phone: row.try_get("phone")?,
            emergency: emergency.parse()?,
            location: location_from_columns(row.try_get("lat")?, row.try_get("lng")?),
            destination: row.try_get("destination")?,
            details: row.try_get("details")?,
            created_at: parse_timestamp(&created_at)?,
            assignment,
        })
    }
}

#[async_trait]
impl BookingStorage for BookingRepository {
    async fn store_booking(&self, booking: &AmbulanceBooking) -> Result<()> {
        let query = sqlx::query(
            r#"
            INSERT INTO ambulance_bookings (id, name, phone, emergency, lat, lng, destination, details, created_at, assigned)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0)
            "#,
        )
        .bind(&booking.id)
        .bind(&booking.name)
        .bind(&booking.phone)
        .bind(booking.emergency.as_str())
        .bind(booking.location.map(|l| l.lat))
        .bind(booking.location.map(|l| l.lng))
        .bind(&booking.destination)
        .bind(&booking.details)
        .bind(format_timestamp(&booking.created_at));

        self.db.bounded("store booking", query.execute(self.db.pool())).await?;
        Ok(())
    }

    async fn get_booking(&self, booking_id: &str) -> Result<Option<AmbulanceBooking>> {
        let sql = format!("SELECT {} FROM ambulance_bookings WHERE id = ?", BOOKING_COLUMNS);
        let query = sqlx::query(&sql).bind(booking_id);

        let row = self.db.bounded("get booking", query.fetch_optional(self.db.pool())).await?;

        row.as_ref()
            .map(Self::booking_from_row)
            .transpose()
            .with_context(|| format!("Corrupt booking record {}", booking_id))
    }

    async fn list_unassigned_bookings(&self) -> Result<Vec<AmbulanceBooking>> {
        let sql = format!(
            "SELECT {} FROM ambulance_bookings WHERE assigned = 0 ORDER BY created_at ASC, ROWID ASC",
            BOOKING_COLUMNS
        );
        let query = sqlx::query(&sql);

        let rows = self.db.bounded("list unassigned bookings", query.fetch_all(self.db.pool())).await?;

        rows.iter().map(Self::booking_from_row).collect()
    }

    async fn assign_if_unassigned(&self, booking_id: &str, assignment: &DriverAssignment) -> Result<bool> {
        // The `assigned = 0` predicate is the guard; no read happens before this write
        let query = sqlx::query(
            r#"
            UPDATE ambulance_bookings
            SET assigned = 1,
                driver_name = ?,
                driver_ambulance_id = ?,
                driver_lat = ?,
                driver_lng = ?,
                driver_accepted_at = ?
            WHERE id = ? AND assigned = 0
            "#,
        )
        .bind(&assignment.driver_name)
        .bind(&assignment.ambulance_id)
        .bind(assignment.location.lat)
        .bind(assignment.location.lng)
        .bind(format_timestamp(&assignment.accepted_at))
        .bind(booking_id);

        let result = self.db.bounded("assign booking", query.execute(self.db.pool())).await?;
        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use shared::EmergencyType;

    async fn setup_test() -> BookingRepository {
        let db = DbConnection::in_memory().await.expect("Failed to create test database");
        BookingRepository::new(db)
    }

    fn sample_booking(location: Option<Location>) -> AmbulanceBooking {
        AmbulanceBooking {
            id: AmbulanceBooking::generate_id(),
            name: "Ravi Kumar".to_string(),
            phone: "9876543210".to_string(),
            emergency: EmergencyType::BreathingProblems,
            location,
            destination: "Wenlock Hospital".to_string(),
            details: String::new(),
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap(),
            assignment: None,
        }
    }

    fn sample_assignment(name: &str) -> DriverAssignment {
        DriverAssignment {
            driver_name: name.to_string(),
            ambulance_id: "KA-19-AMB-01".to_string(),
            location: Location::new(12.87, 74.84),
            accepted_at: Utc.with_ymd_and_hms(2024, 6, 1, 8, 35, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_store_and_get_booking() {
        let repo = setup_test().await;
        let booking = sample_booking(Some(Location::new(12.88, 74.85)));

        repo.store_booking(&booking).await.expect("Failed to store booking");
        let loaded = repo.get_booking(&booking.id).await.unwrap().expect("Booking missing");

        assert_eq!(loaded, booking);
    }

    #[tokio::test]
    async fn test_booking_without_location_round_trips() {
        let repo = setup_test().await;
        let booking = sample_booking(None);

        repo.store_booking(&booking).await.unwrap();
        let loaded = repo.get_booking(&booking.id).await.unwrap().unwrap();

        assert!(loaded.location.is_none());
    }

    #[tokio::test]
    async fn test_get_missing_booking() {
        let repo = setup_test().await;
        assert!(repo.get_booking("does-not-exist").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_assign_only_once() {
        let repo = setup_test().await;
        let booking = sample_booking(Some(Location::new(12.88, 74.85)));
        repo.store_booking(&booking).await.unwrap();

        assert!(repo.assign_if_unassigned(&booking.id, &sample_assignment("First")).await.unwrap());
        assert!(!repo.assign_if_unassigned(&booking.id, &sample_assignment("Second")).await.unwrap());

        let loaded = repo.get_booking(&booking.id).await.unwrap().unwrap();
        assert_eq!(loaded.assignment, Some(sample_assignment("First")));
    }

    #[tokio::test]
    async fn test_assign_unknown_booking_matches_nothing() {
        let repo = setup_test().await;
        assert!(!repo.assign_if_unassigned("missing", &sample_assignment("First")).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_unassigned_skips_assigned() {
        let repo = setup_test().await;
        let open = sample_booking(Some(Location::new(12.88, 74.85)));
        let taken = sample_booking(Some(Location::new(12.89, 74.86)));
        repo.store_booking(&open).await.unwrap();
        repo.store_booking(&taken).await.unwrap();
        repo.assign_if_unassigned(&taken.id, &sample_assignment("Driver")).await.unwrap();

        let unassigned = repo.list_unassigned_bookings().await.unwrap();

        assert_eq!(unassigned.len(), 1);
        assert_eq!(unassigned[0].id, open.id);
    }
}

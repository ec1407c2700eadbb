use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::blood_request::BloodRequest;
use crate::domain::models::{format_timestamp, parse_timestamp};
use crate::storage::connection::{location_from_columns, DbConnection};
use crate::storage::traits::BloodRequestStorage;

/// Repository for blood request operations
#[derive(Clone)]
pub struct BloodRequestRepository {
    db: DbConnection,
}

impl BloodRequestRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn request_from_row(row: &SqliteRow) -> Result<BloodRequest> {
        let blood_group: String = row.try_get("blood_group")?;
        let urgency: String = row.try_get("urgency")?;
        let status: String = row.try_get("status")?;
        let created_at: String = row.try_get("created_at")?;

        Ok(BloodRequest {
            id: row.try_get("id")?,
            blood_group: blood_group.parse()?,
            units_required: row.try_get("units_required")?,
            urgency: urgency.parse()?,
            hospital_name: row.try_get("hospital_name")?,
            hospital_address: row.try_get("hospital_address")?,
            contact_number: row.try_get("contact_number")?,
            additional_notes: row.try_get("additional_notes")?,
            location: location_from_columns(row.try_get("lat")?, row.try_get("lng")?),
            created_at: parse_timestamp(&created_at)?,
            status: status.parse()?,
            emails_sent: row.try_get("emails_sent")?,
        })
    }
}

#[async_trait]
impl BloodRequestStorage for BloodRequestRepository {
    async fn store_blood_request(&self, request: &BloodRequest) -> Result<()> {
        let query = sqlx::query(
            r#"
            INSERT INTO blood_requests (
                id, blood_group, units_required, urgency, hospital_name, hospital_address,
                contact_number, additional_notes, lat, lng, created_at, status, emails_sent
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&request.id)
        .bind(request.blood_group.as_str())
        .bind(request.units_required)
        .bind(request.urgency.as_str())
        .bind(&request.hospital_name)
        .bind(&request.hospital_address)
        .bind(&request.contact_number)
        .bind(&request.additional_notes)
        .bind(request.location.map(|l| l.lat))
        .bind(request.location.map(|l| l.lng))
        .bind(format_timestamp(&request.created_at))
        .bind(request.status.as_str())
        .bind(request.emails_sent);

        self.db.bounded("store blood request", query.execute(self.db.pool())).await?;
        Ok(())
    }

    async fn get_blood_request(&self, request_id: &str) -> Result<Option<BloodRequest>> {
        let query = sqlx::query(
            r#"
            SELECT id, blood_group, units_required, urgency, hospital_name, hospital_address,
                   contact_number, additional_notes, lat, lng, created_at, status, emails_sent
            FROM blood_requests
            WHERE id = ?
            "#,
        )
        .bind(request_id);

        let row = self.db.bounded("get blood request", query.fetch_optional(self.db.pool())).await?;

        row.as_ref()
            .map(Self::request_from_row)
            .transpose()
            .with_context(|| format!("Corrupt blood request record {}", request_id))
    }

    async fn record_emails_sent(&self, request_id: &str, emails_sent: u32) -> Result<bool> {
        let query = sqlx::query("UPDATE blood_requests SET emails_sent = ? WHERE id = ?")
            .bind(emails_sent)
            .bind(request_id);

        let result = self.db.bounded("record emails sent", query.execute(self.db.pool())).await?;
        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use shared::{BloodGroup, BloodRequestStatus, Urgency};

    async fn setup_test() -> BloodRequestRepository {
        let db = DbConnection::in_memory().await.expect("Failed to create test database");
        BloodRequestRepository::new(db)
    }

    fn sample_request() -> BloodRequest {
        BloodRequest {
            id: BloodRequest::generate_id(),
            blood_group: BloodGroup::AbNegative,
            units_required: 4,
            urgency: Urgency::Urgent,
            hospital_name: "KMC Hospital".to_string(),
            hospital_address: "Ambedkar Circle, Mangalore".to_string(),
            contact_number: "0824-2445858".to_string(),
            additional_notes: "Cross-matched units preferred".to_string(),
            location: None,
            created_at: Utc.with_ymd_and_hms(2024, 6, 2, 7, 0, 0).unwrap(),
            status: BloodRequestStatus::Active,
            emails_sent: 0,
        }
    }

    #[tokio::test]
    async fn test_store_and_get_blood_request() {
        let repo = setup_test().await;
        let request = sample_request();

        repo.store_blood_request(&request).await.expect("Failed to store request");
        let loaded = repo.get_blood_request(&request.id).await.unwrap().expect("Request missing");

        assert_eq!(loaded, request);
    }

    #[tokio::test]
    async fn test_record_emails_sent() {
        let repo = setup_test().await;
        let request = sample_request();
        repo.store_blood_request(&request).await.unwrap();

        assert!(repo.record_emails_sent(&request.id, 3).await.unwrap());
        assert!(!repo.record_emails_sent("missing", 3).await.unwrap());

        let loaded = repo.get_blood_request(&request.id).await.unwrap().unwrap();
        assert_eq!(loaded.emails_sent, 3);
    }
}

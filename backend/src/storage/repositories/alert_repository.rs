use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::AlertStatus;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::alert::{SosAlert, SOS_ALERT_TYPE};
use crate::domain::models::{format_timestamp, parse_timestamp};
use crate::storage::connection::{location_from_columns, DbConnection};
use crate::storage::traits::AlertStorage;

/// Repository for SOS alert operations
#[derive(Clone)]
pub struct AlertRepository {
    db: DbConnection,
}

impl AlertRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn alert_from_row(row: &SqliteRow) -> Result<SosAlert> {
        let status: String = row.try_get("status")?;
        let created_at: String = row.try_get("created_at")?;

        Ok(SosAlert {
            id: row.try_get("id")?,
            location: location_from_columns(row.try_get("lat")?, row.try_get("lng")?),
            created_at: parse_timestamp(&created_at)?,
            status: status.parse()?,
            broadcast_to_hospitals: row.try_get("broadcast_to_hospitals")?,
            broadcast_to_ambulances: row.try_get("broadcast_to_ambulances")?,
        })
    }
}

#[async_trait]
impl AlertStorage for AlertRepository {
    async fn store_alert(&self, alert: &SosAlert) -> Result<()> {
        let query = sqlx::query(
            r#"
            INSERT INTO sos_alerts (id, lat, lng, created_at, alert_type, status, broadcast_to_hospitals, broadcast_to_ambulances)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&alert.id)
        .bind(alert.location.map(|l| l.lat))
        .bind(alert.location.map(|l| l.lng))
        .bind(format_timestamp(&alert.created_at))
        .bind(SOS_ALERT_TYPE)
        .bind(alert.status.as_str())
        .bind(alert.broadcast_to_hospitals)
        .bind(alert.broadcast_to_ambulances);

        self.db.bounded("store alert", query.execute(self.db.pool())).await?;
        Ok(())
    }

    async fn get_alert(&self, alert_id: &str) -> Result<Option<SosAlert>> {
        let query = sqlx::query(
            r#"
            SELECT id, lat, lng, created_at, status, broadcast_to_hospitals, broadcast_to_ambulances
            FROM sos_alerts
            WHERE id = ?
            "#,
        )
        .bind(alert_id);

        let row = self.db.bounded("get alert", query.fetch_optional(self.db.pool())).await?;

        row.as_ref()
            .map(Self::alert_from_row)
            .transpose()
            .with_context(|| format!("Corrupt alert record {}", alert_id))
    }

    async fn list_active_alerts_since(&self, since: DateTime<Utc>) -> Result<Vec<SosAlert>> {
        // created_at is canonical RFC 3339 text, so string order is time order
        let query = sqlx::query(
            r#"
            SELECT id, lat, lng, created_at, status, broadcast_to_hospitals, broadcast_to_ambulances
            FROM sos_alerts
            WHERE status = ? AND created_at >= ?
            ORDER BY created_at ASC, ROWID ASC
            "#,
        )
        .bind(AlertStatus::Active.as_str())
        .bind(format_timestamp(&since));

        let rows = self.db.bounded("list active alerts", query.fetch_all(self.db.pool())).await?;

        rows.iter().map(Self::alert_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::location::Location;
    use chrono::{Duration, TimeZone};

    async fn setup_test() -> AlertRepository {
        let db = DbConnection::in_memory().await.expect("Failed to create test database");
        AlertRepository::new(db)
    }

    #[tokio::test]
    async fn test_store_and_get_alert() {
        let repo = setup_test().await;
        let alert = SosAlert::new(
            Some(Location::new(12.87, 74.84)),
            Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
        );

        repo.store_alert(&alert).await.expect("Failed to store alert");
        let loaded = repo.get_alert(&alert.id).await.unwrap().expect("Alert missing");

        assert_eq!(loaded, alert);
        assert_eq!(loaded.status, AlertStatus::Active);
        assert!(loaded.broadcast_to_hospitals && loaded.broadcast_to_ambulances);
    }

    #[tokio::test]
    async fn test_list_active_alerts_since_applies_cutoff() {
        let repo = setup_test().await;
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let old = SosAlert::new(Some(Location::new(12.87, 74.84)), now - Duration::hours(3));
        let recent = SosAlert::new(Some(Location::new(12.87, 74.84)), now - Duration::minutes(30));
        let mut resolved = SosAlert::new(Some(Location::new(12.87, 74.84)), now - Duration::minutes(10));
        resolved.status = AlertStatus::Resolved;

        for alert in [&old, &recent, &resolved] {
            repo.store_alert(alert).await.unwrap();
        }

        let alerts = repo.list_active_alerts_since(now - Duration::hours(2)).await.unwrap();

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].id, recent.id);
    }
}

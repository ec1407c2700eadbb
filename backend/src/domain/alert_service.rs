use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::alert_lifecycle::AlertWindow;
use super::commands::alerts::CreateSosAlertCommand;
use super::models::alert::SosAlert;
use super::models::errors::ServiceError;
use super::models::location::Location;
use super::proximity::{nearby, Nearby};
use crate::storage::traits::AlertStorage;

#[derive(Clone)]
pub struct AlertService {
    storage: Arc<dyn AlertStorage>,
    radius_km: f64,
    window: AlertWindow,
}

impl AlertService {
    pub fn new(storage: Arc<dyn AlertStorage>, radius_km: f64, window: AlertWindow) -> Self {
        Self {
            storage,
            radius_km,
            window,
        }
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Raise an SOS alert. Hospitals and ambulances pick it up by polling.
    pub async fn raise_alert(&self, command: CreateSosAlertCommand) -> Result<SosAlert, ServiceError> {
        command.location.validate()?;

        let alert = SosAlert::new(Some(command.location), Utc::now());
        self.storage.store_alert(&alert).await?;

        info!("🚨 SOS alert {} raised", alert.id);
        Ok(alert)
    }

    /// Active alerts raised within the window, inside the alert radius of
    /// `origin`, nearest first
    pub async fn list_nearby_alerts(&self, origin: Location) -> Result<Vec<Nearby<SosAlert>>, ServiceError> {
        self.list_nearby_alerts_at(origin, Utc::now()).await
    }

    pub async fn list_nearby_alerts_at(
        &self,
        origin: Location,
        now: DateTime<Utc>,
    ) -> Result<Vec<Nearby<SosAlert>>, ServiceError> {
        origin.validate()?;

        let candidates = self.storage.list_active_alerts_since(self.window.cutoff(now)).await?;
        let visible = candidates
            .into_iter()
            .filter(|alert| self.window.is_visible(alert, now));
        let matches = nearby(origin, self.radius_km, visible);

        info!(
            "Found {} active SOS alerts within {} km of ({}, {})",
            matches.len(),
            self.radius_km,
            origin.lat,
            origin.lng
        );
        Ok(matches)
    }

    pub async fn get_alert(&self, alert_id: &str) -> Result<SosAlert, ServiceError> {
        self.storage
            .get_alert(alert_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("SOS alert {}", alert_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{AlertRepository, DbConnection};
    use chrono::{Duration, TimeZone};
    use shared::AlertStatus;

    const HOSPITAL: Location = Location { lat: 12.8714, lng: 74.8431 };

    async fn setup_test() -> (AlertService, Arc<AlertRepository>) {
        let db = DbConnection::in_memory().await.expect("Failed to create test database");
        let repo = Arc::new(AlertRepository::new(db));
        let service = AlertService::new(repo.clone(), 15.0, AlertWindow::default());
        (service, repo)
    }

    #[tokio::test]
    async fn test_raise_alert() {
        let (service, _) = setup_test().await;

        let alert = service
            .raise_alert(CreateSosAlertCommand { location: Location::new(12.90, 74.85) })
            .await
            .expect("Failed to raise alert");

        assert_eq!(alert.status, AlertStatus::Active);
        assert!(alert.broadcast_to_hospitals);
        assert!(alert.broadcast_to_ambulances);
        assert_eq!(service.get_alert(&alert.id).await.unwrap().id, alert.id);
    }

    #[tokio::test]
    async fn test_raise_alert_rejects_bad_location() {
        let (service, _) = setup_test().await;

        let result = service
            .raise_alert(CreateSosAlertCommand { location: Location::new(12.9, 181.0) })
            .await;

        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_fresh_alert_is_listed() {
        let (service, _) = setup_test().await;
        let alert = service
            .raise_alert(CreateSosAlertCommand { location: Location::new(12.90, 74.85) })
            .await
            .unwrap();

        let result = service.list_nearby_alerts(HOSPITAL).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].item.id, alert.id);
        assert!(result[0].distance_km <= 15.0);
    }

    #[tokio::test]
    async fn test_alert_leaves_the_list_after_window() {
        let (service, repo) = setup_test().await;
        let raised = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        let alert = SosAlert::new(Some(Location::new(12.90, 74.85)), raised);
        repo.store_alert(&alert).await.unwrap();

        let inside = service
            .list_nearby_alerts_at(HOSPITAL, raised + Duration::minutes(119))
            .await
            .unwrap();
        let outside = service
            .list_nearby_alerts_at(HOSPITAL, raised + Duration::minutes(121))
            .await
            .unwrap();

        assert_eq!(inside.len(), 1);
        assert!(outside.is_empty());
        // Never mutated, only hidden
        assert_eq!(repo.get_alert(&alert.id).await.unwrap().unwrap().status, AlertStatus::Active);
    }

    #[tokio::test]
    async fn test_alerts_outside_radius_or_without_location_are_skipped() {
        let (service, repo) = setup_test().await;
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        let near = SosAlert::new(Some(Location::new(12.95, 74.85)), now - Duration::minutes(5));
        let far = SosAlert::new(Some(Location::new(13.2, 75.1)), now - Duration::minutes(5));
        let unknown = SosAlert::new(None, now - Duration::minutes(5));
        for alert in [&near, &far, &unknown] {
            repo.store_alert(alert).await.unwrap();
        }

        let result = service.list_nearby_alerts_at(HOSPITAL, now).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].item.id, near.id);
    }
}

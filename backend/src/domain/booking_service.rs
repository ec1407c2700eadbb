use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::commands::bookings::{AcceptBookingCommand, CreateBookingCommand};
use super::models::booking::{AmbulanceBooking, DriverAssignment};
use super::models::errors::ServiceError;
use super::models::location::Location;
use super::proximity::{nearby, Nearby};
use crate::storage::traits::BookingStorage;

const MAX_FIELD_LENGTH: usize = 200;

/// Service for ambulance bookings: creation by patients, discovery and
/// acceptance by drivers
#[derive(Clone)]
pub struct BookingService {
    storage: Arc<dyn BookingStorage>,
    radius_km: f64,
}

impl BookingService {
    pub fn new(storage: Arc<dyn BookingStorage>, radius_km: f64) -> Self {
        Self { storage, radius_km }
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Create a new, unassigned booking
    pub async fn create_booking(&self, command: CreateBookingCommand) -> Result<AmbulanceBooking, ServiceError> {
        info!("Creating booking: emergency={}", command.emergency);

        let name = required_field("Name", &command.name)?;
        let phone = required_field("Phone", &command.phone)?;
        command.location.validate()?;

        let booking = AmbulanceBooking {
            id: AmbulanceBooking::generate_id(),
            name,
            phone,
            emergency: command.emergency,
            location: Some(command.location),
            destination: optional_field(command.destination),
            details: optional_field(command.details),
            created_at: Utc::now(),
            assignment: None,
        };

        self.storage.store_booking(&booking).await?;
        info!("Created booking {}", booking.id);

        Ok(booking)
    }

    /// Unassigned bookings within the booking radius of `origin`, nearest first
    pub async fn list_nearby_bookings(&self, origin: Location) -> Result<Vec<Nearby<AmbulanceBooking>>, ServiceError> {
        origin.validate()?;

        let candidates = self.storage.list_unassigned_bookings().await?;
        let total = candidates.len();
        let matches = nearby(origin, self.radius_km, candidates);

        info!(
            "Found {} of {} unassigned bookings within {} km of ({}, {})",
            matches.len(),
            total,
            self.radius_km,
            origin.lat,
            origin.lng
        );
        Ok(matches)
    }

    /// Claim a booking for a driver.
    ///
    /// Exactly one of several concurrent callers succeeds; the others get
    /// `AlreadyAssigned`. The conditional write decides the winner, the
    /// follow-up read only tells "already taken" apart from "never existed".
    pub async fn accept_booking(&self, command: AcceptBookingCommand) -> Result<(), ServiceError> {
        info!(
            "Driver {} ({}) accepting booking {}",
            command.driver_name, command.ambulance_id, command.booking_id
        );

        let driver_name = required_field("Driver name", &command.driver_name)?;
        let ambulance_id = required_field("Ambulance ID", &command.ambulance_id)?;
        command.driver_location.validate()?;

        let assignment = DriverAssignment {
            driver_name,
            ambulance_id,
            location: command.driver_location,
            accepted_at: Utc::now(),
        };

        if self.storage.assign_if_unassigned(&command.booking_id, &assignment).await? {
            info!("Booking {} accepted by {}", command.booking_id, assignment.driver_name);
            return Ok(());
        }

        match self.storage.get_booking(&command.booking_id).await? {
            Some(_) => {
                warn!("Booking {} was already accepted", command.booking_id);
                Err(ServiceError::AlreadyAssigned(command.booking_id))
            }
            None => {
                warn!("Booking not found: {}", command.booking_id);
                Err(ServiceError::NotFound(format!("Booking {}", command.booking_id)))
            }
        }
    }

    pub async fn get_booking(&self, booking_id: &str) -> Result<AmbulanceBooking, ServiceError> {
        self.storage
            .get_booking(booking_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Booking {}", booking_id)))
    }
}

/// Trimmed value of a mandatory text field
pub(crate) fn required_field(label: &str, value: &str) -> Result<String, ServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::validation(format!("{} is required", label)));
    }
    if trimmed.chars().count() > MAX_FIELD_LENGTH {
        return Err(ServiceError::validation(format!(
            "{} cannot exceed {} characters",
            label, MAX_FIELD_LENGTH
        )));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn optional_field(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;
    use crate::storage::{BookingRepository, DbConnection};
    use shared::EmergencyType;

    const DRIVER_LOCATION: Location = Location { lat: 12.8714, lng: 74.8431 };

    async fn setup_test() -> BookingService {
        let db = DbConnection::in_memory().await.expect("Failed to create test database");
        BookingService::new(Arc::new(BookingRepository::new(db)), 10.0)
    }

    fn booking_command(location: Location) -> CreateBookingCommand {
        CreateBookingCommand {
            name: "  Meera Shetty ".to_string(),
            phone: "9845012345".to_string(),
            emergency: EmergencyType::HeartAttack,
            location,
            destination: None,
            details: Some("Chest pain since morning".to_string()),
        }
    }

    fn accept_command(booking_id: &str, driver: &str) -> AcceptBookingCommand {
        AcceptBookingCommand {
            booking_id: booking_id.to_string(),
            driver_name: driver.to_string(),
            ambulance_id: format!("AMB-{}", driver),
            driver_location: DRIVER_LOCATION,
        }
    }

    #[tokio::test]
    async fn test_create_booking() {
        let service = setup_test().await;

        let booking = service
            .create_booking(booking_command(Location::new(12.88, 74.85)))
            .await
            .expect("Failed to create booking");

        assert_eq!(booking.name, "Meera Shetty");
        assert_eq!(booking.destination, "");
        assert_eq!(booking.details, "Chest pain since morning");
        assert!(!booking.is_assigned());

        let stored = service.get_booking(&booking.id).await.unwrap();
        assert_eq!(stored.id, booking.id);
        assert_eq!(stored.location, Some(Location::new(12.88, 74.85)));
    }

    #[tokio::test]
    async fn test_create_booking_validation() {
        let service = setup_test().await;

        let mut command = booking_command(Location::new(12.88, 74.85));
        command.name = "   ".to_string();
        assert!(matches!(service.create_booking(command).await, Err(ServiceError::Validation(_))));

        let mut command = booking_command(Location::new(12.88, 74.85));
        command.phone = String::new();
        assert!(matches!(service.create_booking(command).await, Err(ServiceError::Validation(_))));

        let command = booking_command(Location::new(100.0, 74.85));
        assert!(matches!(service.create_booking(command).await, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_nearby_bookings() {
        let service = setup_test().await;
        let close = service.create_booking(booking_command(Location::new(12.88, 74.85))).await.unwrap();
        service.create_booking(booking_command(Location::new(13.5, 75.5))).await.unwrap();

        let result = service.list_nearby_bookings(DRIVER_LOCATION).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].item.id, close.id);
        assert!((result[0].distance_km - 1.2).abs() <= 0.1);
    }

    #[tokio::test]
    async fn test_accepted_bookings_leave_the_nearby_list() {
        let service = setup_test().await;
        let booking = service.create_booking(booking_command(Location::new(12.88, 74.85))).await.unwrap();

        service.accept_booking(accept_command(&booking.id, "Suresh")).await.unwrap();

        assert!(service.list_nearby_bookings(DRIVER_LOCATION).await.unwrap().is_empty());
        let stored = service.get_booking(&booking.id).await.unwrap();
        let assignment = stored.assignment.expect("assignment missing");
        assert_eq!(assignment.driver_name, "Suresh");
        assert_eq!(assignment.ambulance_id, "AMB-Suresh");
        assert_eq!(assignment.location, DRIVER_LOCATION);
    }

    #[tokio::test]
    async fn test_second_accept_is_rejected() {
        let service = setup_test().await;
        let booking = service.create_booking(booking_command(Location::new(12.88, 74.85))).await.unwrap();

        service.accept_booking(accept_command(&booking.id, "First")).await.unwrap();
        let err = service.accept_booking(accept_command(&booking.id, "Second")).await.unwrap_err();

        assert!(matches!(err, ServiceError::AlreadyAssigned(ref id) if id == &booking.id));
        let stored = service.get_booking(&booking.id).await.unwrap();
        assert_eq!(stored.assignment.unwrap().driver_name, "First");
    }

    #[tokio::test]
    async fn test_concurrent_accepts_have_one_winner() {
        let service = setup_test().await;
        let booking = service.create_booking(booking_command(Location::new(12.88, 74.85))).await.unwrap();

        let first = tokio::spawn({
            let service = service.clone();
            let command = accept_command(&booking.id, "Anil");
            async move { service.accept_booking(command).await }
        });
        let second = tokio::spawn({
            let service = service.clone();
            let command = accept_command(&booking.id, "Bhavya");
            async move { service.accept_booking(command).await }
        });
        let results = [first.await.unwrap(), second.await.unwrap()];

        let winners = results.iter().filter(|r| r.is_ok()).count();
        let losers = results
            .iter()
            .filter(|r| matches!(r, Err(ServiceError::AlreadyAssigned(_))))
            .count();
        assert_eq!(winners, 1);
        assert_eq!(losers, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_accepts_across_connections_have_one_winner() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            database_url: format!("sqlite:{}", dir.path().join("bookings.db").display()),
            max_connections: 4,
            ..StorageConfig::default()
        };
        let db = DbConnection::connect(&config).await.expect("Failed to open database");
        let service = BookingService::new(Arc::new(BookingRepository::new(db)), 10.0);
        let booking = service.create_booking(booking_command(Location::new(12.88, 74.85))).await.unwrap();

        let drivers = ["Anil", "Bhavya", "Chetan", "Deepa", "Irfan", "Jaya"];
        let handles: Vec<_> = drivers
            .iter()
            .map(|driver| {
                let service = service.clone();
                let command = accept_command(&booking.id, driver);
                tokio::spawn(async move { service.accept_booking(command).await })
            })
            .collect();

        let mut winners = Vec::new();
        let mut losers = 0;
        for (driver, handle) in drivers.iter().zip(handles) {
            match handle.await.unwrap() {
                Ok(()) => winners.push(*driver),
                Err(ServiceError::AlreadyAssigned(_)) => losers += 1,
                Err(e) => panic!("unexpected error for {}: {}", driver, e),
            }
        }

        assert_eq!(winners.len(), 1);
        assert_eq!(losers, drivers.len() - 1);
        let stored = service.get_booking(&booking.id).await.unwrap();
        assert_eq!(stored.assignment.unwrap().driver_name, winners[0]);
    }

    #[tokio::test]
    async fn test_accept_unknown_booking() {
        let service = setup_test().await;

        let err = service.accept_booking(accept_command("missing", "Anil")).await.unwrap_err();

        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_accept_requires_driver_details() {
        let service = setup_test().await;
        let booking = service.create_booking(booking_command(Location::new(12.88, 74.85))).await.unwrap();

        let mut command = accept_command(&booking.id, "Anil");
        command.ambulance_id = " ".to_string();
        let err = service.accept_booking(command).await.unwrap_err();

        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(!service.get_booking(&booking.id).await.unwrap().is_assigned());
    }
}

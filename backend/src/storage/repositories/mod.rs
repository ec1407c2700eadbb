//! SQLite implementations of the storage traits, one repository per table.

pub mod alert_repository;
pub mod blood_request_repository;
pub mod booking_repository;

pub use alert_repository::AlertRepository;
pub use blood_request_repository::BloodRequestRepository;
pub use booking_repository::BookingRepository;

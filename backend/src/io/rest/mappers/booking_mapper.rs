use shared::{AcceptBookingRequest, CreateBookingRequest, NearbyBooking};

use super::location_mapper::LocationMapper;
use crate::domain::commands::bookings::{AcceptBookingCommand, CreateBookingCommand};
use crate::domain::models::booking::{AmbulanceBooking, DriverAssignment};
use crate::domain::models::errors::ServiceError;
use crate::domain::models::format_timestamp;
use crate::domain::Nearby;

pub struct BookingMapper;

impl BookingMapper {
    pub fn to_create_command(request: CreateBookingRequest) -> Result<CreateBookingCommand, ServiceError> {
        Ok(CreateBookingCommand {
            location: LocationMapper::required(request.location)?,
            name: request.name,
            phone: request.phone,
            emergency: request.emergency,
            destination: request.destination,
            details: request.details,
        })
    }

    pub fn to_accept_command(booking_id: String, request: AcceptBookingRequest) -> AcceptBookingCommand {
        AcceptBookingCommand {
            booking_id,
            driver_name: request.driver_name,
            ambulance_id: request.ambulance_id,
            driver_location: LocationMapper::to_domain(request.location),
        }
    }

    pub fn to_dto(domain: AmbulanceBooking) -> shared::AmbulanceBooking {
        shared::AmbulanceBooking {
            assigned: domain.is_assigned(),
            id: domain.id,
            name: domain.name,
            phone: domain.phone,
            emergency: domain.emergency,
            location: domain.location.map(LocationMapper::to_dto),
            destination: domain.destination,
            details: domain.details,
            timestamp: format_timestamp(&domain.created_at),
            driver: domain.assignment.map(Self::assignment_to_dto),
        }
    }

    fn assignment_to_dto(domain: DriverAssignment) -> shared::DriverAssignment {
        shared::DriverAssignment {
            name: domain.driver_name,
            ambulance_id: domain.ambulance_id,
            location: LocationMapper::to_dto(domain.location),
            accepted_at: format_timestamp(&domain.accepted_at),
        }
    }

    pub fn to_nearby_dto_list(matches: Vec<Nearby<AmbulanceBooking>>) -> Vec<NearbyBooking> {
        matches
            .into_iter()
            .map(|m| NearbyBooking {
                booking: Self::to_dto(m.item),
                distance: m.distance_km,
            })
            .collect()
    }
}

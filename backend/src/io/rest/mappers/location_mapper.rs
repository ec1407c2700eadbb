use crate::domain::models::errors::ServiceError;
use crate::domain::models::location::Location;

pub struct LocationMapper;

impl LocationMapper {
    pub fn to_domain(dto: shared::Location) -> Location {
        Location::new(dto.lat, dto.lng)
    }

    /// Location of a request that cannot be served without one
    pub fn required(dto: Option<shared::Location>) -> Result<Location, ServiceError> {
        dto.map(Self::to_domain)
            .ok_or_else(|| ServiceError::validation("Location is required"))
    }

    pub fn to_dto(domain: Location) -> shared::Location {
        shared::Location {
            lat: domain.lat,
            lng: domain.lng,
        }
    }
}

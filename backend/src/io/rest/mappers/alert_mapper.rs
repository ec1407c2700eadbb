use shared::{CreateSosAlertRequest, NearbySosAlert};

use super::location_mapper::LocationMapper;
use crate::domain::commands::alerts::CreateSosAlertCommand;
use crate::domain::models::alert::{SosAlert, SOS_ALERT_TYPE};
use crate::domain::models::errors::ServiceError;
use crate::domain::models::format_timestamp;
use crate::domain::Nearby;

pub struct AlertMapper;

impl AlertMapper {
    pub fn to_create_command(request: CreateSosAlertRequest) -> Result<CreateSosAlertCommand, ServiceError> {
        Ok(CreateSosAlertCommand {
            location: LocationMapper::required(request.location)?,
        })
    }

    pub fn to_dto(domain: SosAlert) -> shared::SosAlert {
        shared::SosAlert {
            id: domain.id,
            location: domain.location.map(LocationMapper::to_dto),
            timestamp: format_timestamp(&domain.created_at),
            alert_type: SOS_ALERT_TYPE.to_string(),
            status: domain.status,
            broadcast_to_hospitals: domain.broadcast_to_hospitals,
            broadcast_to_ambulances: domain.broadcast_to_ambulances,
        }
    }

    pub fn to_nearby_dto_list(matches: Vec<Nearby<SosAlert>>) -> Vec<NearbySosAlert> {
        matches
            .into_iter()
            .map(|m| NearbySosAlert {
                alert: Self::to_dto(m.item),
                distance: m.distance_km,
            })
            .collect()
    }
}

use shared::{CreateBloodRequestRequest, CreateBloodRequestResponse, FailedEmail};

use super::location_mapper::LocationMapper;
use crate::domain::commands::blood_requests::{CreateBloodRequestCommand, CreateBloodRequestResult};
use crate::domain::email_service::DispatchFailure;

pub struct BloodRequestMapper;

impl BloodRequestMapper {
    pub fn to_create_command(request: CreateBloodRequestRequest) -> CreateBloodRequestCommand {
        CreateBloodRequestCommand {
            blood_group: request.blood_group,
            units_required: request.units_required,
            urgency: request.urgency,
            hospital_name: request.hospital_name,
            hospital_address: request.hospital_address,
            contact_number: request.contact_number,
            additional_notes: request.additional_notes,
            location: request.location.map(LocationMapper::to_domain),
        }
    }

    pub fn to_create_response(result: CreateBloodRequestResult) -> CreateBloodRequestResponse {
        CreateBloodRequestResponse {
            success: true,
            request_id: result.request.id,
            emails_sent: result.dispatch.sent,
            failed_emails: result
                .dispatch
                .failures
                .into_iter()
                .map(Self::failure_to_dto)
                .collect(),
        }
    }

    fn failure_to_dto(failure: DispatchFailure) -> FailedEmail {
        FailedEmail {
            retryable: failure.error.is_retryable(),
            error: failure.error.to_string(),
            email: failure.recipient,
        }
    }
}

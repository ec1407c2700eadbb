use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use shared::BloodRequestStatus;
use tracing::{info, warn};

use super::booking_service::{optional_field, required_field};
use super::commands::blood_requests::{CreateBloodRequestCommand, CreateBloodRequestResult};
use super::email_service::{EmailContent, EmailDispatcher};
use super::models::blood_request::BloodRequest;
use super::models::errors::ServiceError;
use crate::storage::traits::BloodRequestStorage;

pub const MAX_UNITS_REQUIRED: u32 = 100;

/// Service that records blood requests and emails them to the configured
/// donors and blood banks
#[derive(Clone)]
pub struct BloodRequestService {
    storage: Arc<dyn BloodRequestStorage>,
    dispatcher: EmailDispatcher,
    recipients: Vec<String>,
}

impl BloodRequestService {
    pub fn new(storage: Arc<dyn BloodRequestStorage>, dispatcher: EmailDispatcher, recipients: Vec<String>) -> Self {
        Self {
            storage,
            dispatcher,
            recipients,
        }
    }

    /// Persist the request, email every recipient, then record how many
    /// deliveries succeeded. A partially failed batch still succeeds; the
    /// failures travel back in the dispatch report.
    pub async fn create_blood_request(
        &self,
        command: CreateBloodRequestCommand,
    ) -> Result<CreateBloodRequestResult, ServiceError> {
        info!(
            "Creating blood request: {} x{} ({})",
            command.blood_group, command.units_required, command.urgency
        );

        if command.units_required == 0 || command.units_required > MAX_UNITS_REQUIRED {
            return Err(ServiceError::validation(format!(
                "Units required must be between 1 and {}",
                MAX_UNITS_REQUIRED
            )));
        }
        let hospital_name = required_field("Hospital name", &command.hospital_name)?;
        let hospital_address = required_field("Hospital address", &command.hospital_address)?;
        let contact_number = required_field("Contact number", &command.contact_number)?;
        if let Some(location) = &command.location {
            location.validate()?;
        }

        let mut request = BloodRequest {
            id: BloodRequest::generate_id(),
            blood_group: command.blood_group,
            units_required: command.units_required,
            urgency: command.urgency,
            hospital_name,
            hospital_address,
            contact_number,
            additional_notes: optional_field(command.additional_notes),
            location: command.location,
            created_at: Utc::now(),
            status: BloodRequestStatus::Active,
            emails_sent: 0,
        };

        self.storage.store_blood_request(&request).await?;

        if self.recipients.is_empty() {
            warn!("No blood request recipients configured; request {} was not emailed", request.id);
        }

        let content = render_blood_request_email(&request);
        let dispatch = self.dispatcher.dispatch(&self.recipients, &content).await;

        let recorded = self
            .storage
            .record_emails_sent(&request.id, dispatch.sent)
            .await
            .with_context(|| format!("Failed to record email count for blood request {}", request.id))?;
        if !recorded {
            return Err(ServiceError::Storage(anyhow::anyhow!(
                "Blood request {} vanished before its email count was recorded",
                request.id
            )));
        }
        request.emails_sent = dispatch.sent;

        info!(
            "Blood request {} created, {} emails sent, {} failed",
            request.id,
            dispatch.sent,
            dispatch.failures.len()
        );

        Ok(CreateBloodRequestResult { request, dispatch })
    }

    pub async fn get_blood_request(&self, request_id: &str) -> Result<BloodRequest, ServiceError> {
        self.storage
            .get_blood_request(request_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Blood request {}", request_id)))
    }
}

pub fn render_blood_request_email(request: &BloodRequest) -> EmailContent {
    let subject = format!(
        "URGENT: Blood Request - {} ({} units)",
        request.blood_group, request.units_required
    );

    let notes = if request.additional_notes.is_empty() {
        String::new()
    } else {
        format!(
            "<p><strong>Notes:</strong> {}</p>\n",
            escape_html(&request.additional_notes)
        )
    };

    let html = format!(
        "<h2>Emergency Blood Request</h2>\n\
         <p><strong>Blood Group:</strong> {}</p>\n\
         <p><strong>Units Required:</strong> {}</p>\n\
         <p><strong>Urgency:</strong> {}</p>\n\
         <p><strong>Hospital:</strong> {}</p>\n\
         <p><strong>Address:</strong> {}</p>\n\
         <p><strong>Contact:</strong> {}</p>\n\
         {}\
         <p>Please contact the hospital immediately if you can fulfill this request.</p>\n",
        escape_html(request.blood_group.as_str()),
        request.units_required,
        request.urgency.as_str().to_uppercase(),
        escape_html(&request.hospital_name),
        escape_html(&request.hospital_address),
        escape_html(&request.contact_number),
        notes,
    );

    EmailContent { subject, html }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

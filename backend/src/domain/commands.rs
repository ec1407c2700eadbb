//! Domain-level command types.
//! These are used by services inside the domain layer and are **not** exposed
//! over the public API. The REST layer maps the DTOs from the `shared` crate
//! onto them.

pub mod bookings {
    use crate::domain::models::location::Location;
    use shared::EmergencyType;

    /// Input for booking an ambulance
    #[derive(Debug, Clone)]
    pub struct CreateBookingCommand {
        pub name: String,
        pub phone: String,
        pub emergency: EmergencyType,
        pub location: Location,
        pub destination: Option<String>,
        pub details: Option<String>,
    }

    /// Input for a driver claiming a booking
    #[derive(Debug, Clone)]
    pub struct AcceptBookingCommand {
        pub booking_id: String,
        pub driver_name: String,
        pub ambulance_id: String,
        pub driver_location: Location,
    }
}

pub mod alerts {
    use crate::domain::models::location::Location;

    #[derive(Debug, Clone)]
    pub struct CreateSosAlertCommand {
        pub location: Location,
    }
}

pub mod blood_requests {
    use crate::domain::email_service::DispatchReport;
    use crate::domain::models::blood_request::BloodRequest;
    use crate::domain::models::location::Location;
    use shared::{BloodGroup, Urgency};

    #[derive(Debug, Clone)]
    pub struct CreateBloodRequestCommand {
        pub blood_group: BloodGroup,
        pub units_required: u32,
        pub urgency: Urgency,
        pub hospital_name: String,
        pub hospital_address: String,
        pub contact_number: String,
        pub additional_notes: Option<String>,
        pub location: Option<Location>,
    }

    /// The persisted request together with the outcome of the email batch
    #[derive(Debug)]
    pub struct CreateBloodRequestResult {
        pub request: BloodRequest,
        pub dispatch: DispatchReport,
    }
}

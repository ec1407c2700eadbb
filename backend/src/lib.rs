//! # Lifeline Backend
//!
//! Server side of the emergency response coordination service. Patients book
//! ambulances and raise SOS alerts, drivers pick up nearby bookings, and
//! hospitals watch nearby alerts and broadcast blood requests by email.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST API, handlers, DTO mappers)
//!     ↓
//! Domain Layer (proximity matching, assignment gate, services)
//!     ↓
//! Storage Layer (SQLite repositories behind storage traits)
//! ```
//!
//! Every request is handled independently; the only shared state is the
//! immutable [`AppState`] holding service handles.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use std::sync::Arc;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::domain::email_service::{DisabledMailer, EmailDispatcher, Mailer, SmtpMailer};
use crate::domain::models::location::Location;
use crate::domain::{AlertService, AlertWindow, BloodRequestService, BookingService};
use crate::storage::{AlertRepository, BloodRequestRepository, BookingRepository, DbConnection};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub booking_service: BookingService,
    pub alert_service: AlertService,
    pub blood_request_service: BloodRequestService,
    pub fallback_location: Location,
}

impl AppState {
    /// Wire the services on top of an existing connection and mail transport
    pub fn new(db: DbConnection, mailer: Arc<dyn Mailer>, config: &AppConfig) -> Self {
        let booking_service = BookingService::new(
            Arc::new(BookingRepository::new(db.clone())),
            config.proximity.booking_radius_km,
        );
        let alert_service = AlertService::new(
            Arc::new(AlertRepository::new(db.clone())),
            config.proximity.alert_radius_km,
            AlertWindow::from_minutes(config.proximity.alert_window_minutes),
        );
        let dispatcher = EmailDispatcher::new(
            mailer,
            config.email.send_timeout(),
            config.email.batch_timeout(),
        );
        let blood_request_service = BloodRequestService::new(
            Arc::new(BloodRequestRepository::new(db)),
            dispatcher,
            config.email.recipients.clone(),
        );

        Self {
            booking_service,
            alert_service,
            blood_request_service,
            fallback_location: config.fallback_location.into(),
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database at {}", config.storage.database_url);
    let db = DbConnection::connect(&config.storage).await?;

    info!("Setting up mail transport");
    let mailer: Arc<dyn Mailer> = if config.email.is_configured() {
        Arc::new(SmtpMailer::new(&config.email)?)
    } else {
        warn!("Email sender not configured, blood request notifications are disabled");
        Arc::new(DisabledMailer)
    };

    info!("Setting up application state");
    Ok(AppState::new(db, mailer, config))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_origin: &str) -> Result<Router> {
    let origin = cors_origin
        .parse::<HeaderValue>()
        .map_err(|e| anyhow::anyhow!("Invalid CORS origin {:?}: {}", cors_origin, e))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/book-ambulance", post(io::create_booking))
        .route("/emergencies", get(io::list_nearby_bookings))
        .route("/accept-booking/:id", post(io::accept_booking))
        .route("/alert", post(io::create_sos_alert))
        .route("/sos-alerts", get(io::list_nearby_sos_alerts))
        .route("/blood-request", post(io::create_blood_request))
        .route("/emergency-types", get(io::list_emergency_types))
        .route("/first-aid/:emergency", get(io::get_first_aid))
        .route("/location/fallback", get(io::get_fallback_location));

    Ok(Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state))
}

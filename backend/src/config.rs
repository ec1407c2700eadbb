//! # Configuration
//!
//! Server settings loaded from a TOML file. Every section has defaults, so an
//! absent file or an absent section yields a working development setup
//! (local SQLite file, notifications disabled).
//!
//! ```toml
//! [server]
//! bind_addr = "0.0.0.0:3000"
//!
//! [proximity]
//! booking_radius_km = 10.0
//! alert_radius_km = 15.0
//! alert_window_minutes = 120
//!
//! [email]
//! smtp_server = "smtp.gmail.com"
//! from_email = "alerts@example.org"
//! recipients = ["bloodbank@example.org"]
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::models::location::Location;

/// One week. Longer windows would overflow chrono's duration arithmetic.
pub const MAX_ALERT_WINDOW_MINUTES: i64 = 7 * 24 * 60;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub proximity: ProximityConfig,
    pub email: EmailConfig,
    pub fallback_location: LocationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Origin allowed to call the API from a browser
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            cors_origin: "http://localhost:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub operation_timeout_secs: u64,
}

impl StorageConfig {
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.operation_timeout_secs)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:lifeline.db".to_string(),
            max_connections: 5,
            operation_timeout_secs: 5,
        }
    }
}

/// Matching policy. The radii are tuned per deployment density.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityConfig {
    /// Radius drivers see unassigned bookings in
    pub booking_radius_km: f64,
    /// Radius hospitals and drivers see SOS alerts in
    pub alert_radius_km: f64,
    /// How long an SOS alert stays visible after it was raised
    pub alert_window_minutes: i64,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            booking_radius_km: 10.0,
            alert_radius_km: 15.0,
            alert_window_minutes: 120,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from_name: String,
    pub from_email: String,
    /// Blood banks and donors every blood request is sent to
    pub recipients: Vec<String>,
    pub send_timeout_secs: u64,
    pub batch_timeout_secs: u64,
}

impl EmailConfig {
    /// Whether enough is set to build an SMTP transport
    pub fn is_configured(&self) -> bool {
        !self.smtp_server.trim().is_empty() && !self.from_email.trim().is_empty()
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_secs(self.send_timeout_secs)
    }

    pub fn batch_timeout(&self) -> Duration {
        Duration::from_secs(self.batch_timeout_secs)
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_server: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            username: String::new(),
            password: String::new(),
            from_name: "Lifeline Emergency".to_string(),
            from_email: String::new(),
            recipients: Vec::new(),
            send_timeout_secs: 10,
            batch_timeout_secs: 60,
        }
    }
}

/// Static coordinates clients fall back to when geolocation is unavailable
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    pub lat: f64,
    pub lng: f64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        // Mangalore
        Self { lat: 12.8714, lng: 74.8431 }
    }
}

impl From<LocationConfig> for Location {
    fn from(config: LocationConfig) -> Self {
        Location::new(config.lat, config.lng)
    }
}

impl AppConfig {
    /// Load configuration from a TOML file and validate it
    pub fn load(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        config.validate()?;
        Ok(config)
    }

    /// Load from `config_path` when given, otherwise use the defaults
    pub fn load_or_default(config_path: Option<&Path>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.proximity.booking_radius_km > 0.0) {
            anyhow::bail!("proximity.booking_radius_km must be positive");
        }
        if !(self.proximity.alert_radius_km > 0.0) {
            anyhow::bail!("proximity.alert_radius_km must be positive");
        }
        if self.proximity.alert_window_minutes <= 0 {
            anyhow::bail!("proximity.alert_window_minutes must be positive");
        }
        if self.proximity.alert_window_minutes > MAX_ALERT_WINDOW_MINUTES {
            anyhow::bail!(
                "proximity.alert_window_minutes must be at most {} (one week)",
                MAX_ALERT_WINDOW_MINUTES
            );
        }
        if self.storage.max_connections == 0 {
            anyhow::bail!("storage.max_connections must be at least 1");
        }
        if self.storage.operation_timeout_secs == 0 {
            anyhow::bail!("storage.operation_timeout_secs must be positive");
        }
        if self.email.send_timeout_secs == 0 || self.email.batch_timeout_secs == 0 {
            anyhow::bail!("email timeouts must be positive");
        }
        Location::from(self.fallback_location)
            .validate()
            .context("fallback_location is not a valid coordinate")?;
        Ok(())
    }
}

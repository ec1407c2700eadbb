//! # Alert Lifecycle
//!
//! SOS alerts are never expired in storage. An alert is relevant while it is
//! `active` and was raised inside the visibility window; older alerts simply
//! stop appearing in query results.

use chrono::{DateTime, Duration, Utc};
use shared::AlertStatus;

use super::models::alert::SosAlert;

pub const DEFAULT_ALERT_WINDOW_MINUTES: i64 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertWindow {
    duration: Duration,
}

impl AlertWindow {
    pub fn from_minutes(minutes: i64) -> Self {
        Self { duration: Duration::minutes(minutes) }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Oldest creation time still visible at `now`
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.duration
    }

    pub fn is_visible(&self, alert: &SosAlert, now: DateTime<Utc>) -> bool {
        alert.status == AlertStatus::Active && alert.created_at >= self.cutoff(now)
    }
}

impl Default for AlertWindow {
    fn default() -> Self {
        Self::from_minutes(DEFAULT_ALERT_WINDOW_MINUTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::location::Location;
    use chrono::TimeZone;

    fn alert_at(created_at: DateTime<Utc>) -> SosAlert {
        SosAlert::new(Some(Location::new(12.8714, 74.8431)), created_at)
    }

    #[test]
    fn test_visible_just_inside_window() {
        let raised = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let window = AlertWindow::default();
        let alert = alert_at(raised);

        assert!(window.is_visible(&alert, raised));
        assert!(window.is_visible(&alert, raised + Duration::minutes(119)));
        assert!(window.is_visible(&alert, raised + Duration::minutes(120)));
        assert!(!window.is_visible(&alert, raised + Duration::minutes(121)));
    }

    #[test]
    fn test_terminal_status_is_never_visible() {
        let raised = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let window = AlertWindow::default();
        let mut alert = alert_at(raised);
        alert.status = AlertStatus::Resolved;

        assert!(!window.is_visible(&alert, raised));
    }

    #[test]
    fn test_cutoff() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let window = AlertWindow::from_minutes(30);
        assert_eq!(window.cutoff(now), Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap());
    }
}

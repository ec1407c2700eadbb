use super::errors::ServiceError;

pub const MAX_LATITUDE: f64 = 90.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// A point on the earth's surface in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Finite and inside the latitude/longitude ranges
    pub fn is_well_formed(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && self.lat.abs() <= MAX_LATITUDE
            && self.lng.abs() <= MAX_LONGITUDE
    }

    pub fn validate(&self) -> Result<(), ServiceError> {
        if !self.lat.is_finite() || !self.lng.is_finite() {
            return Err(ServiceError::validation("Latitude and longitude must be finite numbers"));
        }
        if self.lat.abs() > MAX_LATITUDE {
            return Err(ServiceError::validation(format!(
                "Latitude must be between -90 and 90, got {}",
                self.lat
            )));
        }
        if self.lng.abs() > MAX_LONGITUDE {
            return Err(ServiceError::validation(format!(
                "Longitude must be between -180 and 180, got {}",
                self.lng
            )));
        }
        Ok(())
    }
}

/// Anything that may carry a position and can therefore be proximity matched
pub trait Located {
    fn location(&self) -> Option<Location>;
}

impl Located for Location {
    fn location(&self) -> Option<Location> {
        Some(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(Location::new(90.0, 180.0).is_well_formed());
        assert!(Location::new(-90.0, -180.0).is_well_formed());
        assert!(Location::new(0.0, 0.0).validate().is_ok());
    }

    #[test]
    fn test_malformed_locations() {
        assert!(!Location::new(f64::NAN, 74.8).is_well_formed());
        assert!(!Location::new(12.8, f64::INFINITY).is_well_formed());
        assert!(!Location::new(90.5, 74.8).is_well_formed());
        assert!(!Location::new(12.8, -180.1).is_well_formed());
    }

    #[test]
    fn test_validate_reports_which_component() {
        let err = Location::new(91.0, 10.0).validate().unwrap_err();
        assert!(err.to_string().starts_with("Latitude"));

        let err = Location::new(10.0, 200.0).validate().unwrap_err();
        assert!(err.to_string().starts_with("Longitude"));
    }
}

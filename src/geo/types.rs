//! Core types for the geo subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Latitude within [-90, 90] and longitude within [-180, 180].
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.lat >= 0.0 { 'N' } else { 'S' };
        let ew = if self.lon >= 0.0 { 'E' } else { 'W' };
        write!(f, "{:.4}°{}, {:.4}°{}", self.lat.abs(), ns, self.lon.abs(), ew)
    }
}

/// The Great Pyramids of Giza. Every distance is measured from here.
pub const GIZA: Coordinate = Coordinate::new(29.9773, 31.1325);

/// Display name of the reference point.
pub const REFERENCE_NAME: &str = "Giza, Egypt";

/// Geocoding provider errors.
#[derive(Debug, Error)]
pub enum GeoError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Geocoder returned HTTP status {0}")]
    Status(u16),
    #[error("Location not found: '{0}'")]
    NotFound(String),
    #[error("Invalid geocoder response: {0}")]
    InvalidResponse(String),
}

impl GeoError {
    /// True when the provider affirmatively reported no match.
    pub fn is_definitive(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// No coordinate source could place the city.
///
/// `supported` carries the table's city list when the table is the only
/// source, so the message can point the user at names that will work.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionFailure {
    pub city: String,
    pub supported: Option<Vec<String>>,
}

impl fmt::Display for ResolutionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.supported {
            Some(cities) => write!(
                f,
                "I don't have the exact coordinates for {} in my database. \
                 I can provide distances for these cities: {}.",
                self.city,
                cities.join(", ")
            ),
            None => write!(f, "Could not find coordinates for {}.", self.city),
        }
    }
}

impl std::error::Error for ResolutionFailure {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_validity() {
        assert!(GIZA.is_valid());
        assert!(Coordinate::new(-90.0, 180.0).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, -180.5).is_valid());
    }

    #[test]
    fn test_coordinate_display() {
        assert_eq!(GIZA.to_string(), "29.9773°N, 31.1325°E");
        assert_eq!(Coordinate::new(-33.8688, -70.5).to_string(), "33.8688°S, 70.5000°W");
    }

    #[test]
    fn test_failure_lists_cities_when_table_only() {
        let failure = ResolutionFailure {
            city: "Atlantis".into(),
            supported: Some(vec!["London".into(), "Paris".into()]),
        };
        let msg = failure.to_string();
        assert!(msg.contains("Atlantis"));
        assert!(msg.contains("London, Paris"));
    }

    #[test]
    fn test_failure_without_city_list() {
        let failure = ResolutionFailure { city: "Atlantis".into(), supported: None };
        assert_eq!(failure.to_string(), "Could not find coordinates for Atlantis.");
    }

    #[test]
    fn test_only_not_found_is_definitive() {
        assert!(GeoError::NotFound("x".into()).is_definitive());
        assert!(!GeoError::Network("timeout".into()).is_definitive());
        assert!(!GeoError::Status(503).is_definitive());
    }
}

//! Great-circle distance from the reference point.
//!
//! Haversine on a sphere of radius 6371 km, used for both resolution chains
//! so expected values do not depend on which chain is configured.

use crate::geo::{title_case, Chain, Coordinate, GeoTable, ResolutionFailure, Resolver, GIZA, REFERENCE_NAME};
use serde::Serialize;
use std::fmt;

/// Mean Earth radius.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Miles are derived, not measured: km / 1.609.
pub const KM_PER_MILE: f64 = 1.609;

/// Haversine distance between two coordinates, in kilometers.
pub fn great_circle_distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (dlon / 2.0).sin().powi(2);

    // Rounding can push h a hair past 1 for antipodal points.
    let h = h.clamp(0.0, 1.0);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// A city's distance from the reference point in both unit systems.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceResult {
    pub city: String,
    pub km: f64,
    pub miles: f64,
}

impl DistanceResult {
    pub fn new(city: impl Into<String>, km: f64) -> Self {
        Self {
            city: city.into(),
            km,
            miles: km / KM_PER_MILE,
        }
    }
}

impl fmt::Display for DistanceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Distance from {} to {}: {:.2} kilometers ({:.2} miles)",
            self.city, REFERENCE_NAME, self.km, self.miles
        )
    }
}

/// Resolves cities and measures them against a fixed reference point.
pub struct DistanceEngine {
    resolver: Box<dyn Resolver>,
    reference: Coordinate,
}

impl DistanceEngine {
    pub fn new(resolver: Box<dyn Resolver>) -> Self {
        Self { resolver, reference: GIZA }
    }

    pub fn resolve_coordinates(&self, city: &str) -> Result<Coordinate, ResolutionFailure> {
        self.resolver.resolve(city)
    }

    pub fn distance_from_reference(&self, city: &str) -> Result<DistanceResult, ResolutionFailure> {
        let coord = self.resolve_coordinates(city)?;
        let km = great_circle_distance_km(coord, self.reference);
        Ok(DistanceResult::new(title_case(city), km))
    }

    /// The user-facing line for `city`: the distance, or why there is none.
    pub fn describe(&self, city: &str) -> String {
        match self.distance_from_reference(city) {
            Ok(result) => result.to_string(),
            Err(failure) => failure.to_string(),
        }
    }

    pub fn chain(&self) -> Chain {
        self.resolver.chain()
    }

    pub fn table(&self) -> &GeoTable {
        self.resolver.table()
    }
}

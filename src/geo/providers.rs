//! Live geocoding providers.

use super::types::{Coordinate, GeoError};
use crate::http;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Turns a place name into a single best-match coordinate.
pub trait Geocoder {
    /// `Err(GeoError::NotFound)` means the provider affirmatively has no
    /// result; every other error is transient.
    fn geocode(&self, name: &str) -> Result<Coordinate, GeoError>;
}

// ─── Nominatim provider ─────────────────────────────────────────

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// Nominatim's usage policy requires an identifying client string.
pub const DEFAULT_GEOCODER_USER_AGENT: &str = "giza_agent";

#[derive(Deserialize, Debug, Clone)]
struct NominatimResult {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// OpenStreetMap Nominatim, one result per query, no retries.
pub struct NominatimGeocoder {
    agent: ureq::Agent,
    base_url: String,
    user_agent: String,
}

impl NominatimGeocoder {
    pub fn new(base_url: impl Into<String>, user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            agent: http::build_agent(timeout),
            base_url: base_url.into(),
            user_agent: user_agent.into(),
        }
    }
}

impl Default for NominatimGeocoder {
    fn default() -> Self {
        Self::new(DEFAULT_NOMINATIM_URL, DEFAULT_GEOCODER_USER_AGENT, Duration::from_secs(10))
    }
}

impl Geocoder for NominatimGeocoder {
    fn geocode(&self, name: &str) -> Result<Coordinate, GeoError> {
        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        debug!(%url, query = name, "geocoding request");

        let response = self
            .agent
            .get(&url)
            .set("User-Agent", &self.user_agent)
            .query("q", name)
            .query("format", "json")
            .query("limit", "1")
            .call()
            .map_err(|e| match e {
                ureq::Error::Status(code, _) => GeoError::Status(code),
                other => GeoError::Network(http::describe_error(&other)),
            })?;

        let body = response
            .into_string()
            .map_err(|e| GeoError::Network(e.to_string()))?;

        parse_first_result(&body, name)
    }
}

/// Parse a Nominatim JSON array and take the first hit.
fn parse_first_result(body: &str, query: &str) -> Result<Coordinate, GeoError> {
    let results: Vec<NominatimResult> =
        serde_json::from_str(body).map_err(|e| GeoError::InvalidResponse(e.to_string()))?;

    let top = results
        .into_iter()
        .next()
        .ok_or_else(|| GeoError::NotFound(query.to_string()))?;

    let lat: f64 = top
        .lat
        .parse()
        .map_err(|_| GeoError::InvalidResponse(format!("bad latitude '{}'", top.lat)))?;
    let lon: f64 = top
        .lon
        .parse()
        .map_err(|_| GeoError::InvalidResponse(format!("bad longitude '{}'", top.lon)))?;

    let coord = Coordinate::new(lat, lon);
    if !coord.is_valid() {
        return Err(GeoError::InvalidResponse(format!("out-of-range coordinate {}, {}", lat, lon)));
    }

    debug!(
        query,
        place = top.display_name.as_deref().unwrap_or("?"),
        lat,
        lon,
        "geocoder hit"
    );
    Ok(coord)
}

//! Static city → coordinate table, the last-resort coordinate source.
//!
//! Keys are normalized (trimmed, lowercase). Iteration follows declaration
//! order, which the known-city scan in the intent parser relies on.

use super::types::{Coordinate, GIZA};

// ─── Built-in dataset ───────────────────────────────────────────

const WORLD_CITIES: &[(&str, f64, f64)] = &[
    ("new york", 40.7128, -74.0060),
    ("london", 51.5074, -0.1278),
    ("paris", 48.8566, 2.3522),
    ("tokyo", 35.6762, 139.6503),
    ("sydney", -33.8688, 151.2093),
    ("cairo", 30.0444, 31.2357),
    ("giza", 29.9773, 31.1325),
    ("beijing", 39.9042, 116.4074),
    ("moscow", 55.7558, 37.6173),
    ("dubai", 25.2048, 55.2708),
    ("los angeles", 34.0522, -118.2437),
    ("chicago", 41.8781, -87.6298),
    ("toronto", 43.6532, -79.3832),
    ("mexico city", 19.4326, -99.1332),
    ("sao paulo", -23.5505, -46.6333),
    ("mumbai", 19.0760, 72.8777),
    ("singapore", 1.3521, 103.8198),
    ("berlin", 52.5200, 13.4050),
    ("rome", 41.9028, 12.4964),
    ("madrid", 40.4168, -3.7038),
    ("amsterdam", 52.3676, 4.9041),
    ("bangkok", 13.7563, 100.5018),
    ("seoul", 37.5665, 126.9780),
    ("johannesburg", -26.2041, 28.0473),
    ("istanbul", 41.0082, 28.9784),
    ("rio de janeiro", -22.9068, -43.1729),
    ("san francisco", 37.7749, -122.4194),
    ("barcelona", 41.3851, 2.1734),
    ("vienna", 48.2082, 16.3738),
    ("athens", 37.9838, 23.7275),
];

/// Normalize a city name into a table key.
pub fn normalize_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// "rio de janeiro" → "Rio De Janeiro".
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Immutable lookup table of normalized city names.
#[derive(Debug, Clone)]
pub struct GeoTable {
    entries: Vec<(String, Coordinate)>,
}

impl GeoTable {
    /// The 30-city table used when no live geocoder is configured.
    pub fn world() -> Self {
        Self::from_entries(
            WORLD_CITIES
                .iter()
                .map(|&(name, lat, lon)| (name, Coordinate::new(lat, lon))),
        )
    }

    /// Only the reference point itself. Used behind a live geocoder.
    pub fn reference_only() -> Self {
        Self::from_entries([("giza", GIZA)])
    }

    /// Build a table from arbitrary entries. Keys are normalized; a repeated
    /// key replaces the earlier coordinate but keeps its position.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Coordinate)>,
        S: AsRef<str>,
    {
        let mut table: Vec<(String, Coordinate)> = Vec::new();
        for (name, coord) in entries {
            let key = normalize_key(name.as_ref());
            if key.is_empty() {
                continue;
            }
            match table.iter_mut().find(|(k, _)| *k == key) {
                Some(existing) => existing.1 = coord,
                None => table.push((key, coord)),
            }
        }
        Self { entries: table }
    }

    /// Exact match on the normalized name. No fuzzy or partial matching.
    pub fn lookup(&self, name: &str) -> Option<Coordinate> {
        let key = normalize_key(name);
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|&(_, coord)| coord)
    }

    /// Keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Title-cased city names, in declaration order.
    pub fn display_names(&self) -> Vec<String> {
        self.keys().map(title_case).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

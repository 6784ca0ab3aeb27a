//! Coordinate resolvers: the two resolution chains.
//!
//! Table chain:     built-in table → error
//! Geocoding chain: geocoder (single round trip) → built-in table → error

use super::providers::Geocoder;
use super::table::{title_case, GeoTable};
use super::types::{Coordinate, ResolutionFailure};
use tracing::{debug, warn};

/// Which resolution chain a resolver implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chain {
    /// Static table only.
    TableOnly,
    /// Live geocoder first, table as fallback.
    Geocoding,
}

/// Resolves a city name to a single coordinate.
pub trait Resolver {
    fn resolve(&self, city: &str) -> Result<Coordinate, ResolutionFailure>;

    fn chain(&self) -> Chain;

    /// The table backing this resolver.
    fn table(&self) -> &GeoTable;
}

// ─── Table chain ────────────────────────────────────────────────

pub struct TableResolver {
    table: GeoTable,
}

impl TableResolver {
    pub fn new(table: GeoTable) -> Self {
        Self { table }
    }
}

impl Resolver for TableResolver {
    fn resolve(&self, city: &str) -> Result<Coordinate, ResolutionFailure> {
        self.table.lookup(city).ok_or_else(|| ResolutionFailure {
            city: title_case(city),
            supported: Some(self.table.display_names()),
        })
    }

    fn chain(&self) -> Chain {
        Chain::TableOnly
    }

    fn table(&self) -> &GeoTable {
        &self.table
    }
}

// ─── Geocoding chain ────────────────────────────────────────────

pub struct GeocodingResolver {
    geocoder: Box<dyn Geocoder>,
    table: GeoTable,
}

impl GeocodingResolver {
    pub fn new(geocoder: Box<dyn Geocoder>, table: GeoTable) -> Self {
        Self { geocoder, table }
    }
}

impl Resolver for GeocodingResolver {
    fn resolve(&self, city: &str) -> Result<Coordinate, ResolutionFailure> {
        match self.geocoder.geocode(city) {
            Ok(coord) => {
                debug!(city, source = "geocoder", "resolved");
                return Ok(coord);
            }
            Err(e) if e.is_definitive() => {
                debug!(city, "geocoder has no match, trying table");
            }
            Err(e) => {
                warn!(city, error = %e, "geocoder failed, trying table");
            }
        }

        match self.table.lookup(city) {
            Some(coord) => {
                debug!(city, source = "table", "resolved");
                Ok(coord)
            }
            None => Err(ResolutionFailure {
                city: title_case(city),
                supported: None,
            }),
        }
    }

    fn chain(&self) -> Chain {
        Chain::Geocoding
    }

    fn table(&self) -> &GeoTable {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::types::{GeoError, GIZA};
    use std::cell::Cell;
    use std::rc::Rc;

    /// Scripted geocoder that counts its calls.
    struct StubGeocoder {
        answer: fn(&str) -> Result<Coordinate, GeoError>,
        calls: Rc<Cell<usize>>,
    }

    impl StubGeocoder {
        fn boxed(answer: fn(&str) -> Result<Coordinate, GeoError>) -> Box<Self> {
            Box::new(Self { answer, calls: Rc::new(Cell::new(0)) })
        }
    }

    impl Geocoder for StubGeocoder {
        fn geocode(&self, name: &str) -> Result<Coordinate, GeoError> {
            self.calls.set(self.calls.get() + 1);
            (self.answer)(name)
        }
    }

    #[test]
    fn test_table_resolver_hit() {
        let resolver = TableResolver::new(GeoTable::world());
        let coord = resolver.resolve("Tokyo").unwrap();
        assert!((coord.lat - 35.6762).abs() < 1e-9);
        assert_eq!(resolver.chain(), Chain::TableOnly);
    }

    #[test]
    fn test_table_resolver_miss_lists_cities() {
        let resolver = TableResolver::new(GeoTable::world());
        let failure = resolver.resolve("  Gotham ").unwrap_err();
        assert_eq!(failure.city, "Gotham");
        let supported = failure.supported.unwrap();
        assert_eq!(supported.len(), 30);
        assert!(supported.contains(&"London".to_string()));
    }

    #[test]
    fn test_geocoder_hit_wins() {
        let resolver = GeocodingResolver::new(
            StubGeocoder::boxed(|_| Ok(Coordinate::new(10.0, 20.0))),
            GeoTable::reference_only(),
        );
        assert_eq!(resolver.resolve("giza").unwrap(), Coordinate::new(10.0, 20.0));
        assert_eq!(resolver.chain(), Chain::Geocoding);
    }

    #[test]
    fn test_definitive_miss_falls_back_to_table() {
        let resolver = GeocodingResolver::new(
            StubGeocoder::boxed(|n| Err(GeoError::NotFound(n.to_string()))),
            GeoTable::reference_only(),
        );
        assert_eq!(resolver.resolve("Giza").unwrap(), GIZA);
    }

    #[test]
    fn test_transient_error_falls_back_to_table() {
        let resolver = GeocodingResolver::new(
            StubGeocoder::boxed(|_| Err(GeoError::Network("timed out".into()))),
            GeoTable::world(),
        );
        let coord = resolver.resolve("paris").unwrap();
        assert!((coord.lat - 48.8566).abs() < 1e-9);
    }

    #[test]
    fn test_both_sources_fail() {
        let resolver = GeocodingResolver::new(
            StubGeocoder::boxed(|_| Err(GeoError::Status(429))),
            GeoTable::reference_only(),
        );
        let failure = resolver.resolve("Atlantis").unwrap_err();
        assert_eq!(failure.city, "Atlantis");
        assert!(failure.supported.is_none());
    }

    #[test]
    fn test_failure_city_is_title_cased() {
        let table = TableResolver::new(GeoTable::world());
        assert_eq!(table.resolve("gotham city").unwrap_err().city, "Gotham City");

        let geocoding = GeocodingResolver::new(
            StubGeocoder::boxed(|_| Err(GeoError::NotFound("lima".into()))),
            GeoTable::reference_only(),
        );
        assert_eq!(geocoding.resolve(" lima ").unwrap_err().city, "Lima");
    }

    #[test]
    fn test_geocoder_called_once_per_resolution() {
        let stub = StubGeocoder::boxed(|_| Err(GeoError::Network("reset".into())));
        let calls = Rc::clone(&stub.calls);
        let resolver = GeocodingResolver::new(stub, GeoTable::reference_only());
        let _ = resolver.resolve("Atlantis");
        assert_eq!(calls.get(), 1);
    }
}

//! Coordinate resolution subsystem.
//!
//! Resolves free-text city names to coordinates, either from the static
//! built-in table alone or from Nominatim with the table as a safety net.

pub mod providers;
pub mod resolver;
pub mod table;
pub mod types;

pub use providers::{Geocoder, NominatimGeocoder};
pub use resolver::{Chain, GeocodingResolver, Resolver, TableResolver};
pub use table::{title_case, GeoTable};
pub use types::{Coordinate, GeoError, ResolutionFailure, GIZA, REFERENCE_NAME};

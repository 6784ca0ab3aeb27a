//! Weather and distance-from-Giza query engine.
//!
//! Answers natural-language questions either through an Ollama-backed agent
//! (with weather, distance and calculator tools) or, when no model server is
//! reachable, through a deterministic rule-based processor.

pub mod agent;
pub mod config;
pub mod dispatcher;
pub mod distance;
pub mod geo;
pub mod http;
pub mod intent;
pub mod weather;

pub use dispatcher::{Mode, QueryDispatcher};
pub use distance::{DistanceEngine, DistanceResult};
pub use geo::{Coordinate, GeoTable};

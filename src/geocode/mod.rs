//! Geocoding subsystem for Routecraft.
//!
//! Resolves free-text delivery addresses to coordinates via Nominatim,
//! with a deterministic synthetic fallback for anything the geocoder
//! cannot answer.

pub mod provider;
pub mod resolver;
pub mod types;

pub use resolver::{CoordinateResolver, DEFAULT_TIMEOUT, MIN_LOOKUP_INTERVAL};
pub use types::{CoordSource, GeocodeError, RegionBase, ResolvedCoord};

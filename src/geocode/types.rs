//! Core types for the geocoding subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a point's coordinates were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordSource {
    /// Supplied by the caller; treated as authoritative.
    Provided,
    /// First candidate from a Nominatim lookup.
    Nominatim,
    /// Deterministic hash-derived fallback around the region base.
    Synthetic,
}

impl fmt::Display for CoordSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provided => write!(f, "Provided"),
            Self::Nominatim => write!(f, "Nominatim"),
            Self::Synthetic => write!(f, "Synthetic"),
        }
    }
}

/// A resolved coordinate pair with provenance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedCoord {
    pub lat: f64,
    pub lon: f64,
    pub source: CoordSource,
}

/// The fixed coordinate the synthetic fallback scatters around.
///
/// A deployment serves one region; addresses that cannot be geocoded land
/// within about 11 km of this base.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionBase {
    pub lat: f64,
    pub lon: f64,
}

impl Default for RegionBase {
    /// Fortaleza, the reference deployment's service region.
    fn default() -> Self {
        Self { lat: -3.7, lon: -38.5 }
    }
}

/// Geocoding errors.
///
/// Lookup failures never surface past the resolver; everything except a
/// blank address degrades to the synthetic fallback.
#[derive(Debug)]
pub enum GeocodeError {
    /// The address string is empty or whitespace.
    EmptyAddress,
    Network(String),
    NoResults(String),
    InvalidResponse(String),
}

impl fmt::Display for GeocodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyAddress => write!(f, "Address must not be empty"),
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::NoResults(q) => write!(f, "No geocoding candidates for '{}'", q),
            Self::InvalidResponse(msg) => write!(f, "Invalid geocoder response: {}", msg),
        }
    }
}

impl std::error::Error for GeocodeError {}

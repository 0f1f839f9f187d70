//! The Optimizer, primary public API for Routecraft.
//!
//! Validates input, fills in missing coordinates through the resolver, and
//! hands the fully resolved list to the tour builder. Each call is a pure
//! transformation of its input; caller-owned data is never mutated and no
//! state is shared between invocations beyond the resolver's pacing clock.

use crate::geocode::{CoordSource, CoordinateResolver};
use crate::tour::{self, ResolvedPoint, TourStop};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A delivery point as supplied by the caller.
///
/// A point is a value, not an entity: it has no identity beyond its
/// address within one optimization call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryPoint {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl DeliveryPoint {
    /// Both coordinates, when the caller supplied both.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// A point in the optimized output.
///
/// Coordinates, provenance, and order are all present on the normal path;
/// they stay absent only in the degenerate pass-through of sub-minimal
/// input, which echoes the caller's points untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutedPoint {
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<CoordSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

impl RoutedPoint {
    fn passthrough(point: &DeliveryPoint) -> Self {
        Self {
            name: point.name.clone(),
            address: point.address.clone(),
            latitude: point.latitude,
            longitude: point.longitude,
            source: None,
            order: None,
        }
    }

    fn from_stop(stop: TourStop) -> Self {
        Self {
            name: stop.point.name,
            address: stop.point.address,
            latitude: Some(stop.point.latitude),
            longitude: Some(stop.point.longitude),
            source: Some(stop.point.source),
            order: Some(stop.order),
        }
    }
}

/// The full result of one optimization call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizedRoute {
    pub optimized_points: Vec<RoutedPoint>,
    /// Total distance in km (sum of 1-decimal-rounded legs).
    pub total_distance: f64,
    /// Estimated duration in minutes.
    pub total_duration: i64,
    /// Estimated emissions in kg CO2.
    pub carbon_footprint: f64,
}

/// Optimization errors surfaced to the caller.
#[derive(Debug)]
pub enum OptimizeError {
    /// A point is missing a required field. Rejected before any work.
    InvalidPoint { index: usize, field: &'static str },
    /// Unexpected computation failure, fatal to this request.
    Internal(String),
}

impl fmt::Display for OptimizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPoint { index, field } => {
                write!(f, "Point {} is missing a {}", index + 1, field)
            }
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for OptimizeError {}

/// The optimization engine.
pub struct Optimizer {
    resolver: CoordinateResolver,
}

impl Optimizer {
    pub fn new() -> Self {
        Self { resolver: CoordinateResolver::new() }
    }

    /// Create an optimizer around a pre-configured resolver.
    pub fn with_resolver(resolver: CoordinateResolver) -> Self {
        Self { resolver }
    }

    /// Optimize a set of delivery points into a visiting order with travel
    /// metrics.
    ///
    /// Fewer than two points is not an error here: the input is echoed
    /// back with zero metrics and neither the resolver nor the builder
    /// runs. Outer layers that require a meaningful result (the HTTP
    /// handler) reject sub-minimal input themselves.
    pub fn optimize(&mut self, points: &[DeliveryPoint]) -> Result<OptimizedRoute, OptimizeError> {
        validate(points)?;

        if points.len() < 2 {
            return Ok(OptimizedRoute {
                optimized_points: points.iter().map(RoutedPoint::passthrough).collect(),
                total_distance: 0.0,
                total_duration: 0,
                carbon_footprint: 0.0,
            });
        }

        let resolved = self.resolve_all(points)?;

        // Contract check: the builder must only ever see real numbers.
        for point in &resolved {
            if !point.latitude.is_finite() || !point.longitude.is_finite() {
                return Err(OptimizeError::Internal(format!(
                    "non-finite coordinates for '{}'",
                    point.address,
                )));
            }
        }

        let (stops, metrics) = tour::build_tour(&resolved);

        eprintln!(
            "Route built: {} stops, {} km, {} min, {} kg CO2",
            stops.len(), metrics.total_distance, metrics.total_duration, metrics.carbon_footprint,
        );

        Ok(OptimizedRoute {
            optimized_points: stops.into_iter().map(RoutedPoint::from_stop).collect(),
            total_distance: metrics.total_distance,
            total_duration: metrics.total_duration,
            carbon_footprint: metrics.carbon_footprint,
        })
    }

    /// Annotate every point with coordinates. Caller-supplied coordinates
    /// are authoritative and skip the resolver entirely; the rest go
    /// through it one at a time, in input order.
    fn resolve_all(&mut self, points: &[DeliveryPoint]) -> Result<Vec<ResolvedPoint>, OptimizeError> {
        let total = points.len();
        let mut resolved = Vec::with_capacity(total);

        for (i, point) in points.iter().enumerate() {
            let (latitude, longitude, source) = match point.coordinates() {
                Some((lat, lon)) => (lat, lon, CoordSource::Provided),
                None => {
                    eprintln!("  [{}/{}] resolving coordinates for: {}", i + 1, total, point.address);
                    let coord = self
                        .resolver
                        .resolve(&point.address)
                        // Validation already excluded blank addresses, and
                        // every lookup failure falls back internally.
                        .map_err(|e| OptimizeError::Internal(e.to_string()))?;
                    (coord.lat, coord.lon, coord.source)
                }
            };
            resolved.push(ResolvedPoint {
                name: point.name.clone(),
                address: point.address.clone(),
                latitude,
                longitude,
                source,
            });
        }

        Ok(resolved)
    }
}

impl Default for Optimizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject points with a blank name or address before any work begins.
fn validate(points: &[DeliveryPoint]) -> Result<(), OptimizeError> {
    for (i, point) in points.iter().enumerate() {
        if point.name.trim().is_empty() {
            return Err(OptimizeError::InvalidPoint { index: i, field: "name" });
        }
        if point.address.trim().is_empty() {
            return Err(OptimizeError::InvalidPoint { index: i, field: "address" });
        }
    }
    Ok(())
}

//! Nearest-neighbor tour construction and travel metrics.
//!
//! Greedy construction: anchor on the first input point, then always hop to
//! the closest remaining point. O(N^2), never backtracks. The classic
//! nearest-neighbor pathology (a far point left for last at high cost) is
//! accepted behavior; this is a heuristic baseline, not an exact TSP solver.

use crate::geo;
use crate::geocode::CoordSource;

/// Assumed average travel speed for duration estimates, km/h.
const AVG_SPEED_KMH: f64 = 50.0;
/// Fixed dwell time per stop, minutes. The start point counts as a stop.
const STOP_MINUTES: i64 = 5;
/// Emission factor for an average delivery vehicle, kg CO2 per km.
const CO2_KG_PER_KM: f64 = 0.21;

/// A delivery point with guaranteed coordinates.
///
/// Invariant: everything entering [`build_tour`] carries real coordinates;
/// filling them in is the resolver's job, upstream.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPoint {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub source: CoordSource,
}

/// A resolved point with its 1-based position in the tour.
#[derive(Debug, Clone)]
pub struct TourStop {
    pub point: ResolvedPoint,
    pub order: u32,
}

/// Aggregate travel metrics for one tour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TourMetrics {
    /// Total distance in km: the sum of per-leg distances, each leg already
    /// rounded to one decimal.
    pub total_distance: f64,
    /// Estimated duration in whole minutes.
    pub total_duration: i64,
    /// Estimated emissions in kg CO2, rounded to two decimals.
    pub carbon_footprint: f64,
}

impl TourMetrics {
    pub const ZERO: TourMetrics = TourMetrics {
        total_distance: 0.0,
        total_duration: 0,
        carbon_footprint: 0.0,
    };
}

fn leg(a: &ResolvedPoint, b: &ResolvedPoint) -> f64 {
    geo::leg_distance_km(a.latitude, a.longitude, b.latitude, b.longitude)
}

/// Travel time at [`AVG_SPEED_KMH`] plus a fixed dwell per stop.
fn estimate_duration(total_distance: f64, stop_count: usize) -> i64 {
    (total_distance / AVG_SPEED_KMH * 60.0).floor() as i64 + STOP_MINUTES * stop_count as i64
}

/// Build a visiting order over `points` with the nearest-neighbor heuristic.
///
/// The first input point is the fixed anchor and keeps `order = 1` whether
/// or not it is a geographically good start. Ties on minimum distance go to
/// the earliest point in pool order, so construction is deterministic.
///
/// Fewer than two points is handled defensively: the input comes back
/// unchanged with zero metrics.
pub fn build_tour(points: &[ResolvedPoint]) -> (Vec<TourStop>, TourMetrics) {
    if points.len() < 2 {
        let stops = number_stops(points.to_vec());
        return (stops, TourMetrics::ZERO);
    }

    let mut pool: Vec<ResolvedPoint> = points[1..].to_vec();
    let mut ordered: Vec<ResolvedPoint> = Vec::with_capacity(points.len());
    let mut current = points[0].clone();
    ordered.push(current.clone());

    let mut total_distance = 0.0;

    while !pool.is_empty() {
        let mut best = 0;
        let mut best_dist = leg(&current, &pool[0]);
        for (i, candidate) in pool.iter().enumerate().skip(1) {
            let d = leg(&current, candidate);
            if d < best_dist {
                best = i;
                best_dist = d;
            }
        }
        total_distance += best_dist;
        current = pool.remove(best);
        ordered.push(current.clone());
    }

    let metrics = TourMetrics {
        total_distance,
        total_duration: estimate_duration(total_distance, points.len()),
        carbon_footprint: geo::round2(total_distance * CO2_KG_PER_KM),
    };

    (number_stops(ordered), metrics)
}

/// Assign `order = position + 1` over a finished sequence.
fn number_stops(ordered: Vec<ResolvedPoint>) -> Vec<TourStop> {
    ordered
        .into_iter()
        .enumerate()
        .map(|(i, point)| TourStop { point, order: i as u32 + 1 })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pt(name: &str, lat: f64, lon: f64) -> ResolvedPoint {
        ResolvedPoint {
            name: name.into(),
            address: format!("{} street", name),
            latitude: lat,
            longitude: lon,
            source: CoordSource::Provided,
        }
    }

    fn names(stops: &[TourStop]) -> Vec<&str> {
        stops.iter().map(|s| s.point.name.as_str()).collect()
    }

    #[test]
    fn test_orders_are_contiguous_from_one() {
        let points = vec![
            pt("a", 0.0, 0.0),
            pt("b", 0.3, 0.1),
            pt("c", 0.1, 0.2),
            pt("d", 0.2, 0.0),
        ];
        let (stops, _) = build_tour(&points);
        assert_eq!(stops.len(), 4);
        let orders: Vec<u32> = stops.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_point_set_preserved() {
        let points = vec![
            pt("a", 0.0, 0.0),
            pt("b", 0.3, 0.1),
            pt("c", 0.1, 0.2),
        ];
        let (stops, _) = build_tour(&points);
        let mut addresses: Vec<&str> =
            stops.iter().map(|s| s.point.address.as_str()).collect();
        addresses.sort_unstable();
        assert_eq!(addresses, vec!["a street", "b street", "c street"]);
    }

    #[test]
    fn test_anchor_keeps_first_input_point() {
        // "far" would be a better start, but the anchor is fixed.
        let points = vec![
            pt("far", 1.0, 0.0),
            pt("near1", 0.0, 0.0),
            pt("near2", 0.01, 0.0),
        ];
        let (stops, _) = build_tour(&points);
        assert_eq!(stops[0].point.name, "far");
        assert_eq!(stops[0].order, 1);
    }

    #[test]
    fn test_nearest_neighbor_on_a_line() {
        // Legs along a meridian: a->b 5.0 km, b->c 6.0 km (a->c is 11.0,
        // so greedy must hop through b).
        let points = vec![
            pt("a", 0.0, 0.0),
            pt("c", 0.099, 0.0),
            pt("b", 0.045, 0.0),
        ];
        let (stops, metrics) = build_tour(&points);
        assert_eq!(names(&stops), vec!["a", "b", "c"]);
        assert_eq!(metrics.total_distance, 11.0);
    }

    #[test]
    fn test_total_is_sum_of_rounded_legs() {
        // Legs: a->b 1.1 km, b->c 2.2 km. The total is the sum of the
        // rounded legs, not a rounding of the raw sum.
        let points = vec![
            pt("a", 0.0, 0.0),
            pt("b", 0.01, 0.0),
            pt("c", -0.01, 0.0),
        ];
        let (stops, metrics) = build_tour(&points);
        assert_eq!(names(&stops), vec!["a", "b", "c"]);
        assert_relative_eq!(metrics.total_distance, 3.3, epsilon = 1e-9);
    }

    #[test]
    fn test_tie_break_is_first_in_pool_order() {
        // b and c are both 1.1 km from a; b comes first in the pool.
        let points = vec![
            pt("a", 0.0, 0.0),
            pt("b", 0.01, 0.0),
            pt("c", -0.01, 0.0),
        ];
        let (stops, _) = build_tour(&points);
        assert_eq!(names(&stops), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_metrics_for_line_tour() {
        let points = vec![
            pt("a", 0.0, 0.0),
            pt("c", 0.099, 0.0),
            pt("b", 0.045, 0.0),
        ];
        let (_, metrics) = build_tour(&points);
        // 11.0 km at 50 km/h is 13.2 min, floored, plus 3 stops of 5 min.
        assert_eq!(metrics.total_duration, 28);
        assert_eq!(metrics.carbon_footprint, 2.31);
    }

    #[test]
    fn test_duration_estimate() {
        assert_eq!(estimate_duration(10.0, 3), 27);
        assert_eq!(estimate_duration(10.4, 2), 22); // 12.48 floors to 12
        assert_eq!(estimate_duration(0.0, 1), 5);
    }

    #[test]
    fn test_single_point_passthrough() {
        let points = vec![pt("only", -3.7, -38.5)];
        let (stops, metrics) = build_tour(&points);
        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].order, 1);
        assert_eq!(stops[0].point, points[0]);
        assert_eq!(metrics, TourMetrics::ZERO);
    }

    #[test]
    fn test_empty_input() {
        let (stops, metrics) = build_tour(&[]);
        assert!(stops.is_empty());
        assert_eq!(metrics, TourMetrics::ZERO);
    }

    #[test]
    fn test_greedy_can_be_suboptimal() {
        // From a, greedy grabs the near pair first and pays a long hop
        // back out to d. That is the documented heuristic limitation.
        let points = vec![
            pt("a", 0.0, 0.0),
            pt("d", -0.05, 0.0),
            pt("b", 0.01, 0.0),
            pt("c", 0.02, 0.0),
        ];
        let (stops, _) = build_tour(&points);
        assert_eq!(names(&stops), vec!["a", "b", "c", "d"]);
    }
}

//! Great-circle geometry and rounding primitives.

use std::f64::consts::PI;

const DEG: f64 = PI / 180.0;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two coordinate pairs, in kilometres,
/// rounded to one decimal place.
///
/// Rounding happens per leg, BEFORE any accumulation. Tour totals are sums
/// of already-rounded legs, so the rounding error compounds leg by leg;
/// callers that need reference-compatible totals must not sum raw values
/// and round once at the end.
pub fn leg_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1 * DEG;
    let phi2 = lat2 * DEG;
    let delta_phi = (lat2 - lat1) * DEG;
    let delta_lambda = (lon2 - lon1) * DEG;

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    round1(EARTH_RADIUS_KM * c)
}

/// Round to one decimal place (leg distances).
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Round to two decimal places (emission figures).
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Round to six decimal places (coordinate precision, about 0.1 m).
pub fn round6(x: f64) -> f64 {
    (x * 1e6).round() / 1e6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_zero_for_same_point() {
        assert_eq!(leg_distance_km(-3.7, -38.5, -3.7, -38.5), 0.0);
        assert_eq!(leg_distance_km(59.3293, 18.0686, 59.3293, 18.0686), 0.0);
    }

    #[test]
    fn test_distance_symmetric() {
        let pairs = [
            ((-3.7, -38.5), (-3.71, -38.52)),
            ((0.0, 0.0), (0.099, 0.0)),
            ((59.3293, 18.0686), (55.7558, 37.6173)),
        ];
        for ((lat1, lon1), (lat2, lon2)) in pairs {
            assert_eq!(
                leg_distance_km(lat1, lon1, lat2, lon2),
                leg_distance_km(lat2, lon2, lat1, lon1),
            );
        }
    }

    #[test]
    fn test_distance_short_leg() {
        // Two points about 2.5 km apart in the default service region.
        assert_eq!(leg_distance_km(-3.7, -38.5, -3.71, -38.52), 2.5);
    }

    #[test]
    fn test_distance_tenth_degree_of_latitude() {
        // 0.1 degrees of latitude is 11.119 km on a 6371 km sphere.
        assert_eq!(leg_distance_km(-3.7, -38.5, -3.8, -38.5), 11.1);
    }

    #[test]
    fn test_distance_rounded_to_one_decimal() {
        let d = leg_distance_km(0.0, 0.0, 0.045, 0.0);
        assert_eq!(d, 5.0);
        assert_eq!((d * 10.0).fract(), 0.0);
    }

    #[test]
    fn test_round_helpers() {
        assert_eq!(round1(2.48224), 2.5);
        assert_eq!(round1(2.44), 2.4);
        assert_eq!(round2(1.617), 1.62);
        assert_eq!(round2(2.1), 2.1);
        assert_eq!(round6(-3.6968004999), -3.6968);
    }
}

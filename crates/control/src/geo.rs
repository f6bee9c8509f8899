//! Geodesic helpers
//!
//! Pure functions over latitude/longitude in degrees. Angles returned are
//! radians in the navigational convention (0 = North, clockwise).

use std::f64::consts::{PI, TAU};

/// Mean Earth radius used by the haversine formula (m).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two positions using the haversine formula.
///
/// # Returns
///
/// Distance in meters
pub fn distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let sin_dlat = (delta_lat / 2.0).sin();
    let sin_dlon = (delta_lon / 2.0).sin();
    let a = sin_dlat * sin_dlat + lat1_rad.cos() * lat2_rad.cos() * sin_dlon * sin_dlon;
    let c = 2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt());

    EARTH_RADIUS_M * c
}

/// Initial bearing (forward azimuth) from point 1 to point 2.
///
/// # Returns
///
/// Bearing in radians, normalized to [0, 2π)
pub fn bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let y = delta_lon.sin() * lat2_rad.cos();
    let x = lat1_rad.cos() * lat2_rad.sin() - lat1_rad.sin() * lat2_rad.cos() * delta_lon.cos();

    wrap_two_pi(y.atan2(x))
}

/// Normalize an angle to [-π, π].
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    wrapped.clamp(-PI, PI)
}

/// Normalize an angle to [0, 2π).
pub fn wrap_two_pi(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Signed perpendicular distance from `(lat, lon)` to the track running from
/// `(start_lat, start_lon)` toward `(end_lat, end_lon)`.
///
/// Positive when the point lies to starboard (right) of the track.
pub fn cross_track_error(
    start_lat: f64,
    start_lon: f64,
    end_lat: f64,
    end_lon: f64,
    lat: f64,
    lon: f64,
) -> f64 {
    let from_start = distance(start_lat, start_lon, lat, lon);
    if from_start <= f64::EPSILON {
        return 0.0;
    }

    let track_bearing = bearing(start_lat, start_lon, end_lat, end_lon);
    let bearing_to_point = bearing(start_lat, start_lon, lat, lon);

    wrap_angle(bearing_to_point - track_bearing).sin() * from_start
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_distance_same_point_is_zero() {
        assert_eq!(distance(50.88, -1.38, 50.88, -1.38), 0.0);
    }

    #[test]
    fn test_distance_thousandth_degree_latitude() {
        let d = distance(50.88, -1.38, 50.881, -1.38);
        assert_abs_diff_eq!(d, 111.1, epsilon = 0.5);
    }

    #[test]
    fn test_distance_one_degree_latitude() {
        let d = distance(35.0, 139.0, 36.0, 139.0);
        assert!((d - 111_000.0).abs() < 1000.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = distance(50.88, -1.38, 50.8812, -1.3765);
        let b = distance(50.8812, -1.3765, 50.88, -1.38);
        assert_relative_eq!(a, b, epsilon = 1e-9);
    }

    #[test]
    fn test_bearing_north() {
        assert_abs_diff_eq!(bearing(0.0, 0.0, 1.0, 0.0), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bearing_east() {
        assert_abs_diff_eq!(bearing(0.0, 0.0, 0.0, 1.0), FRAC_PI_2, epsilon = 1e-9);
    }

    #[test]
    fn test_bearing_south() {
        assert_abs_diff_eq!(bearing(36.0, 139.0, 35.0, 139.0), PI, epsilon = 1e-9);
    }

    #[test]
    fn test_bearing_west() {
        assert_abs_diff_eq!(bearing(35.0, 140.0, 35.0, 139.0), 3.0 * FRAC_PI_2, epsilon = 0.01);
    }

    #[test]
    fn test_wrap_angle_range_and_congruence() {
        let mut a = -50.0;
        while a <= 50.0 {
            let w = wrap_angle(a);
            assert!((-PI..=PI).contains(&w), "wrap_angle({a}) = {w}");
            let turns = (a - w) / TAU;
            assert!((turns - turns.round()).abs() < 1e-9, "wrap_angle({a}) not congruent");
            a += 0.37;
        }
    }

    #[test]
    fn test_wrap_angle_takes_short_way() {
        assert_abs_diff_eq!(wrap_angle(3.0 * FRAC_PI_2), -FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(wrap_angle(-3.0 * FRAC_PI_2), FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(wrap_angle(0.25), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_wrap_two_pi() {
        assert_abs_diff_eq!(wrap_two_pi(-FRAC_PI_2), 3.0 * FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(wrap_two_pi(TAU + 0.5), 0.5, epsilon = 1e-12);
        assert!(wrap_two_pi(-1e-18) < TAU);
    }

    #[test]
    fn test_cross_track_error_sign() {
        // Track running due north along lon -1.38
        let starboard = cross_track_error(50.88, -1.38, 50.89, -1.38, 50.885, -1.3799);
        let port = cross_track_error(50.88, -1.38, 50.89, -1.38, 50.885, -1.3801);
        assert!(starboard > 0.0);
        assert!(port < 0.0);
        // 0.0001 deg of longitude at ~50.9N is ~7 m
        assert_abs_diff_eq!(starboard, 7.0, epsilon = 0.2);
        assert_abs_diff_eq!(port, -7.0, epsilon = 0.2);
    }

    #[test]
    fn test_cross_track_error_on_track_is_zero() {
        let xte = cross_track_error(50.88, -1.38, 50.89, -1.38, 50.885, -1.38);
        assert_abs_diff_eq!(xte, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_cross_track_error_at_leg_start_is_zero() {
        assert_eq!(cross_track_error(50.88, -1.38, 50.89, -1.38, 50.88, -1.38), 0.0);
    }
}

use nalgebra::Vector3;

use crate::utils::{deg_to_rad, rad_to_deg, EARTH_RADIUS, INITIAL_LAT, INITIAL_LON};

/// Flat-earth projection of an NED position about the fixed geodetic
/// origin: `[latitude deg, longitude deg, altitude m]`
pub fn ned_to_lla(position: &Vector3<f64>) -> [f64; 3] {
    let lat = INITIAL_LAT + rad_to_deg(position.x / EARTH_RADIUS);
    let lon =
        INITIAL_LON + rad_to_deg(position.y / (EARTH_RADIUS * deg_to_rad(INITIAL_LAT).cos()));
    let alt = -position.z;
    [lat, lon, alt]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_origin_maps_to_initial_coordinates() {
        let lla = ned_to_lla(&Vector3::zeros());
        assert_relative_eq!(lla[0], INITIAL_LAT);
        assert_relative_eq!(lla[1], INITIAL_LON);
        assert_relative_eq!(lla[2], 0.0);
    }

    #[test]
    fn test_north_offset_increases_latitude_only() {
        let lla = ned_to_lla(&Vector3::new(1000.0, 0.0, 0.0));
        // 1 km of northing is roughly 1/111 of a degree
        assert_relative_eq!(lla[0] - INITIAL_LAT, 0.008_983, epsilon = 1e-5);
        assert_relative_eq!(lla[1], INITIAL_LON);
    }

    #[test]
    fn test_east_offset_scales_with_cos_latitude() {
        let lla = ned_to_lla(&Vector3::new(0.0, 1000.0, 0.0));
        let expected = 0.008_983 / deg_to_rad(INITIAL_LAT).cos();
        // At ~49.8N a kilometre of easting spans a wider longitude arc
        assert_relative_eq!(lla[1] - INITIAL_LON, expected, epsilon = 1e-5);
        assert_relative_eq!(lla[0], INITIAL_LAT);
    }

    #[test]
    fn test_altitude_is_negated_down() {
        let lla = ned_to_lla(&Vector3::new(0.0, 0.0, -120.0));
        assert_relative_eq!(lla[2], 120.0);
    }
}

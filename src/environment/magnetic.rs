use nalgebra::Vector3;

use crate::utils::{deg_to_rad, EARTH_RADIUS};

// Coarse world-magnetic-model samples on a 45 deg latitude by 90 deg
// longitude grid. Rows run latitude -90..90, columns longitude -180..180;
// the first and last column repeat so longitude interpolation wraps.
const LAT_MIN: f64 = -90.0;
const LAT_STEP: f64 = 45.0;
const LON_MIN: f64 = -180.0;
const LON_STEP: f64 = 90.0;

/// Declination [deg], positive east of true north
const DECLINATION: [[f64; 5]; 5] = [
    [0.0, 0.0, 0.0, 0.0, 0.0],
    [25.0, 15.0, -20.0, -40.0, 25.0],
    [9.0, 1.0, -5.0, -2.0, 9.0],
    [7.0, -10.0, 0.0, 3.0, 7.0],
    [0.0, 0.0, 0.0, 0.0, 0.0],
];

/// Inclination [deg], positive down
const INCLINATION: [[f64; 5]; 5] = [
    [-72.0, -72.0, -72.0, -72.0, -72.0],
    [-68.0, -45.0, -60.0, -70.0, -68.0],
    [0.0, 20.0, -25.0, -25.0, 0.0],
    [62.0, 70.0, 62.0, 65.0, 62.0],
    [87.0, 87.0, 87.0, 87.0, 87.0],
];

/// Total field strength [gauss]
const STRENGTH: [[f64; 5]; 5] = [
    [0.55, 0.55, 0.55, 0.55, 0.55],
    [0.55, 0.30, 0.24, 0.58, 0.55],
    [0.34, 0.30, 0.33, 0.40, 0.34],
    [0.48, 0.55, 0.47, 0.55, 0.48],
    [0.57, 0.57, 0.57, 0.57, 0.57],
];

fn bilinear(table: &[[f64; 5]; 5], lat: f64, lon: f64) -> f64 {
    let row = ((lat - LAT_MIN) / LAT_STEP).clamp(0.0, 3.999);
    let col = ((lon - LON_MIN) / LON_STEP).clamp(0.0, 3.999);
    let (r0, c0) = (row.floor() as usize, col.floor() as usize);
    let (fr, fc) = (row - row.floor(), col - col.floor());

    let top = table[r0][c0] * (1.0 - fc) + table[r0][c0 + 1] * fc;
    let bottom = table[r0 + 1][c0] * (1.0 - fc) + table[r0 + 1][c0 + 1] * fc;
    top * (1.0 - fr) + bottom * fr
}

/// Geomagnetic field vector in earth NED components [gauss], from the
/// table lookup with a cubed-radius altitude falloff
pub fn mag_field(lat_deg: f64, lon_deg: f64, alt_m: f64) -> Vector3<f64> {
    let declination = deg_to_rad(bilinear(&DECLINATION, lat_deg, lon_deg));
    let inclination = deg_to_rad(bilinear(&INCLINATION, lat_deg, lon_deg));
    let falloff = (EARTH_RADIUS / (EARTH_RADIUS + alt_m)).powi(3);
    let strength = bilinear(&STRENGTH, lat_deg, lon_deg) * falloff;

    let horizontal = strength * inclination.cos();
    Vector3::new(
        horizontal * declination.cos(),
        horizontal * declination.sin(),
        strength * inclination.sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{INITIAL_LAT, INITIAL_LON};
    use approx::assert_relative_eq;

    #[test]
    fn test_field_at_origin_is_plausible() {
        let field = mag_field(INITIAL_LAT, INITIAL_LON, 0.0);
        let strength = field.norm();

        // Western Europe: roughly half a gauss, dipping steeply north-down
        assert!((0.4..0.6).contains(&strength), "strength {strength}");
        assert!(field.x > 0.0, "north component points north");
        assert!(field.z > field.x, "field dips below the horizon");
    }

    #[test]
    fn test_southern_hemisphere_dips_up() {
        let field = mag_field(-45.0, 170.0, 0.0);
        assert!(field.z < 0.0);
    }

    #[test]
    fn test_altitude_weakens_field() {
        let low = mag_field(INITIAL_LAT, INITIAL_LON, 0.0).norm();
        let high = mag_field(INITIAL_LAT, INITIAL_LON, 10_000.0).norm();
        assert!(high < low);
        assert_relative_eq!(high / low, (6_378_137.0 / 6_388_137.0_f64).powi(3), epsilon = 1e-9);
    }

    #[test]
    fn test_longitude_grid_wraps() {
        let west = mag_field(10.0, -180.0, 0.0);
        let east = mag_field(10.0, 180.0, 0.0);
        assert_relative_eq!(west, east, epsilon = 1e-12);
    }
}

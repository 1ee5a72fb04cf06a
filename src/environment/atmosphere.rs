use crate::utils::{
    ISA_AIR_MOLAR_MASS, ISA_GAS_CONSTANT, ISA_GRAVITY, ISA_LAPSE_RATE, ISA_SEA_LEVEL_PRESSURE,
    ISA_SEA_LEVEL_TEMP,
};

const TROPOPAUSE_ALT: f64 = 11_000.0;
const STRATOSPHERE_CEILING: f64 = 20_000.0;

/// ISA static pressure at the given altitude above mean sea level [Pa].
///
/// Power-law troposphere to 11 km, isothermal exponential shelf to 20 km,
/// zero above. The barometer encoder divides by 100 for hPa.
pub fn isa_pressure(altitude: f64) -> f64 {
    let exponent = ISA_GRAVITY * ISA_AIR_MOLAR_MASS / (ISA_GAS_CONSTANT * ISA_LAPSE_RATE);

    if altitude <= TROPOPAUSE_ALT {
        let ratio = ISA_SEA_LEVEL_TEMP / (ISA_SEA_LEVEL_TEMP + ISA_LAPSE_RATE * altitude);
        ISA_SEA_LEVEL_PRESSURE * ratio.powf(exponent)
    } else if altitude <= STRATOSPHERE_CEILING {
        let tropopause_temp = ISA_SEA_LEVEL_TEMP + ISA_LAPSE_RATE * TROPOPAUSE_ALT;
        let ratio = ISA_SEA_LEVEL_TEMP / tropopause_temp;
        let p_tropopause = ISA_SEA_LEVEL_PRESSURE * ratio.powf(exponent);
        let scale = -ISA_GRAVITY * ISA_AIR_MOLAR_MASS * (altitude - TROPOPAUSE_ALT)
            / (ISA_GAS_CONSTANT * tropopause_temp);
        p_tropopause * scale.exp()
    } else {
        0.0
    }
}

/// ISA air density at the given altitude [kg/m^3]
pub fn isa_density(altitude: f64) -> f64 {
    let temperature = if altitude <= TROPOPAUSE_ALT {
        ISA_SEA_LEVEL_TEMP + ISA_LAPSE_RATE * altitude
    } else {
        ISA_SEA_LEVEL_TEMP + ISA_LAPSE_RATE * TROPOPAUSE_ALT
    };
    isa_pressure(altitude) * ISA_AIR_MOLAR_MASS / (ISA_GAS_CONSTANT * temperature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sea_level_pressure() {
        assert_relative_eq!(isa_pressure(0.0), 101_325.0, epsilon = 1e-9);
    }

    #[test]
    fn test_tropopause_pressure() {
        // Canonical ISA tabulated value at 11 km
        assert_relative_eq!(isa_pressure(11_000.0), 22_632.0, epsilon = 1.0);
    }

    #[test]
    fn test_shelf_is_continuous_at_tropopause() {
        assert_relative_eq!(
            isa_pressure(11_000.0),
            isa_pressure(11_000.000_001),
            epsilon = 1e-3
        );
    }

    #[test]
    fn test_zero_above_ceiling() {
        assert_relative_eq!(isa_pressure(20_001.0), 0.0);
        assert_relative_eq!(isa_pressure(50_000.0), 0.0);
    }

    #[test]
    fn test_pressure_decreases_with_altitude() {
        let mut last = isa_pressure(0.0);
        for alt in (500..20_000).step_by(500) {
            let p = isa_pressure(alt as f64);
            assert!(p < last, "pressure must fall with altitude at {alt} m");
            last = p;
        }
    }

    #[test]
    fn test_sea_level_density() {
        assert_relative_eq!(isa_density(0.0), 1.225, epsilon = 1e-3);
    }
}

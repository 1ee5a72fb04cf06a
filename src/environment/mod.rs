mod atmosphere;
mod geodesy;
mod magnetic;

pub use atmosphere::{isa_density, isa_pressure};
pub use geodesy::ned_to_lla;
pub use magnetic::mag_field;

use nalgebra::Vector3;

/// Ambient conditions supplied by the host
pub trait EnvironmentProvider: Send + Sync {
    /// Steady wind over the ground in earth NED [m/s]
    fn environment_wind(&self) -> Vector3<f64>;

    /// Outside air temperature [degC]
    fn temperature(&self) -> f64;
}

/// Fixed ambient conditions, enough for a HIL bench
#[derive(Debug, Clone, Copy)]
pub struct ConstantEnvironment {
    pub wind: Vector3<f64>,
    pub temperature: f64,
}

impl Default for ConstantEnvironment {
    fn default() -> Self {
        Self {
            wind: Vector3::zeros(),
            temperature: 25.0,
        }
    }
}

impl EnvironmentProvider for ConstantEnvironment {
    fn environment_wind(&self) -> Vector3<f64> {
        self.wind
    }

    fn temperature(&self) -> f64 {
        self.temperature
    }
}

mod aero_coef;
mod drone;

pub use aero_coef::{
    AeroEnvelope, DragPolar, DroneAeroConfig, LateralCoefficients, LongitudinalCoefficients,
};
pub use drone::{ConfigError, ControllerConfig, ControllerDescriptors, DroneConfig};

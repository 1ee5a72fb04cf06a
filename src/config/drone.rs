use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::config::DroneAeroConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),
    #[error("Invalid drone configuration: {0}")]
    ValidationError(String),
}

/// First-order response descriptor of one actuator group.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Multiplier applied to the normalized command
    pub scale: f64,
    /// Time constant of the first-order lag [s]; `None` snaps to the command
    pub tau: Option<f64>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            tau: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct ControllerDescriptors {
    #[serde(default)]
    pub thrust_propellers: ControllerConfig,
    #[serde(default)]
    pub ailerons: ControllerConfig,
    #[serde(default)]
    pub vtol_propellers: ControllerConfig,
}

/// Immutable airframe description, loaded once at startup.
#[allow(non_snake_case)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroneConfig {
    pub name: String,

    /// Vehicle mass [kg]
    pub mass: f64,

    /// Inertia tensor about the body origin [kg m^2]
    pub J: Matrix3<f64>,

    /// Peak propeller thrust at full command, shared by the fixed-wing
    /// pusher and each VTOL rotor [N]
    pub b_prop: f64,

    /// Rotor reaction torque per newton of thrust [m]
    pub c: f64,

    /// Wing span [m]
    pub b_aero: f64,

    /// Wing reference area [m^2]
    pub S: f64,

    /// Moment arm of the fixed-wing propeller from the body origin [m]
    pub d: Vector3<f64>,

    /// VTOL rotor arm length [m]
    pub l: f64,

    pub drone_aero_config: DroneAeroConfig,

    #[serde(default)]
    pub controllers: ControllerDescriptors,
}

impl DroneConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file_contents = std::fs::read_to_string(path)?;
        let config: DroneConfig = serde_yaml::from_str(&file_contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.mass <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "mass must be positive, got {}",
                self.mass
            )));
        }
        if self.S <= 0.0 || self.b_aero <= 0.0 {
            return Err(ConfigError::ValidationError(
                "aero reference geometry must be positive".to_string(),
            ));
        }
        // J must be symmetric positive definite; symmetry plus positive
        // leading principal minors (Sylvester) is enough here.
        let j = &self.J;
        if (j - j.transpose()).norm() > 1e-9 {
            return Err(ConfigError::ValidationError(
                "inertia tensor must be symmetric".to_string(),
            ));
        }
        let m1 = j[(0, 0)];
        let m2 = j[(0, 0)] * j[(1, 1)] - j[(0, 1)] * j[(1, 0)];
        let m3 = j.determinant();
        if m1 <= 0.0 || m2 <= 0.0 || m3 <= 0.0 {
            return Err(ConfigError::ValidationError(
                "inertia tensor must be positive definite".to_string(),
            ));
        }
        Ok(())
    }

    /// Mean aerodynamic chord derived from the reference geometry [m]
    pub fn mean_chord(&self) -> f64 {
        self.S / self.b_aero
    }
}

impl Default for DroneConfig {
    fn default() -> Self {
        Self {
            name: "hybrid_vtol".to_string(),
            mass: 4.5,
            J: Matrix3::from_diagonal(&Vector3::new(0.22, 0.26, 0.42)),
            b_prop: 32.0,
            c: 0.05,
            b_aero: 2.1,
            S: 0.62,
            d: Vector3::new(-0.22, 0.0, 0.0),
            l: 0.45,
            drone_aero_config: DroneAeroConfig::hybrid_vtol(),
            controllers: ControllerDescriptors::default(),
        }
    }
}

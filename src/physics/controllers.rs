use crate::config::{ControllerConfig, ControllerDescriptors};

/// Stateful holder of the most recent normalized command vector for one
/// actuator group. `control` applies the configured scale and, when a time
/// constant is configured, a first-order lag toward the scaled command.
#[derive(Debug, Clone)]
pub struct ActuatorController {
    setpoint: Vec<f64>,
    output: Vec<f64>,
    scale: f64,
    tau: Option<f64>,
}

impl ActuatorController {
    pub fn new(width: usize, config: ControllerConfig) -> Self {
        Self {
            setpoint: vec![0.0; width],
            output: vec![0.0; width],
            scale: config.scale,
            tau: config.tau,
        }
    }

    pub fn width(&self) -> usize {
        self.setpoint.len()
    }

    /// Replace the held command vector. Extra channels are ignored,
    /// missing ones keep their previous value.
    pub fn set_control(&mut self, command: &[f64]) {
        for (held, &new) in self.setpoint.iter_mut().zip(command) {
            *held = new;
        }
    }

    /// Advance the actuator response by `dt` and return the scaled output
    pub fn control(&mut self, dt: f64) -> &[f64] {
        match self.tau {
            Some(tau) if tau > 1e-6 => {
                // Exponential approach toward the scaled command
                let decay = (-dt / tau).exp();
                for (out, &sp) in self.output.iter_mut().zip(&self.setpoint) {
                    let target = sp * self.scale;
                    *out = target + (*out - target) * decay;
                }
            }
            _ => {
                for (out, &sp) in self.output.iter_mut().zip(&self.setpoint) {
                    *out = sp * self.scale;
                }
            }
        }
        &self.output
    }
}

/// One sample of all actuator groups, taken once per simulation tick
#[derive(Debug, Clone, Copy, Default)]
pub struct ControlSample {
    /// Fixed-wing thrust command in [-1, 1]
    pub throttle: f64,
    /// Left/right elevon deflections
    pub ailerons: [f64; 2],
    /// VTOL rotor commands in [0, 1]
    pub vtol: [f64; 4],
}

/// The three actuator groups of the airframe
#[derive(Debug, Clone)]
pub struct ControllerSet {
    pub thrust_propellers: ActuatorController,
    pub ailerons: ActuatorController,
    pub vtol_propellers: ActuatorController,
}

impl ControllerSet {
    pub fn new(descriptors: &ControllerDescriptors) -> Self {
        Self {
            thrust_propellers: ActuatorController::new(1, descriptors.thrust_propellers),
            ailerons: ActuatorController::new(2, descriptors.ailerons),
            vtol_propellers: ActuatorController::new(4, descriptors.vtol_propellers),
        }
    }

    pub fn sample(&mut self, dt: f64) -> ControlSample {
        let throttle = self.thrust_propellers.control(dt)[0];
        let ail = self.ailerons.control(dt);
        let ailerons = [ail[0], ail[1]];
        let quad = self.vtol_propellers.control(dt);
        let vtol = [quad[0], quad[1], quad[2], quad[3]];
        ControlSample {
            throttle,
            ailerons,
            vtol,
        }
    }
}

impl Default for ControllerSet {
    fn default() -> Self {
        Self::new(&ControllerDescriptors::default())
    }
}

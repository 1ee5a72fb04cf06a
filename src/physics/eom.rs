use nalgebra::{Matrix3, Vector3};

use crate::config::{ConfigError, DroneConfig};
use crate::physics::controllers::ControlSample;
use crate::physics::forces::{
    Aerodynamic, FixedWingThrust, ForceModel, QuadRotorThrust, Weight,
};
use crate::physics::rotation::{body2earth, earth2body, euler_rates_matrix, wind2body};
use crate::state::{StateDerivative, StateVector};
use crate::utils::GRAVITY;

/// Mixed quad-rotor / fixed-wing equations of motion.
///
/// Owns the four force models and the airborne flag. While grounded, the
/// weight and fixed-wing contributions are suppressed so drag and gravity
/// cannot accelerate a parked vehicle into the runway; the flag latches
/// true once rotor thrust along body-down reaches the vehicle weight and
/// is cleared only by the ground-contact corrector.
pub struct MixedEom {
    weight: Weight,
    aero: Aerodynamic,
    fixed_wing: FixedWingThrust,
    quad: QuadRotorThrust,
    inertia: Matrix3<f64>,
    inertia_inv: Matrix3<f64>,
    airborne: bool,
}

impl MixedEom {
    pub fn new(config: &DroneConfig) -> Result<Self, ConfigError> {
        let inertia_inv = config.J.try_inverse().ok_or_else(|| {
            ConfigError::ValidationError("inertia tensor is not invertible".to_string())
        })?;

        Ok(Self {
            weight: Weight::new(config),
            aero: Aerodynamic::new(config),
            fixed_wing: FixedWingThrust::new(config),
            quad: QuadRotorThrust::new(config),
            inertia: config.J,
            inertia_inv,
            airborne: false,
        })
    }

    pub fn airborne(&self) -> bool {
        self.airborne
    }

    pub fn mass(&self) -> f64 {
        self.weight.mass()
    }

    /// Ground contact clears the airborne latch; called by the corrector path
    pub fn set_grounded(&mut self) {
        if self.airborne {
            log::debug!("ground contact, airborne flag cleared");
        }
        self.airborne = false;
    }

    /// State derivative at `(t, x)` under the given actuator sample
    pub fn evaluate(
        &mut self,
        t: f64,
        x: &StateVector,
        controls: &ControlSample,
    ) -> StateDerivative {
        self.aero.set_surfaces(controls.ailerons);
        self.aero.update(t, x);
        self.quad.set_controls(controls.vtol);
        self.quad.update(t, x);

        let (f_weight_body, f_fixed_wing, m_fixed_wing) = if self.airborne {
            self.weight.update(t, x);
            self.fixed_wing.set_throttle(controls.throttle);
            self.fixed_wing.update(t, x);
            (
                earth2body(x) * self.weight.force(),
                self.fixed_wing.force(),
                self.fixed_wing.moment(),
            )
        } else {
            (Vector3::zeros(), Vector3::zeros(), Vector3::zeros())
        };

        let f_aero_body = wind2body(x) * self.aero.force();
        let omega = x.angular_velocity();

        let mut dx = StateDerivative::default();
        dx.set_earth_velocity(body2earth(x) * x.velocity());
        dx.set_body_acceleration(
            (f_fixed_wing + f_weight_body + f_aero_body + self.quad.force()) / self.weight.mass(),
        );
        dx.set_euler_rates(euler_rates_matrix(x) * omega);

        let torque = m_fixed_wing + self.aero.moment() + self.quad.moment()
            - omega.cross(&(self.inertia * omega));
        dx.set_angular_acceleration(self.inertia_inv * torque);

        if !self.airborne && self.quad.force().z.abs() >= self.weight.mass() * GRAVITY {
            self.airborne = true;
            log::info!("airborne: rotor thrust exceeds weight");
        }

        dx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn eom_with_mass_and_rotor(mass: f64, b_prop: f64) -> MixedEom {
        let config = DroneConfig {
            mass,
            b_prop,
            ..DroneConfig::default()
        };
        MixedEom::new(&config).unwrap()
    }

    #[test]
    fn test_derivative_zero_at_rest() {
        let mut eom = MixedEom::new(&DroneConfig::default()).unwrap();
        let dx = eom.evaluate(0.0, &StateVector::default(), &ControlSample::default());
        assert_relative_eq!(dx.0.norm(), 0.0, epsilon = 1e-12);
        assert!(!eom.airborne());
    }

    #[test]
    fn test_airborne_latches_when_thrust_matches_weight() {
        // 10 N vehicle, 12 N of collective rotor thrust available
        let mut eom = eom_with_mass_and_rotor(10.0 / GRAVITY, 3.0);
        let x = StateVector::default();

        let mut flipped_at = None;
        for step in 0..=100 {
            let u = step as f64 / 100.0;
            let controls = ControlSample {
                vtol: [u; 4],
                ..ControlSample::default()
            };
            eom.evaluate(0.0, &x, &controls);
            if eom.airborne() {
                flipped_at = Some(u);
                break;
            }
        }

        // 4 * 3 N * u >= 10 N first holds at u ~ 0.8333
        let u = flipped_at.expect("never became airborne");
        assert!(4.0 * 3.0 * u >= 10.0);
        assert!(4.0 * 3.0 * (u - 0.01) < 10.0);
    }

    #[test]
    fn test_airborne_only_cleared_by_ground_path() {
        let mut eom = eom_with_mass_and_rotor(10.0 / GRAVITY, 3.0);
        let x = StateVector::default();
        let full = ControlSample {
            vtol: [1.0; 4],
            ..ControlSample::default()
        };
        eom.evaluate(0.0, &x, &full);
        assert!(eom.airborne());

        // Cutting thrust does not drop the latch
        eom.evaluate(0.0, &x, &ControlSample::default());
        assert!(eom.airborne());

        eom.set_grounded();
        assert!(!eom.airborne());
    }

    #[test]
    fn test_hover_force_balance() {
        let mut eom = eom_with_mass_and_rotor(10.0 / GRAVITY, 3.0);
        let x = StateVector::default();
        let full = ControlSample {
            vtol: [1.0; 4],
            ..ControlSample::default()
        };
        eom.evaluate(0.0, &x, &full);
        assert!(eom.airborne());

        // Exactly weight-matching thrust: 10 N / 12 N of collective
        let hover = ControlSample {
            vtol: [10.0 / 12.0; 4],
            ..ControlSample::default()
        };
        let dx = eom.evaluate(0.0, &x, &hover);
        assert_relative_eq!(dx.body_acceleration().norm(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_grounded_suppresses_weight_and_fixed_wing() {
        let mut eom = MixedEom::new(&DroneConfig::default()).unwrap();
        let controls = ControlSample {
            throttle: 1.0,
            ..ControlSample::default()
        };
        let dx = eom.evaluate(0.0, &StateVector::default(), &controls);

        // Grounded: no gravity, and the pusher throttle is ignored
        assert_relative_eq!(dx.body_acceleration().norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_gyroscopic_coupling() {
        let config = DroneConfig::default();
        let mut eom = MixedEom::new(&config).unwrap();
        let mut x = StateVector::default();
        // Spin about two distinct-inertia axes couples into the third
        x[9] = 1.0;
        x[10] = 1.0;
        let dx = eom.evaluate(0.0, &x, &ControlSample::default());

        // tau_z = -(omega x J omega)_z = J_xx - J_yy for unit p, q
        let expected = (config.J[(0, 0)] - config.J[(1, 1)]) / config.J[(2, 2)];
        assert_relative_eq!(dx.angular_acceleration().z, expected, epsilon = 1e-9);
    }
}

use nalgebra::Vector3;
use std::f64::consts::FRAC_1_SQRT_2;

use crate::config::{DroneAeroConfig, DroneConfig};
use crate::environment::isa_density;
use crate::physics::rotation::airflow;
use crate::state::StateVector;
use crate::utils::GRAVITY;

/// One contribution to the rigid-body force/moment balance. `update`
/// refreshes the cached outputs from the current time, state and the most
/// recently set control sample; `force`/`moment` read the cache.
pub trait ForceModel {
    fn update(&mut self, t: f64, x: &StateVector);
    fn force(&self) -> Vector3<f64>;
    fn moment(&self) -> Vector3<f64>;
}

/// Gravitational force in the earth frame; the EOM rotates it into body
#[derive(Debug, Clone)]
pub struct Weight {
    mass: f64,
    force: Vector3<f64>,
}

impl Weight {
    pub fn new(config: &DroneConfig) -> Self {
        Self {
            mass: config.mass,
            force: Vector3::zeros(),
        }
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }
}

impl ForceModel for Weight {
    fn update(&mut self, _t: f64, _x: &StateVector) {
        self.force = Vector3::new(0.0, 0.0, self.mass * GRAVITY);
    }

    fn force(&self) -> Vector3<f64> {
        self.force
    }

    fn moment(&self) -> Vector3<f64> {
        Vector3::zeros()
    }
}

/// Aerodynamic force and moment from the configured coefficient tables.
/// Force output is in the wind frame (-drag, side force, -lift); moments
/// are about the body axes.
#[derive(Debug, Clone)]
pub struct Aerodynamic {
    span: f64,
    area: f64,
    chord: f64,
    coef: DroneAeroConfig,
    elevator: f64,
    aileron: f64,
    force: Vector3<f64>,
    moment: Vector3<f64>,
}

impl Aerodynamic {
    pub fn new(config: &DroneConfig) -> Self {
        Self {
            span: config.b_aero,
            area: config.S,
            chord: config.mean_chord(),
            coef: config.drone_aero_config,
            elevator: 0.0,
            aileron: 0.0,
            force: Vector3::zeros(),
            moment: Vector3::zeros(),
        }
    }

    /// Elevon mixing: mean deflection pitches, differential deflection rolls
    pub fn set_surfaces(&mut self, surfaces: [f64; 2]) {
        self.elevator = 0.5 * (surfaces[0] + surfaces[1]);
        self.aileron = 0.5 * (surfaces[0] - surfaces[1]);
    }
}

impl ForceModel for Aerodynamic {
    fn update(&mut self, _t: f64, x: &StateVector) {
        let (airspeed, alpha, beta) = airflow(x);
        if airspeed < 1e-6 {
            // Incidence angles are undefined at rest; no airflow, no load
            self.force = Vector3::zeros();
            self.moment = Vector3::zeros();
            return;
        }

        // Saturate at the configured fit envelope
        let envelope = &self.coef.envelope;
        let alpha = alpha.clamp(envelope.alpha_min, envelope.alpha_max);
        let beta = beta.clamp(-envelope.beta_limit, envelope.beta_limit);

        let rates = x.angular_velocity();
        let hat_limit = envelope.rate_hat_limit;
        let p_hat = (self.span * rates.x / (2.0 * airspeed)).clamp(-hat_limit, hat_limit);
        let q_hat = (self.chord * rates.y / (2.0 * airspeed)).clamp(-hat_limit, hat_limit);
        let r_hat = (self.span * rates.z / (2.0 * airspeed)).clamp(-hat_limit, hat_limit);

        let lon = &self.coef.longitudinal;
        let lat = &self.coef.lateral;

        // Lift first: the polar hangs the induced drag off it
        let c_lift =
            lon.c_l0 + lon.c_l_alpha * alpha + lon.c_l_q * q_hat + lon.c_l_delta * self.elevator;
        let c_drag = self.coef.polar.c_d0 + self.coef.polar.k * c_lift * c_lift;
        let c_side = lat.c_y_beta * beta;

        let c_roll = lat.c_ll_beta * beta
            + lat.c_ll_p * p_hat
            + lat.c_ll_r * r_hat
            + lat.c_ll_delta * self.aileron;
        let c_pitch =
            lon.c_m0 + lon.c_m_alpha * alpha + lon.c_m_q * q_hat + lon.c_m_delta * self.elevator;
        let c_yaw = lat.c_n_beta * beta
            + lat.c_n_p * p_hat
            + lat.c_n_r * r_hat
            + lat.c_n_delta * self.aileron;

        let altitude = -x[2];
        let q_bar = 0.5 * isa_density(altitude) * airspeed * airspeed;

        self.force = Vector3::new(
            -q_bar * self.area * c_drag,
            q_bar * self.area * c_side,
            -q_bar * self.area * c_lift,
        );
        self.moment = Vector3::new(
            q_bar * self.area * self.span * c_roll,
            q_bar * self.area * self.chord * c_pitch,
            q_bar * self.area * self.span * c_yaw,
        );
    }

    fn force(&self) -> Vector3<f64> {
        self.force
    }

    fn moment(&self) -> Vector3<f64> {
        self.moment
    }
}

/// Pusher propeller thrust along body-x with its moment about the origin
#[derive(Debug, Clone)]
pub struct FixedWingThrust {
    max_thrust: f64,
    arm: Vector3<f64>,
    throttle: f64,
    force: Vector3<f64>,
    moment: Vector3<f64>,
}

impl FixedWingThrust {
    pub fn new(config: &DroneConfig) -> Self {
        Self {
            max_thrust: config.b_prop,
            arm: config.d,
            throttle: 0.0,
            force: Vector3::zeros(),
            moment: Vector3::zeros(),
        }
    }

    pub fn set_throttle(&mut self, throttle: f64) {
        self.throttle = throttle.clamp(-1.0, 1.0);
    }
}

impl ForceModel for FixedWingThrust {
    fn update(&mut self, _t: f64, _x: &StateVector) {
        self.force = Vector3::new(self.throttle * self.max_thrust, 0.0, 0.0);
        self.moment = self.arm.cross(&self.force);
    }

    fn force(&self) -> Vector3<f64> {
        self.force
    }

    fn moment(&self) -> Vector3<f64> {
        self.moment
    }
}

/// Four VTOL rotors in X configuration. Rotor order is front-right,
/// back-left, front-left, back-right; the first pair spins counter-
/// clockwise seen from above, yielding a positive-yaw reaction torque.
#[derive(Debug, Clone)]
pub struct QuadRotorThrust {
    thrust_per_rotor: f64,
    reaction_coef: f64,
    arm: f64,
    controls: [f64; 4],
    force: Vector3<f64>,
    moment: Vector3<f64>,
}

/// Rotor planform positions as (x, y) signs on the arm diagonals
const ROTOR_LAYOUT: [(f64, f64); 4] = [(1.0, 1.0), (-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0)];
const ROTOR_SPIN: [f64; 4] = [1.0, 1.0, -1.0, -1.0];

impl QuadRotorThrust {
    pub fn new(config: &DroneConfig) -> Self {
        Self {
            thrust_per_rotor: config.b_prop,
            reaction_coef: config.c,
            arm: config.l,
            controls: [0.0; 4],
            force: Vector3::zeros(),
            moment: Vector3::zeros(),
        }
    }

    pub fn set_controls(&mut self, controls: [f64; 4]) {
        self.controls = controls.map(|u| u.clamp(0.0, 1.0));
    }
}

impl ForceModel for QuadRotorThrust {
    fn update(&mut self, _t: f64, _x: &StateVector) {
        let mut force = Vector3::zeros();
        let mut moment = Vector3::zeros();

        for i in 0..4 {
            let thrust = self.controls[i] * self.thrust_per_rotor;
            let (sx, sy) = ROTOR_LAYOUT[i];
            let r_x = sx * self.arm * FRAC_1_SQRT_2;
            let r_y = sy * self.arm * FRAC_1_SQRT_2;

            // Lift is along body-up; r x F plus the spin reaction torque
            force.z -= thrust;
            moment.x -= r_y * thrust;
            moment.y += r_x * thrust;
            moment.z += ROTOR_SPIN[i] * self.reaction_coef * thrust;
        }

        self.force = force;
        self.moment = moment;
    }

    fn force(&self) -> Vector3<f64> {
        self.force
    }

    fn moment(&self) -> Vector3<f64> {
        self.moment
    }
}

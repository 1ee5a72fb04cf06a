use nalgebra::{SVector, Vector3};
use std::ops::{Deref, DerefMut};

use crate::utils::wrap_angle;

/// Rigid-body state in NED conventions, 12 doubles:
///
/// - `[0..2]` body origin position in earth NED [m]
/// - `[3..5]` body-frame linear velocity [m/s]
/// - `[6..8]` orientation as Euler roll/pitch/yaw [rad]
/// - `[9..11]` body-frame angular velocity [rad/s]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector(pub SVector<f64, 12>);

/// Time derivative of [`StateVector`]:
///
/// - `[0..2]` earth-frame velocity [m/s]
/// - `[3..5]` body-frame linear acceleration [m/s^2]
/// - `[6..8]` Euler-angle rates [rad/s]
/// - `[9..11]` body-frame angular acceleration [rad/s^2]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateDerivative(pub SVector<f64, 12>);

impl Default for StateVector {
    fn default() -> Self {
        Self(SVector::zeros())
    }
}

impl Default for StateDerivative {
    fn default() -> Self {
        Self(SVector::zeros())
    }
}

impl Deref for StateVector {
    type Target = SVector<f64, 12>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for StateVector {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Deref for StateDerivative {
    type Target = SVector<f64, 12>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for StateDerivative {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl StateVector {
    /// Position of the body origin in earth NED [m]
    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self[0], self[1], self[2])
    }

    /// Body-frame linear velocity [m/s]
    pub fn velocity(&self) -> Vector3<f64> {
        Vector3::new(self[3], self[4], self[5])
    }

    /// Euler angles roll/pitch/yaw [rad]
    pub fn attitude(&self) -> Vector3<f64> {
        Vector3::new(self[6], self[7], self[8])
    }

    /// Body-frame angular velocity [rad/s]
    pub fn angular_velocity(&self) -> Vector3<f64> {
        Vector3::new(self[9], self[10], self[11])
    }

    /// Advance by `k * dt` without mutating `self`
    pub fn advanced(&self, k: &StateDerivative, dt: f64) -> Self {
        Self(self.0 + k.0 * dt)
    }

    /// Wrap the orientation components to (-pi, pi]
    pub fn wrap_attitude(&mut self) {
        for i in 6..9 {
            self[i] = wrap_angle(self[i]);
        }
    }

    pub fn set_velocity(&mut self, v: Vector3<f64>) {
        self[3] = v.x;
        self[4] = v.y;
        self[5] = v.z;
    }
}

impl StateDerivative {
    /// Earth-frame velocity [m/s]
    pub fn earth_velocity(&self) -> Vector3<f64> {
        Vector3::new(self[0], self[1], self[2])
    }

    /// Body-frame linear acceleration [m/s^2]
    pub fn body_acceleration(&self) -> Vector3<f64> {
        Vector3::new(self[3], self[4], self[5])
    }

    /// Euler-angle rates [rad/s]
    pub fn euler_rates(&self) -> Vector3<f64> {
        Vector3::new(self[6], self[7], self[8])
    }

    /// Body-frame angular acceleration [rad/s^2]
    pub fn angular_acceleration(&self) -> Vector3<f64> {
        Vector3::new(self[9], self[10], self[11])
    }

    pub fn set_earth_velocity(&mut self, v: Vector3<f64>) {
        self[0] = v.x;
        self[1] = v.y;
        self[2] = v.z;
    }

    pub fn set_body_acceleration(&mut self, a: Vector3<f64>) {
        self[3] = a.x;
        self[4] = a.y;
        self[5] = a.z;
    }

    pub fn set_euler_rates(&mut self, r: Vector3<f64>) {
        self[6] = r.x;
        self[7] = r.y;
        self[8] = r.z;
    }

    pub fn set_angular_acceleration(&mut self, a: Vector3<f64>) {
        self[9] = a.x;
        self[10] = a.y;
        self[11] = a.z;
    }
}

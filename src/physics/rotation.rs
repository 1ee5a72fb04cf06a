use nalgebra::Matrix3;

use crate::state::StateVector;

/// Relative airflow seen by the body: (airspeed [m/s], alpha [rad],
/// beta [rad]). Angles are zero below a vanishing airspeed, where the
/// incidence directions are undefined.
pub fn airflow(x: &StateVector) -> (f64, f64, f64) {
    let v = x.velocity();
    let airspeed = v.norm();
    if airspeed < 1e-6 {
        return (airspeed, 0.0, 0.0);
    }
    let alpha = v.z.atan2(v.x);
    let beta = (v.y / airspeed).asin();
    (airspeed, alpha, beta)
}

/// Direction cosine matrix rotating body-frame vectors into earth NED,
/// ZYX Euler convention
pub fn body2earth(x: &StateVector) -> Matrix3<f64> {
    let att = x.attitude();
    let (s_phi, c_phi) = att.x.sin_cos();
    let (s_theta, c_theta) = att.y.sin_cos();
    let (s_psi, c_psi) = att.z.sin_cos();

    Matrix3::new(
        c_theta * c_psi,
        s_phi * s_theta * c_psi - c_phi * s_psi,
        c_phi * s_theta * c_psi + s_phi * s_psi,
        c_theta * s_psi,
        s_phi * s_theta * s_psi + c_phi * c_psi,
        c_phi * s_theta * s_psi - s_phi * c_psi,
        -s_theta,
        s_phi * c_theta,
        c_phi * c_theta,
    )
}

/// Inverse of [`body2earth`]
pub fn earth2body(x: &StateVector) -> Matrix3<f64> {
    body2earth(x).transpose()
}

/// Rotation from the wind frame (x along the relative velocity) into the
/// body frame, evaluated at the state's current incidence angles
pub fn wind2body(x: &StateVector) -> Matrix3<f64> {
    let (_, alpha, beta) = airflow(x);
    let (s_a, c_a) = alpha.sin_cos();
    let (s_b, c_b) = beta.sin_cos();

    Matrix3::new(
        c_a * c_b,
        -c_a * s_b,
        -s_a,
        s_b,
        c_b,
        0.0,
        s_a * c_b,
        -s_a * s_b,
        c_a,
    )
}

/// Matrix mapping body angular rates (p, q, r) to Euler-angle rates.
/// Singular at +/-90 deg pitch, as any Euler kinematic relation is.
pub fn euler_rates_matrix(x: &StateVector) -> Matrix3<f64> {
    let att = x.attitude();
    let (s_phi, c_phi) = att.x.sin_cos();
    let c_theta = att.y.cos();
    let t_theta = att.y.tan();

    Matrix3::new(
        1.0,
        s_phi * t_theta,
        c_phi * t_theta,
        0.0,
        c_phi,
        -s_phi,
        0.0,
        s_phi / c_theta,
        c_phi / c_theta,
    )
}

/// ZYX Euler angles to unit quaternion, components ordered (x, y, z, w)
pub fn euler_to_quaternion(roll: f64, pitch: f64, yaw: f64) -> [f64; 4] {
    let (s_phi, c_phi) = (roll / 2.0).sin_cos();
    let (s_theta, c_theta) = (pitch / 2.0).sin_cos();
    let (s_psi, c_psi) = (yaw / 2.0).sin_cos();

    [
        s_phi * c_theta * c_psi - c_phi * s_theta * s_psi,
        c_phi * s_theta * c_psi + s_phi * c_theta * s_psi,
        c_phi * c_theta * s_psi - s_phi * s_theta * c_psi,
        c_phi * c_theta * c_psi + s_phi * s_theta * s_psi,
    ]
}

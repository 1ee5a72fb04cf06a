use serde::{Deserialize, Serialize};

/// Aerodynamic description of the blended-wing elevon airframe.
///
/// The wing has exactly two control surfaces, so the table is split by
/// what drives each response: the longitudinal set reacts to incidence,
/// pitch rate and the mean elevon deflection; the lateral set reacts to
/// sideslip, roll/yaw rates and the differential deflection. Drag is a
/// parabolic polar coupled to the lift coefficient rather than an
/// independent polynomial.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DroneAeroConfig {
    pub longitudinal: LongitudinalCoefficients,
    pub lateral: LateralCoefficients,
    pub polar: DragPolar,
    pub envelope: AeroEnvelope,
}

/// Lift and pitching moment response [per rad, per unit q_hat]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LongitudinalCoefficients {
    pub c_l0: f64,
    pub c_l_alpha: f64,
    pub c_l_q: f64,
    /// Lift from the mean elevon deflection
    pub c_l_delta: f64,
    pub c_m0: f64,
    pub c_m_alpha: f64,
    pub c_m_q: f64,
    /// Pitch authority of the mean elevon deflection
    pub c_m_delta: f64,
}

/// Side force, roll and yaw response [per rad, per unit p_hat/r_hat]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LateralCoefficients {
    pub c_y_beta: f64,
    /// Dihedral effect
    pub c_ll_beta: f64,
    /// Roll damping
    pub c_ll_p: f64,
    pub c_ll_r: f64,
    /// Roll authority of the differential elevon deflection
    pub c_ll_delta: f64,
    /// Weathercock stability
    pub c_n_beta: f64,
    pub c_n_p: f64,
    /// Yaw damping
    pub c_n_r: f64,
    /// Adverse yaw from the differential elevon deflection
    pub c_n_delta: f64,
}

/// Parabolic drag polar: `c_d = c_d0 + k * c_l^2`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DragPolar {
    pub c_d0: f64,
    /// Induced-drag factor, `1 / (pi e AR)` for this planform
    pub k: f64,
}

/// Validity bounds of the linear fit. Incidence saturates at the wing's
/// stall entries and the nondimensional rates at the point where the
/// damping derivatives were identified; beyond them the fit extrapolates
/// nonsense, not flow physics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AeroEnvelope {
    /// Negative-incidence fit limit [rad]
    pub alpha_min: f64,
    /// Stall entry of the cambered section [rad]
    pub alpha_max: f64,
    /// Sideslip fit limit [rad], symmetric
    pub beta_limit: f64,
    /// Bound on |p_hat|, |q_hat|, |r_hat|
    pub rate_hat_limit: f64,
}

impl DroneAeroConfig {
    /// Coefficients of the reference hybrid VTOL airframe
    pub fn hybrid_vtol() -> Self {
        Self {
            longitudinal: LongitudinalCoefficients {
                c_l0: 0.18,
                c_l_alpha: 4.6,
                c_l_q: 5.8,
                c_l_delta: 0.32,
                c_m0: 0.012,
                c_m_alpha: -0.58,
                c_m_q: -8.2,
                c_m_delta: -0.78,
            },
            lateral: LateralCoefficients {
                c_y_beta: -0.42,
                c_ll_beta: -0.055,
                c_ll_p: -0.48,
                c_ll_r: 0.036,
                c_ll_delta: 0.16,
                c_n_beta: 0.082,
                c_n_p: -0.018,
                c_n_r: -0.095,
                c_n_delta: -0.012,
            },
            polar: DragPolar {
                c_d0: 0.027,
                k: 0.053,
            },
            envelope: AeroEnvelope {
                alpha_min: -0.21,
                alpha_max: 0.26,
                beta_limit: 0.26,
                rate_hat_limit: 0.25,
            },
        }
    }
}

impl Default for DroneAeroConfig {
    fn default() -> Self {
        Self::hybrid_vtol()
    }
}

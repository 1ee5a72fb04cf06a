use crate::state::{StateDerivative, StateVector};

/// Fixed-step classic Runge-Kutta (RK4) over the 12-element state.
///
/// Stage states live on the stack; nothing is allocated per step. The
/// returned derivative is the final stage evaluation of the step, which
/// downstream consumers treat as the acceleration estimate for the tick.
#[derive(Debug, Clone, Copy)]
pub struct RungeKutta4 {
    h: f64,
}

impl RungeKutta4 {
    pub fn new(h: f64) -> Self {
        Self { h }
    }

    pub fn step_size(&self) -> f64 {
        self.h
    }

    pub fn step<F>(&self, t: f64, x: &mut StateVector, mut f: F) -> StateDerivative
    where
        F: FnMut(f64, &StateVector) -> StateDerivative,
    {
        let h = self.h;
        let k1 = f(t, x);
        let k2 = f(t + 0.5 * h, &x.advanced(&k1, 0.5 * h));
        let k3 = f(t + 0.5 * h, &x.advanced(&k2, 0.5 * h));
        let k4 = f(t + h, &x.advanced(&k3, h));

        x.0 += (k1.0 + 2.0 * (k2.0 + k3.0) + k4.0) * (h / 6.0);
        x.wrap_attitude();
        k4
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_constant_acceleration_exact() {
        let rk4 = RungeKutta4::new(0.01);
        let mut x = StateVector::default();

        // Body acceleration feeds velocity, earth velocity feeds position
        let deriv = |_t: f64, x: &StateVector| {
            let mut dx = StateDerivative::default();
            dx[0] = x[3];
            dx[3] = 2.0;
            dx
        };

        for _ in 0..100 {
            let t = 0.0;
            rk4.step(t, &mut x, deriv);
        }

        // After 1 s: v = 2 m/s, x = 1 m (polynomial, integrated exactly)
        assert_relative_eq!(x[3], 2.0, epsilon = 1e-9);
        assert_relative_eq!(x[0], 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_harmonic_oscillator_accuracy() {
        // x'' = -x on the (position, velocity) pair; RK4 at h = 0.01 keeps
        // a full period accurate to well under a micro-unit
        let rk4 = RungeKutta4::new(0.01);
        let mut x = StateVector::default();
        x[0] = 1.0;

        let deriv = |_t: f64, x: &StateVector| {
            let mut dx = StateDerivative::default();
            dx[0] = x[3];
            dx[3] = -x[0];
            dx
        };

        let steps = (2.0 * PI / 0.01) as usize;
        for _ in 0..steps {
            rk4.step(0.0, &mut x, deriv);
        }

        let t_end = steps as f64 * 0.01;
        assert_relative_eq!(x[0], t_end.cos(), epsilon = 1e-6);
        assert_relative_eq!(x[3], -t_end.sin(), epsilon = 1e-6);
    }

    #[test]
    fn test_attitude_wrap_after_step() {
        let rk4 = RungeKutta4::new(0.5);
        let mut x = StateVector::default();
        x[8] = PI - 0.1;

        // Constant yaw rate pushes past pi; the step wraps it back
        let deriv = |_t: f64, _x: &StateVector| {
            let mut dx = StateDerivative::default();
            dx[8] = 1.0;
            dx
        };
        rk4.step(0.0, &mut x, deriv);

        assert_relative_eq!(x[8], -PI + 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_returns_final_stage_derivative() {
        let rk4 = RungeKutta4::new(0.1);
        let mut x = StateVector::default();

        // Time-dependent derivative: the returned value is the evaluation
        // at t + h, not the blended increment
        let deriv = |t: f64, _x: &StateVector| {
            let mut dx = StateDerivative::default();
            dx[3] = t;
            dx
        };
        let dx = rk4.step(1.0, &mut x, deriv);
        assert_relative_eq!(dx[3], 1.1, epsilon = 1e-12);
    }
}

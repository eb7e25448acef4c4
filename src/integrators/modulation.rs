// Copyright @yucwang 2026

use crate::math::constants::{Float, TWO_PI};

/// Continuous-wave time-of-flight modulation parameters. Frequencies are
/// in MHz with the propagation speed in metres per microsecond, so phase
/// terms stay well scaled for f32.
#[derive(Debug, Clone, Copy)]
pub struct ModulationConfig {
    /// Illumination modulation frequency, MHz.
    pub w_g_mhz: Float,
    /// Sensor reference frequency, MHz.
    pub w_f_mhz: Float,
    /// Illumination/sensor frequency difference, Hz.
    pub w_delta_hz: Float,
    /// Wave propagation speed, metres per microsecond.
    pub propagation_speed: Float,
    /// Length of the exposure window a path integrates over.
    pub exposure_time: Float,
}

impl Default for ModulationConfig {
    fn default() -> Self {
        Self {
            w_g_mhz: 30.0,
            w_f_mhz: 30.0,
            w_delta_hz: 0.0,
            propagation_speed: 300.0,
            exposure_time: 1.0,
        }
    }
}

impl ModulationConfig {
    /// Phase accumulated per unit of travelled path length.
    fn phase_scale(&self) -> Float {
        TWO_PI * self.w_g_mhz / self.propagation_speed
    }

    /// Correlation weight of a single acquisition instant `t_c` for a path
    /// of the given total length.
    pub fn eval_modulation_weight(&self, t_c: Float, path_length: Float) -> Float {
        let phi = self.phase_scale() * path_length;
        0.25 * (TWO_PI * self.w_delta_hz * t_c + phi).cos()
    }

    /// Closed-form integral of the correlation weight over the exposure
    /// window `[st, et]`, for a surface point whose path length drifts
    /// linearly from `path_length` to `path_length_at_t` over the window
    /// and whose transport throughput changes by `f_value_ratio_inc`
    /// (geometric-term ratio minus one) across it.
    ///
    /// Integrand: `0.25 * (1 + c*tau) * cos(a*tau + b)` with
    /// `a = 2*pi*w_delta - w_drift`, `b = phi(path_length)`,
    /// `c = f_value_ratio_inc / (et - st)`.
    pub fn eval_modulation_integration_weight(&self, st: Float, et: Float,
                                              path_length: Float,
                                              path_length_at_t: Float,
                                              f_value_ratio_inc: Float) -> Float {
        let temp = self.phase_scale();
        let w_delta = -temp * (path_length_at_t - path_length) / (et - st);
        let phi = temp * path_length;

        let a = TWO_PI * self.w_delta_hz - w_delta;
        let b = phi;
        let c = f_value_ratio_inc / (et - st);

        let s1 = 0.5;

        if a.abs() < 1.0 {
            // Near-zero net phase drift: the oscillation is effectively
            // constant over the window, and the exact antiderivative would
            // divide by near-zero `a`. Integrate the linear-in-time
            // expansion of the cosine instead.
            let b_cos = b.cos();
            let upper = b_cos * et + 0.5 * c * et * et * b_cos;
            let lower = b_cos * st + 0.5 * c * st * st * b_cos;
            s1 / 2.0 * (upper - lower)
        } else {
            // Exact antiderivative of (1 + c*tau) * cos(a*tau + b); the
            // linear term integrates by parts into a cos/a^2 correction.
            let upper = (a * et + b).sin() / a
                + c * et * (a * et + b).sin() / a
                + c * (a * et + b).cos() / (a * a);
            let lower = (a * st + b).sin() / a
                + c * st * (a * st + b).sin() / a
                + c * (a * st + b).cos() / (a * a);
            s1 / 2.0 * (upper - lower)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(w_delta_hz: Float) -> ModulationConfig {
        ModulationConfig {
            w_g_mhz: 30.0,
            w_f_mhz: 30.0,
            w_delta_hz,
            propagation_speed: 300.0,
            exposure_time: 1.0,
        }
    }

    #[test]
    fn test_discrete_weight_at_origin() {
        let m = config(0.0);
        // Zero path length and zero instant: cos(0) scaled by 1/4.
        assert!((m.eval_modulation_weight(0.0, 0.0) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_discrete_weight_phase() {
        let m = config(0.0);
        // One full modulation wavelength of extra path length leaves the
        // weight unchanged.
        let wavelength = m.propagation_speed / m.w_g_mhz;
        let w0 = m.eval_modulation_weight(0.2, 3.0);
        let w1 = m.eval_modulation_weight(0.2, 3.0 + wavelength);
        assert!((w0 - w1).abs() < 1e-4);
    }

    #[test]
    fn test_integration_matches_quadrature() {
        // Oscillating branch (|a| >= 1) against trapezoidal quadrature of
        // 0.25 * (1 + c*tau) * cos(a*tau + b).
        let m = config(3.0);
        let (st, et) = (0.0, 2.0);
        let length = 7.0;
        let length_at_t = 7.5;
        let ratio_inc = 0.2;

        let closed = m.eval_modulation_integration_weight(st, et, length, length_at_t, ratio_inc);

        let temp = TWO_PI * m.w_g_mhz / m.propagation_speed;
        let w_delta = -temp * (length_at_t - length) / (et - st);
        let a = TWO_PI * m.w_delta_hz - w_delta;
        let b = temp * length;
        let c = ratio_inc / (et - st);

        let steps = 20000;
        let dt = (et - st) / steps as Float;
        let mut sum = 0.0f64;
        for i in 0..=steps {
            let tau = st + i as Float * dt;
            let f = 0.25 * (1.0 + c * tau) * (a * tau + b).cos();
            let scale = if i == 0 || i == steps { 0.5 } else { 1.0 };
            sum += (scale * f * dt) as f64;
        }

        assert!((closed as f64 - sum).abs() < 1e-3);
    }

    #[test]
    fn test_analytic_discrete_consistency() {
        // Shrinking the exposure window recovers the single-instant weight
        // to first order.
        let m = config(3.0);
        let length = 7.0;
        let t = 0.3;
        let eps = 1e-3;

        let integral = m.eval_modulation_integration_weight(t, t + eps, length, length, 0.0);
        let discrete = m.eval_modulation_weight(t, length);
        assert!((integral / eps - discrete).abs() < 5e-3);
    }

    #[test]
    fn test_analytic_discrete_consistency_small_drift() {
        // |a| < 1 branch, window starting at zero.
        let m = config(0.05);
        let length = 4.0;
        let eps = 1e-3;

        let integral = m.eval_modulation_integration_weight(0.0, eps, length, length, 0.0);
        let discrete = m.eval_modulation_weight(0.0, length);
        assert!((integral / eps - discrete).abs() < 5e-3);
    }

    #[test]
    fn test_integration_branch_continuity() {
        // The two branches agree near the |a| = 1 threshold for small c.
        let temp = TWO_PI * 30.0 / 300.0;
        let drift_for = |a_target: Float| -> Float {
            // Solve a = 2*pi*w_delta - w_drift for the path-length drift
            // with w_delta = 0.
            a_target / temp
        };

        let m = config(0.0);
        let et = 1.0;
        let length = 5.0;

        let just_below = m.eval_modulation_integration_weight(
            0.0, et, length, length + drift_for(0.999), 0.0);
        let just_above = m.eval_modulation_integration_weight(
            0.0, et, length, length + drift_for(1.001), 0.0);
        assert!((just_below - just_above).abs() < 0.05);
    }
}

//! Recursive scalar estimator
//!
//! A one-dimensional Kalman filter over a constant-state model:
//!
//! ```text
//! Predict:  P ← P + Q
//! Correct:  K = P / (P + R)
//!           x ← x + K·(value − x)
//!           P ← (1 − K)·P
//! ```
//!
//! The measurement-noise estimate R adapts as an exponential average of
//! the squared residual, `R ← 0.99·R + 0.01·err²`, so the gain tracks the
//! observed volatility of the channel instead of a fixed datasheet figure.
//! R lives in this state, a corrected copy of the installed configuration;
//! the caller's config object is never written back.

use crate::config::KalmanParams;

/// Covariance before the first sample: wide open, trust the measurement.
const INITIAL_COVARIANCE: f32 = 1.0;

/// Smoothing weight for the adaptive measurement-noise estimate.
const NOISE_ADAPTATION: f32 = 0.01;

/// Scalar Kalman working state.
#[derive(Debug, Clone)]
pub struct Kalman {
    /// State estimate x
    x: f32,
    /// Estimation error covariance P
    p: f32,
    /// Process noise Q (fixed)
    q: f32,
    /// Measurement noise R (adapted at runtime)
    r: f32,
}

impl Kalman {
    /// Fresh estimator from validated tuning.
    pub fn new(params: &KalmanParams) -> Self {
        Self {
            x: params.initial_state,
            p: INITIAL_COVARIANCE,
            q: params.process_noise,
            r: params.measurement_noise,
        }
    }

    /// Adopt the channel's first accepted sample as the state.
    pub fn seed(&mut self, value: f32) -> f32 {
        self.x = value;
        value
    }

    /// One predict/correct cycle; returns the new estimate.
    pub fn update(&mut self, value: f32) -> f32 {
        // Predict (constant model: state carries over)
        let p_pred = self.p + self.q;

        // Correct
        let gain = p_pred / (p_pred + self.r);
        self.x += gain * (value - self.x);
        self.p = (1.0 - gain) * p_pred;

        // Track observed volatility
        let residual = value - self.x;
        self.r = (1.0 - NOISE_ADAPTATION) * self.r + NOISE_ADAPTATION * residual * residual;

        self.x
    }

    /// Current error covariance (diagnostics).
    pub fn covariance(&self) -> f32 {
        self.p
    }
}

//! Forgetting-factor recursive estimator
//!
//! Recursive-least-squares style with a scalar gain: same ring-buffer dot
//! product and error term as the gradient-adaptive estimator, but the step
//! size comes from a covariance-like scalar P discounted by the forgetting
//! factor λ each iteration:
//!
//! ```text
//! out  = Σ wₖ·xₖ
//! err  = value − out
//! g    = P / (λ + P)
//! wₖ   ← wₖ + g·err·xₖ
//! P    ← (P − g·P) / λ
//! ```
//!
//! λ close to 1 weighs history heavily; smaller values track change faster
//! at the cost of noise sensitivity. Validation confines λ to (0, 1].

use crate::{config::RlsParams, constants::MAX_TAPS, window::Window};

/// Covariance scalar before the first update.
const INITIAL_COVARIANCE: f32 = 1.0;

/// Forgetting-factor working state.
#[derive(Debug, Clone)]
pub struct Rls {
    /// Adaptive tap vector, newest-first alignment with the buffer
    taps: [f32; MAX_TAPS],
    /// Filter order (taps in use)
    order: usize,
    /// Ring buffer of recent raw inputs
    buffer: Window,
    /// Covariance-like gain state P
    p: f32,
    /// Forgetting factor λ in (0, 1]
    lambda: f32,
}

impl Rls {
    /// Fresh estimator of the given order.
    pub fn new(order: usize, params: &RlsParams) -> Self {
        let order = order.clamp(1, MAX_TAPS);
        Self {
            taps: [0.0; MAX_TAPS],
            order,
            buffer: Window::new(order),
            p: INITIAL_COVARIANCE,
            lambda: params.forgetting_factor,
        }
    }

    /// Prime the input buffer with the channel's first accepted sample.
    pub fn seed(&mut self, value: f32) -> f32 {
        self.buffer.fill(value);
        value
    }

    /// One adaptation step; returns the new output.
    pub fn update(&mut self, value: f32) -> f32 {
        self.buffer.push(value);

        let mut output = 0.0;
        for k in 0..self.order {
            if let Some(x) = self.buffer.back(k) {
                output += self.taps[k] * x;
            }
        }

        let error = value - output;
        let gain = self.p / (self.lambda + self.p);
        for k in 0..self.order {
            if let Some(x) = self.buffer.back(k) {
                self.taps[k] += gain * error * x;
            }
        }
        self.p = (self.p - gain * self.p) / self.lambda;

        output
    }
}

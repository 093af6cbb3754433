//! Exponential moving average
//!
//! Classic first-order smoother with a base coefficient derived from the
//! configured window length, `α₀ = 2 / (length + 1)`, modulated by the
//! staleness decay factor:
//!
//! ```text
//! α = 1 − decay · (1 − α₀)
//! estimate ← α·value + (1 − α)·estimate
//! ```
//!
//! Polarity note: as decay → 0 (a very late sample), α → 1 and the sample
//! is trusted *fully* rather than blended. A reading that survived the
//! significance gate after a long gap is taken as the new reality; the
//! filter's memory is what has gone stale, not the sample. This matches
//! the documented behavior of the deployed revisions.

/// Exponential-average working state.
#[derive(Debug, Clone)]
pub struct Ema {
    /// Base smoothing coefficient α₀ = 2/(length+1)
    base_alpha: f32,
}

impl Ema {
    /// Smoother equivalent to an SMA of the given window length.
    pub fn new(length: usize) -> Self {
        Self {
            base_alpha: 2.0 / (length.max(1) as f32 + 1.0),
        }
    }

    /// Blend one sample into the estimate.
    pub fn update(&self, estimate: f32, value: f32, decay: f32) -> f32 {
        let alpha = 1.0 - decay * (1.0 - self.base_alpha);
        alpha * value + (1.0 - alpha) * estimate
    }

    /// Base coefficient, exposed for reconfiguration checks.
    pub fn base_alpha(&self) -> f32 {
        self.base_alpha
    }
}

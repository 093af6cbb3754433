//! Windowed average and finite impulse response
//!
//! SMA and FIR share one implementation: a fixed tap vector (uniform
//! `1/N` weights for SMA, caller-supplied weights for FIR) convolved with
//! a history window of recent raw samples, newest first.
//!
//! ## Decay handling
//!
//! The newest tap always contributes at full weight; every older tap is
//! scaled by the decay factor. When the decayed weights no longer sum to
//! 1, the shortfall is re-assigned to the newest sample, biasing the
//! output toward what just arrived as older history decays away:
//!
//! ```text
//! out = w₀·x₀ + decay·Σ wₖ·xₖ           (k ≥ 1, newest-first indexing)
//! out += (1 − Σ applied weights)·x₀     when the applied sum is < 1
//! ```
//!
//! Evaluation is a pure function of the current history and decay factor:
//! recomputing with the same inputs gives the same output.

use heapless::Vec;

use crate::{constants::MAX_TAPS, window::Window};

/// SMA/FIR working state: tap weights plus sample history.
#[derive(Debug, Clone)]
pub struct Windowed {
    /// Tap weights, newest-first; fixed after construction
    taps: Vec<f32, MAX_TAPS>,
    /// Recent raw samples
    history: Window,
}

impl Windowed {
    /// Uniform moving average over `length` samples.
    pub fn sma(length: usize) -> Self {
        let length = length.clamp(1, MAX_TAPS);
        let mut taps = Vec::new();
        for _ in 0..length {
            // Cannot fail: length clamped to capacity
            let _ = taps.push(1.0 / length as f32);
        }
        Self {
            taps,
            history: Window::new(length),
        }
    }

    /// FIR with caller-supplied tap weights (newest tap first).
    pub fn fir(weights: &[f32]) -> Self {
        let mut taps = Vec::new();
        for &w in weights.iter().take(MAX_TAPS) {
            let _ = taps.push(w);
        }
        if taps.is_empty() {
            // Unreachable through validated config; degrade to passthrough
            let _ = taps.push(1.0);
        }
        let len = taps.len();
        Self {
            taps,
            history: Window::new(len),
        }
    }

    /// Seed the history with the channel's first accepted sample.
    pub fn seed(&mut self, value: f32) -> f32 {
        self.history.fill(value);
        self.evaluate(1.0)
    }

    /// Push one sample and recompute the output.
    pub fn update(&mut self, value: f32, decay: f32) -> f32 {
        self.history.push(value);
        self.evaluate(1.0_f32.min(decay).max(0.0))
    }

    /// Weighted sum over the current history at the given decay factor.
    fn evaluate(&self, decay: f32) -> f32 {
        let newest = match self.history.newest() {
            Some(v) => v,
            None => return 0.0,
        };

        let mut output = self.taps[0] * newest;
        let mut applied = self.taps[0];

        for (k, &tap) in self.taps.iter().enumerate().skip(1) {
            let sample = match self.history.back(k) {
                Some(s) => s,
                None => break,
            };
            let scaled = tap * decay;
            output += scaled * sample;
            applied += scaled;
        }

        // Re-assign the decayed-away weight to the newest sample
        if applied < 1.0 {
            output += (1.0 - applied) * newest;
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_is_plain_average_at_full_decay() {
        let mut w = Windowed::sma(4);
        w.seed(0.0);
        for v in [4.0, 8.0, 12.0, 16.0] {
            w.update(v, 1.0);
        }
        let out = w.update(20.0, 1.0);
        // Window now holds [8, 12, 16, 20]
        assert!((out - 14.0).abs() < 1e-5);
    }

    #[test]
    fn fir_matches_weighted_sum_at_full_decay() {
        let taps = [0.5, 0.3, 0.2];
        let mut w = Windowed::fir(&taps);
        w.seed(0.0);
        w.update(1.0, 1.0);
        w.update(2.0, 1.0);
        let out = w.update(3.0, 1.0);
        // newest-first: 0.5*3 + 0.3*2 + 0.2*1
        assert!((out - 2.3).abs() < 1e-5);
    }

    #[test]
    fn seed_fills_history_with_baseline() {
        let mut w = Windowed::sma(5);
        let baseline = w.seed(7.0);
        assert!((baseline - 7.0).abs() < 1e-6);
    }

    #[test]
    fn zero_decay_trusts_only_the_newest_sample() {
        let mut w = Windowed::sma(4);
        w.seed(100.0);
        // Fully stale arrival: older taps vanish, shortfall goes to newest
        let out = w.update(2.0, 0.0);
        assert!((out - 2.0).abs() < 1e-5);
    }

    #[test]
    fn partial_decay_biases_toward_newest() {
        let mut w = Windowed::sma(2);
        w.seed(0.0);
        w.update(10.0, 1.0);
        // history [10, 20]; decay 0.5: 0.5*20 + 0.25*10 + shortfall 0.25*20
        let out = w.update(20.0, 0.5);
        assert!((out - 17.5).abs() < 1e-5);
    }

    #[test]
    fn unnormalized_fir_runs_with_gain() {
        let mut w = Windowed::fir(&[2.0]);
        w.seed(0.0);
        let out = w.update(3.0, 1.0);
        assert!((out - 6.0).abs() < 1e-6);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let mut w = Windowed::sma(3);
        w.seed(1.0);
        w.update(2.0, 1.0);
        let a = w.evaluate(0.7);
        let b = w.evaluate(0.7);
        assert_eq!(a, b);
    }
}

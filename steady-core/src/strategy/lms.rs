//! Gradient-adaptive estimator
//!
//! Least-mean-squares style: the output is the dot product of an adaptive
//! tap vector with a ring buffer of the last `L` raw inputs, and each tap
//! is nudged along the error gradient:
//!
//! ```text
//! out   = Σ wₖ·xₖ            (newest-first buffer reads)
//! err   = value − out
//! wₖ    ← wₖ + µ·err·xₖ
//! ```
//!
//! ## Robust outlier guard
//!
//! With a nonzero outlier multiplier the update is guarded by a robust
//! dispersion measure over the buffer: the median absolute deviation,
//! scaled by 1.4826 to be consistent with a normal sigma. Samples farther
//! from the buffer median than `multiplier × dispersion` are discarded
//! without touching the taps. For accepted samples the learning rate is
//! scaled inversely by the dispersion and clamped to
//! `[LEARNING_RATE_MIN, LEARNING_RATE_MAX]`, so a volatile buffer adapts
//! cautiously. A degenerate dispersion (constant buffer) disables the
//! guard for that sample rather than rejecting everything.

use libm::fabsf;

use crate::{
    config::LmsParams,
    constants::{
        LEARNING_RATE_MAX, LEARNING_RATE_MIN, MAD_SIGMA_SCALE, MAX_TAPS, SIGNIFICANCE_EPSILON,
    },
    window::Window,
};

/// Gradient-adaptive working state.
#[derive(Debug, Clone)]
pub struct Lms {
    /// Adaptive tap vector, newest-first alignment with the buffer
    taps: [f32; MAX_TAPS],
    /// Filter order (taps in use)
    order: usize,
    /// Ring buffer of recent raw inputs
    buffer: Window,
    /// Base learning rate µ
    learning_rate: f32,
    /// Rejection threshold in robust sigmas; 0 disables the guard
    outlier_multiplier: f32,
}

impl Lms {
    /// Fresh estimator of the given order.
    pub fn new(order: usize, params: &LmsParams) -> Self {
        let order = order.clamp(1, MAX_TAPS);
        Self {
            taps: [0.0; MAX_TAPS],
            order,
            buffer: Window::new(order),
            learning_rate: params.learning_rate,
            outlier_multiplier: params.outlier_multiplier,
        }
    }

    /// Prime the input buffer with the channel's first accepted sample.
    pub fn seed(&mut self, value: f32) -> f32 {
        self.buffer.fill(value);
        value
    }

    /// One adaptation step; `None` when the outlier guard rejects the
    /// sample.
    pub fn update(&mut self, value: f32) -> Option<f32> {
        let mut rate = self.learning_rate;

        if self.outlier_multiplier > 0.0 && !self.buffer.is_empty() {
            let (median, dispersion) = robust_stats(&self.buffer);
            // Constant buffer gives no usable scale; skip the guard.
            if dispersion > SIGNIFICANCE_EPSILON {
                if fabsf(value - median) > self.outlier_multiplier * dispersion {
                    return None;
                }
                rate = (self.learning_rate / dispersion)
                    .clamp(LEARNING_RATE_MIN, LEARNING_RATE_MAX);
            }
        }

        self.buffer.push(value);

        let mut output = 0.0;
        for k in 0..self.order {
            if let Some(x) = self.buffer.back(k) {
                output += self.taps[k] * x;
            }
        }

        let error = value - output;
        for k in 0..self.order {
            if let Some(x) = self.buffer.back(k) {
                self.taps[k] += rate * error * x;
            }
        }

        Some(output)
    }
}

/// Median and 1.4826-scaled median absolute deviation of the buffer.
fn robust_stats(buffer: &Window) -> (f32, f32) {
    let mut values = [0.0_f32; MAX_TAPS];
    let n = buffer.len();
    for k in 0..n {
        if let Some(v) = buffer.back(k) {
            values[k] = v;
        }
    }

    let median = median_in_place(&mut values[..n]);

    let mut deviations = [0.0_f32; MAX_TAPS];
    for (d, &v) in deviations[..n].iter_mut().zip(values[..n].iter()) {
        *d = fabsf(v - median);
    }
    let mad = median_in_place(&mut deviations[..n]);

    (median, MAD_SIGMA_SCALE * mad)
}

/// Median by insertion sort; the slices here are at most MAX_TAPS long.
fn median_in_place(values: &mut [f32]) -> f32 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    for i in 1..n {
        let mut j = i;
        while j > 0 && values[j - 1] > values[j] {
            values.swap(j - 1, j);
            j -= 1;
        }
    }
    if n % 2 == 1 {
        values[n / 2]
    } else {
        0.5 * (values[n / 2 - 1] + values[n / 2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> LmsParams {
        LmsParams {
            learning_rate: 0.05,
            outlier_multiplier: 0.0,
        }
    }

    #[test]
    fn median_of_small_slices() {
        assert_eq!(median_in_place(&mut [3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median_in_place(&mut [4.0, 1.0, 2.0, 3.0]), 2.5);
        assert_eq!(median_in_place(&mut [5.0]), 5.0);
    }

    #[test]
    fn adapts_toward_constant_input() {
        let mut lms = Lms::new(4, &params());
        lms.seed(1.0);
        let mut out = 0.0;
        for _ in 0..500 {
            out = lms.update(1.0).unwrap();
        }
        // Taps start at zero, so the output climbs from 0 toward the input
        assert!((out - 1.0).abs() < 0.05);
    }

    #[test]
    fn guard_disabled_accepts_spikes() {
        let mut lms = Lms::new(4, &params());
        lms.seed(1.0);
        assert!(lms.update(1000.0).is_some());
    }

    #[test]
    fn guard_rejects_deviant_sample() {
        let p = LmsParams {
            learning_rate: 0.05,
            outlier_multiplier: 3.0,
        };
        let mut lms = Lms::new(5, &p);
        lms.seed(10.0);
        // Build some spread so the dispersion is usable
        for v in [10.0, 11.0, 9.0, 10.5, 9.5] {
            assert!(lms.update(v).is_some());
        }
        // Far outside 3 robust sigmas of the buffer
        assert!(lms.update(500.0).is_none());
        // Ordinary sample still passes
        assert!(lms.update(10.2).is_some());
    }

    #[test]
    fn constant_buffer_skips_guard() {
        let p = LmsParams {
            learning_rate: 0.05,
            outlier_multiplier: 3.0,
        };
        let mut lms = Lms::new(4, &p);
        lms.seed(5.0);
        // Dispersion is zero right after seeding; the guard must not
        // reject everything that differs from the seed.
        assert!(lms.update(8.0).is_some());
    }
}

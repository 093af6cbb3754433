//! Significance gate
//!
//! Suppresses filter updates for samples too close to the current estimate
//! to be meaningful change, cutting algorithmic churn on quiet channels.
//! The gate is a relative test against the *current estimate*, not the
//! previous raw sample, so a slow drift still accumulates into updates.
//!
//! The first sample of a channel's life never reaches this gate; the
//! channel accepts it unconditionally to establish a baseline (enforced in
//! `channel`).

use libm::fabsf;

use crate::constants::SIGNIFICANCE_EPSILON;

/// True when `value` differs from `estimate` by at least `threshold_pct`
/// percent.
///
/// A threshold of 0 disables the gate. Estimates within
/// [`SIGNIFICANCE_EPSILON`] of zero also pass everything, to keep the
/// relative-change division well-behaved.
pub fn is_significant(estimate: f32, value: f32, threshold_pct: f32) -> bool {
    if threshold_pct == 0.0 {
        return true;
    }
    if fabsf(estimate) < SIGNIFICANCE_EPSILON {
        return true;
    }
    let change = fabsf(value - estimate) / fabsf(estimate);
    change * 100.0 >= threshold_pct
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_threshold_accepts_everything() {
        assert!(is_significant(100.0, 100.0, 0.0));
        assert!(is_significant(100.0, 100.000001, 0.0));
    }

    #[test]
    fn near_zero_estimate_accepts_everything() {
        assert!(is_significant(0.0, 0.0001, 5.0));
        assert!(is_significant(1e-9, 42.0, 50.0));
    }

    #[test]
    fn relative_threshold() {
        // 5% gate around 100.0
        assert!(!is_significant(100.0, 104.9, 5.0));
        assert!(is_significant(100.0, 105.0, 5.0));
        assert!(is_significant(100.0, 94.0, 5.0));
        assert!(!is_significant(100.0, 96.0, 5.0));
    }

    #[test]
    fn symmetric_around_negative_estimates() {
        assert!(is_significant(-100.0, -110.0, 5.0));
        assert!(!is_significant(-100.0, -101.0, 5.0));
    }
}

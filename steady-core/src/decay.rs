//! Staleness decay model
//!
//! Maps the time elapsed since a channel's last accepted sample to a blend
//! factor in `[0, 1]`. Channels with irregular cadence (radio links, shared
//! buses) should not treat a stale gap the same as an on-schedule arrival;
//! the factor de-weights timing gaps smoothly instead of discontinuously.
//!
//! - On schedule (`delta ≤ expected interval`): 1.0, trust the sample fully.
//! - Fully stale (`delta ≥ max decay time`): 0.0.
//! - In between: linear interpolation, strictly decreasing in `delta`.
//!
//! How a factor of 0.0 is interpreted is up to each strategy: the
//! exponential average deliberately treats a fully stale sample as a fresh
//! baseline (see `strategy::ema`), while windowed filters decay the
//! contribution of older taps.

/// Blend factor for a sample arriving `delta_ms` after the last accepted
/// one.
pub fn decay_factor(expected_interval_ms: u64, max_decay_ms: u64, delta_ms: u64) -> f32 {
    if delta_ms <= expected_interval_ms {
        1.0
    } else if delta_ms >= max_decay_ms {
        0.0
    } else {
        // Both branches above missed, so max_decay > expected here and the
        // denominator is nonzero.
        1.0 - (delta_ms - expected_interval_ms) as f32
            / (max_decay_ms - expected_interval_ms) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn on_schedule_is_full_trust() {
        assert_eq!(decay_factor(1000, 10_000, 0), 1.0);
        assert_eq!(decay_factor(1000, 10_000, 999), 1.0);
        assert_eq!(decay_factor(1000, 10_000, 1000), 1.0);
    }

    #[test]
    fn fully_stale_is_zero() {
        assert_eq!(decay_factor(1000, 10_000, 10_000), 0.0);
        assert_eq!(decay_factor(1000, 10_000, 60_000), 0.0);
    }

    #[test]
    fn linear_in_between() {
        // Midpoint of [1000, 10000] is 5500
        let mid = decay_factor(1000, 10_000, 5_500);
        assert!((mid - 0.5).abs() < 1e-6);
    }

    #[test]
    fn strictly_decreasing_between_bounds() {
        let mut prev = decay_factor(1000, 10_000, 1001);
        for delta in (1002..10_000).step_by(97) {
            let f = decay_factor(1000, 10_000, delta);
            assert!(f < prev, "not decreasing at delta={delta}");
            assert!(f > 0.0 && f < 1.0);
            prev = f;
        }
    }

    #[test]
    fn degenerate_window_never_divides_by_zero() {
        // Clamped floors can leave expected >= max; the piecewise branches
        // cover every delta without reaching the division.
        assert_eq!(decay_factor(2000, 1000, 500), 1.0);
        assert_eq!(decay_factor(2000, 1000, 2000), 1.0);
        assert_eq!(decay_factor(2000, 1000, 2001), 0.0);
    }
}

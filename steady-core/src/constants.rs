//! Constants for the conditioning core
//!
//! Centralized, documented limits and defaults used throughout the engine.
//! Values marked "floor" are silently clamped during configuration
//! validation; values marked "default" replace out-of-range tuning
//! parameters.

/// Maximum number of channels one engine can own.
///
/// Channel state is stored in a fixed-capacity vector, so this bounds the
/// engine's memory footprint at compile time.
pub const MAX_CHANNELS: usize = 16;

/// Maximum filter length (window size, FIR tap count, estimator order).
///
/// History windows and adaptive coefficient buffers are fixed-storage
/// arrays of this size; configurations asking for more are rejected.
pub const MAX_TAPS: usize = 32;

/// Floor for the pulse dead-time in microseconds.
///
/// Below ~10 µs a retrigger cannot be distinguished from contact bounce or
/// line noise on the sort of detectors this engine targets.
pub const MIN_DEAD_TIME_US: f32 = 10.0;

/// Floor for the maximum decay time in milliseconds.
///
/// A decay window shorter than one second would zero out the blend factor
/// on ordinary bus jitter.
pub const MIN_DECAY_WINDOW_MS: u64 = 1_000;

/// Warm-up floor for count-mode channels in milliseconds.
///
/// Rate estimates over less than a minute are statistically meaningless
/// for low-count-rate detectors, whatever the configuration says.
pub const COUNT_WARM_UP_FLOOR_MS: u64 = 60_000;

/// Minimum interval between two rate computations in milliseconds.
pub const RATE_WINDOW_MS: u64 = 60_000;

/// Estimates closer to zero than this bypass the significance gate.
///
/// Keeps the relative-change division from blowing up near zero.
pub const SIGNIFICANCE_EPSILON: f32 = 1e-6;

/// FIR tap sums further than this from 1.0 trigger a gain warning.
pub const TAP_SUM_TOLERANCE: f32 = 0.01;

/// Scale factor turning a median absolute deviation into a robust sigma.
///
/// 1.4826 makes the MAD consistent with the standard deviation of a
/// normal distribution.
pub const MAD_SIGMA_SCALE: f32 = 1.4826;

/// Default gradient-descent learning rate when the configured one is
/// outside (0, 1).
pub const DEFAULT_LEARNING_RATE: f32 = 0.01;

/// Clamp range for the dispersion-scaled learning rate.
pub const LEARNING_RATE_MIN: f32 = 1e-4;
/// Upper clamp for the dispersion-scaled learning rate.
pub const LEARNING_RATE_MAX: f32 = 0.5;

/// Default forgetting factor when the configured one is outside (0, 1].
pub const DEFAULT_FORGETTING_FACTOR: f32 = 0.99;

/// Default process noise for the recursive scalar estimator.
pub const DEFAULT_PROCESS_NOISE: f32 = 0.01;

/// Default measurement noise for the recursive scalar estimator.
pub const DEFAULT_MEASUREMENT_NOISE: f32 = 0.1;

/// Default outlier rejection multiplier (in robust sigmas).
pub const DEFAULT_OUTLIER_MULTIPLIER: f32 = 3.0;

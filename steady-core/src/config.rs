//! Per-channel filter configuration
//!
//! A [`FilterConfig`] is the value object a host installs for each channel.
//! It is validated once, at installation time, through
//! [`FilterConfig::validated`], which returns a **corrected copy**: the
//! caller's object is never mutated. Validation applies three policies:
//!
//! - **Fail fast** for structural problems: non-positive sample rate,
//!   window length outside `[1, MAX_TAPS]`, FIR without coefficients.
//!   These would leave the channel unable to run at all.
//! - **Clamp silently** for fields with documented floors: dead-time
//!   (≥ 10 µs), maximum decay time (≥ 1 s), threshold (≥ 0 %), count-mode
//!   warm-up (≥ 60 s). The original hardware deployments clamped these
//!   the same way.
//! - **Default with a warning** for algorithm tuning parameters outside
//!   their valid range: learning rate, forgetting factor, noise
//!   covariances, outlier multiplier. A bad tuning value degrades the
//!   filter, it does not break it.
//!
//! FIR tap sums far from 1.0 produce a warning only: the filter still runs
//! with unnormalized gain.

use heapless::Vec;
use libm::fabsf;

use crate::{
    constants::{
        DEFAULT_FORGETTING_FACTOR, DEFAULT_LEARNING_RATE, DEFAULT_MEASUREMENT_NOISE,
        DEFAULT_OUTLIER_MULTIPLIER, DEFAULT_PROCESS_NOISE, COUNT_WARM_UP_FLOOR_MS,
        MAX_TAPS, MIN_DEAD_TIME_US, MIN_DECAY_WINDOW_MS, TAP_SUM_TOLERANCE,
    },
    errors::{ConfigError, ConfigResult},
};

// Macro for optional logging
#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {{}};
}

/// Filter strategy selector for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FilterKind {
    /// Exponential moving average
    Ema,
    /// Simple moving average (uniform window)
    Sma,
    /// Finite impulse response with supplied tap weights
    Fir,
    /// Recursive scalar estimator with adaptive measurement noise
    Kalman,
    /// Gradient-adaptive estimator with optional robust outlier guard
    Lms,
    /// Forgetting-factor recursive estimator
    Rls,
}

impl FilterKind {
    /// Short name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ema => "EMA",
            Self::Sma => "SMA",
            Self::Fir => "FIR",
            Self::Kalman => "Kalman",
            Self::Lms => "LMS",
            Self::Rls => "RLS",
        }
    }
}

/// Operating mode of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChannelMode {
    /// Continuous-value readings (ADC, environmental sensors)
    Continuous,
    /// Discrete event counting (Geiger-Müller tubes, tipping buckets)
    Count,
}

/// Tuning for the recursive scalar estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KalmanParams {
    /// Process noise Q (higher = less trust in the constant model)
    pub process_noise: f32,
    /// Initial measurement noise R; adapted at runtime from residuals
    pub measurement_noise: f32,
    /// State estimate before the first sample arrives
    pub initial_state: f32,
}

impl Default for KalmanParams {
    fn default() -> Self {
        Self {
            process_noise: DEFAULT_PROCESS_NOISE,
            measurement_noise: DEFAULT_MEASUREMENT_NOISE,
            initial_state: 0.0,
        }
    }
}

/// Tuning for the gradient-adaptive estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LmsParams {
    /// Base learning rate, valid in (0, 1)
    pub learning_rate: f32,
    /// Outlier rejection threshold in robust sigmas; 0 disables the guard
    pub outlier_multiplier: f32,
}

impl Default for LmsParams {
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            outlier_multiplier: 0.0,
        }
    }
}

/// Tuning for the forgetting-factor recursive estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RlsParams {
    /// Forgetting factor λ, valid in (0, 1]
    pub forgetting_factor: f32,
}

impl Default for RlsParams {
    fn default() -> Self {
        Self {
            forgetting_factor: DEFAULT_FORGETTING_FACTOR,
        }
    }
}

/// Configuration value object for one channel.
///
/// Construct with [`FilterConfig::new`] and the `with_*` builders, then
/// hand to the engine, which validates and stores a corrected copy.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterConfig {
    /// Which update rule the channel runs
    pub kind: FilterKind,
    /// Window length for EMA/SMA, filter order for LMS/RLS.
    /// For FIR this is derived from the tap list.
    pub window_length: usize,
    /// FIR tap weights, most recent tap first
    pub taps: Vec<f32, MAX_TAPS>,
    /// Nominal sampling frequency in Hz
    pub sample_rate_hz: f32,
    /// Elapsed time at which a sample's decay factor reaches zero (ms)
    pub max_decay_ms: u64,
    /// Samples are ignored this long after channel start (ms)
    pub warm_up_ms: u64,
    /// Significance threshold in percent; 0 disables the gate
    pub threshold_pct: f32,
    /// Dead-time for count mode (µs)
    pub dead_time_us: f32,
    /// Continuous values or pulse counting
    pub mode: ChannelMode,
    /// Recursive scalar estimator tuning
    pub kalman: KalmanParams,
    /// Gradient-adaptive estimator tuning
    pub lms: LmsParams,
    /// Forgetting-factor estimator tuning
    pub rls: RlsParams,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            kind: FilterKind::Ema,
            window_length: 8,
            taps: Vec::new(),
            sample_rate_hz: 1.0,
            max_decay_ms: 10_000,
            warm_up_ms: 0,
            threshold_pct: 0.0,
            dead_time_us: 100.0,
            mode: ChannelMode::Continuous,
            kalman: KalmanParams::default(),
            lms: LmsParams::default(),
            rls: RlsParams::default(),
        }
    }
}

impl FilterConfig {
    /// Default configuration for the given filter kind.
    pub fn new(kind: FilterKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Set window length / filter order.
    pub fn with_window_length(mut self, length: usize) -> Self {
        self.window_length = length;
        self
    }

    /// Set FIR tap weights (most recent tap first).
    ///
    /// Also records the requested tap count as the window length, so a
    /// list longer than [`MAX_TAPS`] is rejected at validation instead of
    /// being silently truncated.
    pub fn with_taps(mut self, taps: &[f32]) -> Self {
        self.window_length = taps.len();
        self.taps.clear();
        for &t in taps.iter().take(MAX_TAPS) {
            // Cannot fail: capacity checked by the take() above
            let _ = self.taps.push(t);
        }
        self
    }

    /// Set nominal sampling frequency in Hz.
    pub fn with_sample_rate_hz(mut self, hz: f32) -> Self {
        self.sample_rate_hz = hz;
        self
    }

    /// Set the elapsed time at which decay reaches zero.
    pub fn with_max_decay_ms(mut self, ms: u64) -> Self {
        self.max_decay_ms = ms;
        self
    }

    /// Set the warm-up duration.
    pub fn with_warm_up_ms(mut self, ms: u64) -> Self {
        self.warm_up_ms = ms;
        self
    }

    /// Set the significance threshold in percent.
    pub fn with_threshold_pct(mut self, pct: f32) -> Self {
        self.threshold_pct = pct;
        self
    }

    /// Set the count-mode dead-time in microseconds.
    pub fn with_dead_time_us(mut self, us: f32) -> Self {
        self.dead_time_us = us;
        self
    }

    /// Set the operating mode.
    pub fn with_mode(mut self, mode: ChannelMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set recursive scalar estimator tuning.
    pub fn with_kalman(mut self, params: KalmanParams) -> Self {
        self.kalman = params;
        self
    }

    /// Set gradient-adaptive estimator tuning.
    pub fn with_lms(mut self, params: LmsParams) -> Self {
        self.lms = params;
        self
    }

    /// Set forgetting-factor estimator tuning.
    pub fn with_rls(mut self, params: RlsParams) -> Self {
        self.rls = params;
        self
    }

    /// Expected interval between samples in milliseconds.
    pub fn expected_interval_ms(&self) -> u64 {
        (1000.0 / self.sample_rate_hz) as u64
    }

    /// Validate and return a corrected copy.
    ///
    /// Structural problems are rejected; floors are clamped; out-of-range
    /// tuning parameters are replaced with defaults (with a warning when
    /// logging is enabled). The caller's object is left untouched.
    pub fn validated(&self) -> ConfigResult<Self> {
        let mut cfg = self.clone();

        if !(cfg.sample_rate_hz.is_finite() && cfg.sample_rate_hz > 0.0) {
            return Err(ConfigError::InvalidSampleRate {
                hz: cfg.sample_rate_hz,
            });
        }

        if cfg.kind == FilterKind::Fir {
            if cfg.taps.is_empty() {
                return Err(ConfigError::MissingTaps);
            }
            // window_length records the *requested* tap count
            if cfg.window_length > MAX_TAPS {
                return Err(ConfigError::WindowLength {
                    requested: cfg.window_length,
                    max: MAX_TAPS,
                });
            }
            let sum: f32 = cfg.taps.iter().sum();
            if fabsf(sum - 1.0) > TAP_SUM_TOLERANCE {
                log_warn!(
                    "FIR taps sum to {} (gain will be unnormalized)",
                    sum
                );
            }
        } else if cfg.window_length == 0 || cfg.window_length > MAX_TAPS {
            return Err(ConfigError::WindowLength {
                requested: cfg.window_length,
                max: MAX_TAPS,
            });
        }

        // Documented floors: clamp, matching the deployed behavior.
        if cfg.dead_time_us < MIN_DEAD_TIME_US {
            cfg.dead_time_us = MIN_DEAD_TIME_US;
        }
        if cfg.max_decay_ms < MIN_DECAY_WINDOW_MS {
            cfg.max_decay_ms = MIN_DECAY_WINDOW_MS;
        }
        if !(cfg.threshold_pct >= 0.0) {
            cfg.threshold_pct = 0.0;
        }
        if cfg.mode == ChannelMode::Count && cfg.warm_up_ms < COUNT_WARM_UP_FLOOR_MS {
            cfg.warm_up_ms = COUNT_WARM_UP_FLOOR_MS;
        }

        // Tuning parameters: substitute defaults, keep running.
        if !(cfg.lms.learning_rate > 0.0 && cfg.lms.learning_rate < 1.0) {
            log_warn!(
                "learning rate {} outside (0, 1), using {}",
                cfg.lms.learning_rate,
                DEFAULT_LEARNING_RATE
            );
            cfg.lms.learning_rate = DEFAULT_LEARNING_RATE;
        }
        if !(cfg.lms.outlier_multiplier == 0.0 || cfg.lms.outlier_multiplier >= 1.0) {
            log_warn!(
                "outlier multiplier {} below 1, using {}",
                cfg.lms.outlier_multiplier,
                DEFAULT_OUTLIER_MULTIPLIER
            );
            cfg.lms.outlier_multiplier = DEFAULT_OUTLIER_MULTIPLIER;
        }
        if !(cfg.rls.forgetting_factor > 0.0 && cfg.rls.forgetting_factor <= 1.0) {
            log_warn!(
                "forgetting factor {} outside (0, 1], using {}",
                cfg.rls.forgetting_factor,
                DEFAULT_FORGETTING_FACTOR
            );
            cfg.rls.forgetting_factor = DEFAULT_FORGETTING_FACTOR;
        }
        if !(cfg.kalman.process_noise.is_finite() && cfg.kalman.process_noise > 0.0) {
            log_warn!(
                "process noise {} not positive, using {}",
                cfg.kalman.process_noise,
                DEFAULT_PROCESS_NOISE
            );
            cfg.kalman.process_noise = DEFAULT_PROCESS_NOISE;
        }
        if !(cfg.kalman.measurement_noise.is_finite() && cfg.kalman.measurement_noise > 0.0) {
            log_warn!(
                "measurement noise {} not positive, using {}",
                cfg.kalman.measurement_noise,
                DEFAULT_MEASUREMENT_NOISE
            );
            cfg.kalman.measurement_noise = DEFAULT_MEASUREMENT_NOISE;
        }

        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ema_validates() {
        let cfg = FilterConfig::new(FilterKind::Ema).validated().unwrap();
        assert_eq!(cfg.kind, FilterKind::Ema);
        assert_eq!(cfg.expected_interval_ms(), 1000);
    }

    #[test]
    fn rejects_bad_sample_rate() {
        let cfg = FilterConfig::new(FilterKind::Ema).with_sample_rate_hz(0.0);
        assert_eq!(
            cfg.validated(),
            Err(ConfigError::InvalidSampleRate { hz: 0.0 })
        );

        let cfg = FilterConfig::new(FilterKind::Ema).with_sample_rate_hz(f32::NAN);
        assert!(cfg.validated().is_err());
    }

    #[test]
    fn rejects_zero_and_oversize_windows() {
        let cfg = FilterConfig::new(FilterKind::Sma).with_window_length(0);
        assert!(matches!(
            cfg.validated(),
            Err(ConfigError::WindowLength { requested: 0, .. })
        ));

        let cfg = FilterConfig::new(FilterKind::Sma).with_window_length(MAX_TAPS + 1);
        assert!(cfg.validated().is_err());
    }

    #[test]
    fn fir_requires_taps() {
        let cfg = FilterConfig::new(FilterKind::Fir);
        assert_eq!(cfg.validated(), Err(ConfigError::MissingTaps));

        let cfg = FilterConfig::new(FilterKind::Fir).with_taps(&[0.5, 0.3, 0.2]);
        let v = cfg.validated().unwrap();
        assert_eq!(v.window_length, 3);
    }

    #[test]
    fn floors_are_clamped() {
        let cfg = FilterConfig::new(FilterKind::Ema)
            .with_dead_time_us(1.0)
            .with_max_decay_ms(10)
            .with_threshold_pct(-5.0)
            .validated()
            .unwrap();
        assert_eq!(cfg.dead_time_us, MIN_DEAD_TIME_US);
        assert_eq!(cfg.max_decay_ms, MIN_DECAY_WINDOW_MS);
        assert_eq!(cfg.threshold_pct, 0.0);
    }

    #[test]
    fn count_mode_warm_up_floor() {
        let cfg = FilterConfig::new(FilterKind::Ema)
            .with_mode(ChannelMode::Count)
            .with_warm_up_ms(5_000)
            .validated()
            .unwrap();
        assert_eq!(cfg.warm_up_ms, COUNT_WARM_UP_FLOOR_MS);

        // Continuous channels keep the configured warm-up
        let cfg = FilterConfig::new(FilterKind::Ema)
            .with_warm_up_ms(5_000)
            .validated()
            .unwrap();
        assert_eq!(cfg.warm_up_ms, 5_000);
    }

    #[test]
    fn bad_tuning_params_default_silently() {
        let cfg = FilterConfig::new(FilterKind::Rls)
            .with_lms(LmsParams {
                learning_rate: 2.0,
                outlier_multiplier: 0.5,
            })
            .with_rls(RlsParams {
                forgetting_factor: 1.5,
            })
            .with_kalman(KalmanParams {
                process_noise: -1.0,
                measurement_noise: 0.0,
                initial_state: 0.0,
            })
            .validated()
            .unwrap();
        assert_eq!(cfg.lms.learning_rate, DEFAULT_LEARNING_RATE);
        assert_eq!(cfg.lms.outlier_multiplier, DEFAULT_OUTLIER_MULTIPLIER);
        assert_eq!(cfg.rls.forgetting_factor, DEFAULT_FORGETTING_FACTOR);
        assert_eq!(cfg.kalman.process_noise, DEFAULT_PROCESS_NOISE);
        assert_eq!(cfg.kalman.measurement_noise, DEFAULT_MEASUREMENT_NOISE);
    }

    #[test]
    fn caller_config_is_never_mutated() {
        let original = FilterConfig::new(FilterKind::Rls).with_rls(RlsParams {
            forgetting_factor: 9.0,
        });
        let snapshot = original.clone();
        let corrected = original.validated().unwrap();
        assert_eq!(original, snapshot);
        assert_ne!(corrected.rls.forgetting_factor, 9.0);
    }
}

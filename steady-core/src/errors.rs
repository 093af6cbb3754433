//! Error types for configuration and engine operations
//!
//! Errors are kept small and `Copy`: they are returned in the per-sample
//! hot path and must not allocate. All message text is `&'static str` or
//! inline numeric fields, so the enums work identically with and without
//! `std`.
//!
//! Two families exist:
//!
//! - [`ConfigError`]: structural problems detected when a configuration is
//!   installed. These fail fast; the channel is never created.
//! - [`EngineError`]: problems with a runtime call (wrong shape, bad
//!   channel index, operation not valid for the channel's mode). No
//!   channel state is mutated when one of these is returned.
//!
//! Out-of-range *tuning* parameters (learning rate, forgetting factor,
//! noise covariances) are not errors: validation substitutes documented
//! defaults and continues. See `config::FilterConfig::validated`.

use thiserror_no_std::Error;

/// Result type for configuration validation.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Structural configuration problems - detected at installation time
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Nominal sampling frequency must be a positive, finite number
    #[error("sample rate {hz} Hz is not positive")]
    InvalidSampleRate {
        /// The rejected frequency
        hz: f32,
    },

    /// Window length / filter order outside the supported range
    #[error("window length {requested} outside [1, {max}]")]
    WindowLength {
        /// Requested length
        requested: usize,
        /// Compile-time bound ([`crate::constants::MAX_TAPS`])
        max: usize,
    },

    /// FIR kind selected but no tap coefficients supplied
    #[error("FIR filter requires at least one coefficient")]
    MissingTaps,

    /// More channels requested than the engine can hold
    #[error("{requested} channels exceed capacity {max}")]
    TooManyChannels {
        /// Requested channel count
        requested: usize,
        /// Compile-time bound ([`crate::constants::MAX_CHANNELS`])
        max: usize,
    },
}

/// Runtime call problems - no channel state is mutated
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum EngineError {
    /// Sample batch width does not match the configured channel count
    #[error("batch carries {got} values, engine has {expected} channels")]
    ShapeMismatch {
        /// Configured channel count
        expected: usize,
        /// Values in the offending batch
        got: usize,
    },

    /// Channel index out of range
    #[error("channel {index} out of range ({channels} configured)")]
    ChannelIndex {
        /// The offending index
        index: usize,
        /// Number of configured channels
        channels: usize,
    },

    /// Pulse or rate call on a channel not configured for counting
    #[error("channel is not in count mode")]
    NotCountMode,

    /// Reconfiguration call does not apply to the channel's filter kind
    #[error("operation requires filter kind {expected}")]
    KindMismatch {
        /// Kind the operation is valid for
        expected: &'static str,
    },

    /// Reconfiguration produced an invalid configuration
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidSampleRate { hz } =>
                defmt::write!(fmt, "sample rate {} Hz not positive", hz),
            Self::WindowLength { requested, max } =>
                defmt::write!(fmt, "window {} outside [1, {}]", requested, max),
            Self::MissingTaps =>
                defmt::write!(fmt, "FIR needs coefficients"),
            Self::TooManyChannels { requested, max } =>
                defmt::write!(fmt, "{} channels exceed {}", requested, max),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for EngineError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::ShapeMismatch { expected, got } =>
                defmt::write!(fmt, "batch width {} != {} channels", got, expected),
            Self::ChannelIndex { index, channels } =>
                defmt::write!(fmt, "channel {} out of {}", index, channels),
            Self::NotCountMode =>
                defmt::write!(fmt, "not a count-mode channel"),
            Self::KindMismatch { expected } =>
                defmt::write!(fmt, "requires kind {}", expected),
            Self::Config(e) =>
                defmt::write!(fmt, "invalid configuration: {}", e),
        }
    }
}

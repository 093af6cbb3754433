//! Adaptive signal conditioning core for Steady
//!
//! Turns noisy, possibly irregularly-sampled sensor readings into smoothed
//! per-channel estimates. Designed for edge devices with limited resources.
//!
//! Key constraints:
//! - No heap allocation in the sample or pulse path
//! - Bounded, short pulse handling (safe to call from an interrupt)
//! - All timing driven by caller-supplied clock readings
//!
//! Each channel runs one filter strategy (exponential average, windowed
//! average / FIR, or a recursive estimator) and adapts how much it trusts a
//! new sample to how late that sample arrived. Channels configured for
//! pulse counting instead convert event arrivals into a dead-time-corrected
//! counts-per-minute estimate.
//!
//! ```
//! use steady_core::{Engine, FilterConfig, FilterKind, SampleBatch};
//!
//! let config = FilterConfig::new(FilterKind::Ema)
//!     .with_window_length(10)
//!     .with_sample_rate_hz(1.0);
//!
//! let mut engine = Engine::new(&[config], 0).unwrap();
//! engine.push(&SampleBatch::new(&[21.4], 5_000)).unwrap();
//! let smoothed = engine.filtered();
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod channel;
pub mod config;
pub mod constants;
pub mod decay;
pub mod engine;
pub mod errors;
pub mod gate;
pub mod strategy;
pub mod time;
pub mod window;

// Public API
pub use channel::CountRate;
pub use config::{ChannelMode, FilterConfig, FilterKind, KalmanParams, LmsParams, RlsParams};
pub use engine::{Engine, SampleBatch};
pub use errors::{ConfigError, ConfigResult, EngineError, EngineResult};
pub use time::Timestamp;

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}

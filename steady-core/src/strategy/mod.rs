//! Filter update strategies
//!
//! One update rule per filter kind, collected in the [`Strategy`] tagged
//! union. The engine dispatches by pattern matching; the kinds that were
//! build-time `#ifdef` alternatives in earlier firmware revisions are
//! ordinary variants here, each carrying only the state it needs.
//!
//! Every strategy exposes the same two operations:
//!
//! - [`Strategy::seed`]: install the channel's very first accepted sample
//!   as the baseline (fills history / primes estimator state).
//! - [`Strategy::update`]: consume one accepted sample plus its decay
//!   factor and produce the new estimate. `None` means the sample was
//!   rejected by a robust guard and must not count as accepted.
//!
//! The recursive estimators (Kalman/LMS/RLS) receive the decay factor
//! through the common signature but do not use it; their own gain terms
//! already weigh new evidence against accumulated state.

pub mod ema;
pub mod kalman;
pub mod lms;
pub mod rls;
pub mod windowed;

pub use ema::Ema;
pub use kalman::Kalman;
pub use lms::Lms;
pub use rls::Rls;
pub use windowed::Windowed;

use crate::config::{FilterConfig, FilterKind};

/// Per-kind working state and update rule.
#[derive(Debug, Clone)]
pub enum Strategy {
    /// Exponential moving average
    Ema(Ema),
    /// Windowed average / finite impulse response
    Windowed(Windowed),
    /// Recursive scalar estimator
    Kalman(Kalman),
    /// Gradient-adaptive estimator
    Lms(Lms),
    /// Forgetting-factor recursive estimator
    Rls(Rls),
}

impl Strategy {
    /// Build fresh working state from a validated configuration.
    pub fn from_config(config: &FilterConfig) -> Self {
        match config.kind {
            FilterKind::Ema => Self::Ema(Ema::new(config.window_length)),
            FilterKind::Sma => Self::Windowed(Windowed::sma(config.window_length)),
            FilterKind::Fir => Self::Windowed(Windowed::fir(&config.taps)),
            FilterKind::Kalman => Self::Kalman(Kalman::new(&config.kalman)),
            FilterKind::Lms => Self::Lms(Lms::new(config.window_length, &config.lms)),
            FilterKind::Rls => Self::Rls(Rls::new(config.window_length, &config.rls)),
        }
    }

    /// Install the first accepted sample and return the baseline estimate.
    pub fn seed(&mut self, value: f32) -> f32 {
        match self {
            Self::Ema(_) => value,
            Self::Windowed(w) => w.seed(value),
            Self::Kalman(k) => k.seed(value),
            Self::Lms(l) => l.seed(value),
            Self::Rls(r) => r.seed(value),
        }
    }

    /// Consume one accepted sample; `None` means a robust guard dropped it.
    pub fn update(&mut self, estimate: f32, value: f32, decay: f32) -> Option<f32> {
        match self {
            Self::Ema(e) => Some(e.update(estimate, value, decay)),
            Self::Windowed(w) => Some(w.update(value, decay)),
            Self::Kalman(k) => Some(k.update(value)),
            Self::Lms(l) => l.update(value),
            Self::Rls(r) => Some(r.update(value)),
        }
    }
}

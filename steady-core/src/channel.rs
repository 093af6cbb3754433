//! Per-channel conditioning state machine
//!
//! A [`Channel`] owns everything one logical sensor channel needs: the
//! corrected configuration snapshot, the filter strategy's working state,
//! acceptance timestamps, and the pulse bookkeeping for count mode. No
//! state is shared between channels and nothing here relies on static
//! storage; interrupt bookkeeping that earlier firmware kept in
//! function-local arrays lives inside the channel it belongs to.
//!
//! ## Value path
//!
//! `accept` runs the full conditioning pipeline for one sample:
//!
//! ```text
//! finite? → warm-up → first-sample seed → significance gate
//!         → spacing guard → decay → strategy update
//! ```
//!
//! The first sample of a channel's life bypasses the gate to establish a
//! baseline. Samples arriving faster than half the expected interval are
//! dropped as oversampling. A sample rejected anywhere along the pipeline
//! leaves the channel untouched, including its last-accepted timestamp.
//!
//! ## Pulse path
//!
//! `on_pulse` is safe to call from an interrupt context: it is
//! allocation-free and bounded (one wrapping subtraction, one compare, two
//! atomic stores). The pulse counter and last-pulse stamp are atomics
//! because a rate computation may race the interrupt, the only
//! concurrency hazard in the engine.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use libm::roundf;

use crate::{
    config::{ChannelMode, FilterConfig, FilterKind},
    constants::{MAX_TAPS, MIN_DEAD_TIME_US, MIN_DECAY_WINDOW_MS, RATE_WINDOW_MS},
    decay::decay_factor,
    errors::{ConfigError, ConfigResult, EngineError, EngineResult},
    gate::is_significant,
    strategy::Strategy,
    time::{MicroInstant, Timestamp},
};

/// One rate computation for a count-mode channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountRate {
    /// Counts per minute over the elapsed window, rounded
    pub cpm: u32,
    /// Dead-time-corrected counts per second
    pub corrected_cps: f32,
}

/// Pulse bookkeeping; shared between the pulse callback and `rate`.
#[derive(Debug)]
struct PulseState {
    /// Accepted pulses since the last rate computation
    count: AtomicU32,
    /// Stamp of the last accepted pulse (wrapping µs)
    last_pulse_us: AtomicU32,
    /// False until the first pulse after (re)initialization
    seen: AtomicBool,
}

impl PulseState {
    fn new() -> Self {
        Self {
            count: AtomicU32::new(0),
            last_pulse_us: AtomicU32::new(0),
            seen: AtomicBool::new(false),
        }
    }

    fn reset(&self) {
        self.count.store(0, Ordering::Relaxed);
        self.seen.store(false, Ordering::Relaxed);
    }
}

/// Mutable per-channel state, owned exclusively by the engine.
#[derive(Debug)]
pub struct Channel {
    /// Corrected configuration snapshot
    config: FilterConfig,
    /// Derived expected inter-sample interval (ms)
    expected_interval_ms: u64,
    /// Channel start time, warm-up anchor
    start_ms: Timestamp,
    /// Time of the last accepted sample; `None` until the baseline exists
    last_accept_ms: Option<Timestamp>,
    /// Current filtered estimate
    estimate: f32,
    /// Filter working state
    strategy: Strategy,
    /// Count-mode bookkeeping
    pulse: PulseState,
    /// Anchor of the running rate window (ms)
    last_rate_ms: Timestamp,
}

impl Channel {
    /// Validate `config` and create the channel's initial state.
    pub fn new(config: &FilterConfig, now: Timestamp) -> ConfigResult<Self> {
        let config = config.validated()?;
        let expected_interval_ms = config.expected_interval_ms();
        let strategy = Strategy::from_config(&config);
        Ok(Self {
            config,
            expected_interval_ms,
            start_ms: now,
            last_accept_ms: None,
            estimate: 0.0,
            strategy,
            pulse: PulseState::new(),
            last_rate_ms: now,
        })
    }

    /// Current filtered estimate.
    pub fn estimate(&self) -> f32 {
        self.estimate
    }

    /// Operating mode.
    pub fn mode(&self) -> ChannelMode {
        self.config.mode
    }

    /// Filter kind.
    pub fn kind(&self) -> FilterKind {
        self.config.kind
    }

    /// True once the warm-up interval has elapsed.
    pub fn warmed_up(&self, now: Timestamp) -> bool {
        now.saturating_sub(self.start_ms) >= self.config.warm_up_ms
    }

    /// Run one sample through the conditioning pipeline.
    ///
    /// Returns true when the sample was accepted and the estimate updated.
    pub fn accept(&mut self, value: f32, now: Timestamp) -> bool {
        if !value.is_finite() {
            return false;
        }
        if !self.warmed_up(now) {
            return false;
        }

        let last = match self.last_accept_ms {
            Some(last) => last,
            None => {
                // First sample of the channel's life: unconditional baseline
                self.estimate = self.strategy.seed(value);
                self.last_accept_ms = Some(now);
                return true;
            }
        };

        if !is_significant(self.estimate, value, self.config.threshold_pct) {
            return false;
        }

        let delta = now.saturating_sub(last);
        if delta < self.expected_interval_ms / 2 {
            // Oversampling guard: arrivals faster than half the nominal
            // cadence carry no new information
            return false;
        }

        let decay = decay_factor(self.expected_interval_ms, self.config.max_decay_ms, delta);
        match self.strategy.update(self.estimate, value, decay) {
            Some(estimate) => {
                self.estimate = estimate;
                self.last_accept_ms = Some(now);
                true
            }
            None => false,
        }
    }

    /// Record a pulse arrival; true when it survives the dead-time filter.
    ///
    /// Interrupt-safe: bounded, allocation-free, atomics only.
    pub fn on_pulse(&self, now_us: MicroInstant) -> bool {
        if self.pulse.seen.load(Ordering::Relaxed) {
            let last = self.pulse.last_pulse_us.load(Ordering::Relaxed);
            let gap = now_us.wrapping_sub(last) as f32;
            if gap < self.config.dead_time_us {
                return false;
            }
        }
        self.pulse.count.fetch_add(1, Ordering::Relaxed);
        self.pulse.last_pulse_us.store(now_us, Ordering::Relaxed);
        self.pulse.seen.store(true, Ordering::Relaxed);
        true
    }

    /// Compute counts-per-minute once the rate window has elapsed.
    ///
    /// Drains the pulse counter, corrects the raw rate for dead-time
    /// saturation and feeds the corrected counts-per-second back through
    /// the channel's value pipeline as a derived reading.
    pub fn rate(&mut self, now: Timestamp) -> Option<CountRate> {
        let elapsed = now.saturating_sub(self.last_rate_ms);
        if elapsed < RATE_WINDOW_MS {
            return None;
        }

        let count = self.pulse.count.swap(0, Ordering::Relaxed);
        self.last_rate_ms = now;

        let cpm = count as f32 * 60_000.0 / elapsed as f32;
        let corrected_cps = dead_time_corrected(cpm / 60.0, self.config.dead_time_us);

        self.accept(corrected_cps, now);

        Some(CountRate {
            cpm: roundf(cpm) as u32,
            corrected_cps,
        })
    }

    // --- Reconfiguration -------------------------------------------------
    //
    // Parameter tweaks (rate, decay window, threshold, dead-time) adjust in
    // place. Shape changes (window length, taps, mode) rebuild the strategy
    // and clear the acceptance baseline, so the next sample re-seeds the
    // channel.

    /// Adjust the nominal sampling frequency.
    pub fn set_sample_rate(&mut self, hz: f32) -> EngineResult<()> {
        if !(hz.is_finite() && hz > 0.0) {
            return Err(ConfigError::InvalidSampleRate { hz }.into());
        }
        self.config.sample_rate_hz = hz;
        self.expected_interval_ms = self.config.expected_interval_ms();
        Ok(())
    }

    /// Adjust the maximum decay time (floored at the documented minimum).
    pub fn set_max_decay_ms(&mut self, ms: u64) {
        self.config.max_decay_ms = ms.max(MIN_DECAY_WINDOW_MS);
    }

    /// Adjust the significance threshold (negative values clamp to 0).
    pub fn set_threshold_pct(&mut self, pct: f32) {
        self.config.threshold_pct = if pct > 0.0 { pct } else { 0.0 };
    }

    /// Adjust the count-mode dead-time (floored at the documented minimum).
    pub fn set_dead_time_us(&mut self, us: f32) {
        self.config.dead_time_us = if us > MIN_DEAD_TIME_US {
            us
        } else {
            MIN_DEAD_TIME_US
        };
    }

    /// Change the window length / filter order and reset working state.
    ///
    /// Not applicable to FIR channels, whose length is the tap count.
    pub fn set_window_length(&mut self, length: usize) -> EngineResult<()> {
        if self.config.kind == FilterKind::Fir {
            return Err(EngineError::KindMismatch {
                expected: "EMA/SMA/LMS/RLS",
            });
        }
        if length == 0 || length > MAX_TAPS {
            return Err(ConfigError::WindowLength {
                requested: length,
                max: MAX_TAPS,
            }
            .into());
        }
        self.config.window_length = length;
        self.reset_working_state();
        Ok(())
    }

    /// Replace FIR tap weights and reset working state.
    pub fn set_fir_taps(&mut self, taps: &[f32]) -> EngineResult<()> {
        if self.config.kind != FilterKind::Fir {
            return Err(EngineError::KindMismatch { expected: "FIR" });
        }
        let candidate = self.config.clone().with_taps(taps).validated()?;
        self.config = candidate;
        self.reset_working_state();
        Ok(())
    }

    /// Switch between continuous and count mode, resetting all working
    /// state. `now` re-anchors the rate window.
    pub fn set_mode(&mut self, mode: ChannelMode, now: Timestamp) -> EngineResult<()> {
        let mut candidate = self.config.clone();
        candidate.mode = mode;
        self.config = candidate.validated()?;
        self.reset_working_state();
        self.pulse.reset();
        self.last_rate_ms = now;
        Ok(())
    }

    /// Rebuild strategy state; the next sample becomes the new baseline.
    fn reset_working_state(&mut self) {
        self.strategy = Strategy::from_config(&self.config);
        self.estimate = 0.0;
        self.last_accept_ms = None;
    }
}

/// Extrapolate a raw rate for events lost inside the dead-time window.
///
/// At high true rates a fraction `cps·deadTime` of each second is blind;
/// the observed rate understates reality by that factor. A denominator at
/// or below zero means the observed rate already exceeds the saturation
/// bound, in which case the raw rate is returned as-is.
fn dead_time_corrected(cps: f32, dead_time_us: f32) -> f32 {
    let denominator = 1.0 - cps * dead_time_us * 1e-6;
    if denominator > 0.0 {
        cps / denominator
    } else {
        cps
    }
}

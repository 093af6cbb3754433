//! Engine facade
//!
//! Owns the vector of channel states and dispatches work to them. One
//! engine instance conditions one multi-channel sensor source: a batch of
//! raw values arrives with a caller-supplied timestamp, each value is run
//! through its channel's pipeline, and the latest filtered vector can be
//! read back at any time. Count-mode channels are driven separately,
//! through [`Engine::on_pulse`] and [`Engine::cpm`].
//!
//! All operations are synchronous and complete on the caller's thread;
//! the engine never reads a clock or allocates after construction.

use heapless::Vec;

use crate::{
    channel::{Channel, CountRate},
    config::{ChannelMode, FilterConfig},
    constants::MAX_CHANNELS,
    errors::{ConfigError, ConfigResult, EngineError, EngineResult},
    time::{MicroInstant, Timestamp},
};

/// One multi-channel sample delivery.
#[derive(Debug, Clone, Copy)]
pub struct SampleBatch<'a> {
    /// Raw values, one per configured channel
    pub values: &'a [f32],
    /// Acquisition time (ms)
    pub timestamp: Timestamp,
    /// Optional source tag ("BME688", bus address, ...)
    pub source: Option<&'a str>,
}

impl<'a> SampleBatch<'a> {
    /// Batch without a source tag.
    pub fn new(values: &'a [f32], timestamp: Timestamp) -> Self {
        Self {
            values,
            timestamp,
            source: None,
        }
    }

    /// Attach a source tag.
    pub fn with_source(mut self, source: &'a str) -> Self {
        self.source = Some(source);
        self
    }
}

/// Multi-channel adaptive conditioning engine.
pub struct Engine {
    channels: Vec<Channel, MAX_CHANNELS>,
}

impl Engine {
    /// Validate every configuration and build the channel states.
    ///
    /// Fails fast: one bad configuration rejects the whole engine rather
    /// than leaving a partially usable channel set.
    pub fn new(configs: &[FilterConfig], now: Timestamp) -> ConfigResult<Self> {
        if configs.len() > MAX_CHANNELS {
            return Err(ConfigError::TooManyChannels {
                requested: configs.len(),
                max: MAX_CHANNELS,
            });
        }
        let mut channels = Vec::new();
        for config in configs {
            let channel = Channel::new(config, now)?;
            // Cannot fail: count checked against capacity above
            let _ = channels.push(channel);
        }
        Ok(Self { channels })
    }

    /// Number of configured channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Dispatch one value batch to the per-channel pipelines.
    ///
    /// The batch must carry exactly one value per channel; on a shape
    /// mismatch no channel state is mutated. Count-mode channels ignore
    /// their slot; they are driven by pulses and rate feedback.
    pub fn push(&mut self, batch: &SampleBatch<'_>) -> EngineResult<()> {
        if batch.values.len() != self.channels.len() {
            return Err(EngineError::ShapeMismatch {
                expected: self.channels.len(),
                got: batch.values.len(),
            });
        }
        for (channel, &value) in self.channels.iter_mut().zip(batch.values) {
            if channel.mode() == ChannelMode::Count {
                continue;
            }
            channel.accept(value, batch.timestamp);
        }
        Ok(())
    }

    /// Snapshot of the current filtered estimates, one per channel.
    pub fn filtered(&self) -> Vec<f32, MAX_CHANNELS> {
        self.channels.iter().map(Channel::estimate).collect()
    }

    /// Current filtered estimate of a single channel.
    pub fn value(&self, channel: usize) -> EngineResult<f32> {
        Ok(self.channel(channel)?.estimate())
    }

    /// Record a pulse arrival on a count-mode channel.
    ///
    /// Safe to call from an interrupt context; returns whether the pulse
    /// survived the dead-time filter.
    pub fn on_pulse(&self, channel: usize, now_us: MicroInstant) -> EngineResult<bool> {
        let ch = self.channel(channel)?;
        if ch.mode() != ChannelMode::Count {
            return Err(EngineError::NotCountMode);
        }
        Ok(ch.on_pulse(now_us))
    }

    /// Compute counts-per-minute for a count-mode channel.
    ///
    /// Returns `Ok(None)` until a full rate window has elapsed since the
    /// previous computation.
    pub fn cpm(&mut self, channel: usize, now: Timestamp) -> EngineResult<Option<CountRate>> {
        let ch = self.channel_mut(channel)?;
        if ch.mode() != ChannelMode::Count {
            return Err(EngineError::NotCountMode);
        }
        Ok(ch.rate(now))
    }

    /// Adjust a channel's nominal sampling frequency.
    pub fn set_sample_rate(&mut self, channel: usize, hz: f32) -> EngineResult<()> {
        self.channel_mut(channel)?.set_sample_rate(hz)
    }

    /// Change a channel's window length / filter order (resets its state).
    pub fn set_window_length(&mut self, channel: usize, length: usize) -> EngineResult<()> {
        self.channel_mut(channel)?.set_window_length(length)
    }

    /// Replace a FIR channel's tap weights (resets its state).
    pub fn set_fir_taps(&mut self, channel: usize, taps: &[f32]) -> EngineResult<()> {
        self.channel_mut(channel)?.set_fir_taps(taps)
    }

    /// Adjust a channel's maximum decay time.
    pub fn set_max_decay_ms(&mut self, channel: usize, ms: u64) -> EngineResult<()> {
        self.channel_mut(channel)?.set_max_decay_ms(ms);
        Ok(())
    }

    /// Adjust a channel's significance threshold.
    pub fn set_threshold_pct(&mut self, channel: usize, pct: f32) -> EngineResult<()> {
        self.channel_mut(channel)?.set_threshold_pct(pct);
        Ok(())
    }

    /// Adjust a channel's dead-time.
    pub fn set_dead_time_us(&mut self, channel: usize, us: f32) -> EngineResult<()> {
        self.channel_mut(channel)?.set_dead_time_us(us);
        Ok(())
    }

    /// Switch a channel's operating mode (resets its state).
    pub fn set_mode(
        &mut self,
        channel: usize,
        mode: ChannelMode,
        now: Timestamp,
    ) -> EngineResult<()> {
        self.channel_mut(channel)?.set_mode(mode, now)
    }

    fn channel(&self, index: usize) -> EngineResult<&Channel> {
        self.channels.get(index).ok_or(EngineError::ChannelIndex {
            index,
            channels: self.channels.len(),
        })
    }

    fn channel_mut(&mut self, index: usize) -> EngineResult<&mut Channel> {
        let channels = self.channels.len();
        self.channels
            .get_mut(index)
            .ok_or(EngineError::ChannelIndex { index, channels })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterKind;

    fn two_channel_engine() -> Engine {
        let configs = [
            FilterConfig::new(FilterKind::Ema)
                .with_window_length(10)
                .with_sample_rate_hz(1.0),
            FilterConfig::new(FilterKind::Sma)
                .with_window_length(4)
                .with_sample_rate_hz(1.0),
        ];
        Engine::new(&configs, 0).unwrap()
    }

    #[test]
    fn shape_mismatch_mutates_nothing() {
        let mut engine = two_channel_engine();
        engine.push(&SampleBatch::new(&[1.0, 2.0], 1_000)).unwrap();

        let before = engine.filtered();
        let err = engine.push(&SampleBatch::new(&[1.0], 2_000));
        assert_eq!(
            err,
            Err(EngineError::ShapeMismatch {
                expected: 2,
                got: 1
            })
        );
        assert_eq!(engine.filtered(), before);
    }

    #[test]
    fn channels_are_independent() {
        let mut engine = two_channel_engine();
        engine.push(&SampleBatch::new(&[1.0, 100.0], 1_000)).unwrap();
        assert_eq!(engine.value(0).unwrap(), 1.0);
        assert_eq!(engine.value(1).unwrap(), 100.0);

        engine.push(&SampleBatch::new(&[2.0, 100.0], 2_000)).unwrap();
        assert!(engine.value(0).unwrap() > 1.0);
        assert_eq!(engine.value(1).unwrap(), 100.0);
    }

    #[test]
    fn bad_channel_index() {
        let mut engine = two_channel_engine();
        assert_eq!(
            engine.value(7),
            Err(EngineError::ChannelIndex {
                index: 7,
                channels: 2
            })
        );
        assert!(engine.set_threshold_pct(7, 1.0).is_err());
    }

    #[test]
    fn pulse_calls_require_count_mode() {
        let mut engine = two_channel_engine();
        assert_eq!(engine.on_pulse(0, 100), Err(EngineError::NotCountMode));
        assert_eq!(engine.cpm(0, 60_000), Err(EngineError::NotCountMode));
    }

    #[test]
    fn one_bad_config_rejects_the_engine() {
        let configs = [
            FilterConfig::new(FilterKind::Ema),
            FilterConfig::new(FilterKind::Ema).with_sample_rate_hz(-1.0),
        ];
        assert!(Engine::new(&configs, 0).is_err());
    }

    #[test]
    fn too_many_channels() {
        let configs = [(); MAX_CHANNELS + 1].map(|_| FilterConfig::new(FilterKind::Ema));
        assert!(matches!(
            Engine::new(&configs, 0),
            Err(ConfigError::TooManyChannels { .. })
        ));
    }

    #[test]
    fn source_tag_is_carried() {
        let batch = SampleBatch::new(&[1.0], 10).with_source("BME688");
        assert_eq!(batch.source, Some("BME688"));
    }
}

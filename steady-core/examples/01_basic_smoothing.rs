//! Basic Smoothing Example
//!
//! This example demonstrates the simplest use case of Steady: conditioning
//! a noisy temperature reading with an exponential moving average whose
//! trust in each sample adapts to how late the sample arrived.
//!
//! ## What You'll Learn
//!
//! - Configuring a channel and building an engine
//! - Pushing timestamped sample batches
//! - How on-schedule, late and stale samples are weighted differently
//! - Using the significance gate to suppress sensor jitter
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_basic_smoothing
//! ```

use steady_core::{Engine, FilterConfig, FilterKind, SampleBatch};

fn main() {
    println!("Steady Basic Smoothing Example");
    println!("==============================\n");

    // One channel: EMA over a 10-sample window, nominally sampled at 1 Hz.
    // A sample arriving more than 10 s after the previous acceptance is
    // trusted fully (the estimate snaps to it).
    let config = FilterConfig::new(FilterKind::Ema)
        .with_window_length(10)
        .with_sample_rate_hz(1.0)
        .with_max_decay_ms(10_000);

    let mut engine = match Engine::new(&[config], 0) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("configuration rejected: {e}");
            return;
        }
    };

    // A noisy temperature trace, delivered on schedule
    println!("On-schedule samples (1 per second):");
    let trace = [
        (21.3, 1_000),
        (21.8, 2_000),
        (20.9, 3_000),
        (21.5, 4_000),
        (21.1, 5_000),
    ];
    for (value, time) in trace {
        if let Err(e) = engine.push(&SampleBatch::new(&[value], time)) {
            eprintln!("push failed: {e}");
            return;
        }
        report(time, value, &engine);
    }

    // The sensor stalls, then delivers a late reading. The gap eats into
    // the channel's trust in the running estimate, so the late sample
    // moves the output more than an on-schedule one would.
    println!("\nLate sample after a 6 s stall:");
    let _ = engine.push(&SampleBatch::new(&[24.0], 11_000));
    report(11_000, 24.0, &engine);

    // After a gap past the decay horizon the estimate snaps to the sample.
    println!("\nStale sample after a 20 s outage:");
    let _ = engine.push(&SampleBatch::new(&[18.5], 31_000));
    report(31_000, 18.5, &engine);

    // Turn the significance gate on: sub-2% wiggle no longer moves the
    // output at all.
    println!("\nWith a 2% significance gate:");
    if let Err(e) = engine.set_threshold_pct(0, 2.0) {
        eprintln!("reconfiguration failed: {e}");
        return;
    }
    for (value, time) in [(18.6, 32_000), (18.4, 33_000), (19.5, 34_000)] {
        let _ = engine.push(&SampleBatch::new(&[value], time));
        report(time, value, &engine);
    }
}

fn report(time: u64, raw: f32, engine: &Engine) {
    let filtered = engine.filtered();
    println!("  t={:6}ms  raw={:5.1}°C  filtered={:6.3}°C", time, raw, filtered[0]);
}

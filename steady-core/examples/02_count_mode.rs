//! Count Mode Example
//!
//! This example demonstrates the pulse-counting path: a channel driven by
//! discrete event arrivals (a Geiger-Müller tube, a tipping-bucket rain
//! gauge) instead of continuous values.
//!
//! ## What You'll Learn
//!
//! - Configuring a count-mode channel with a detector dead-time
//! - Feeding pulse arrivals and watching bursts collapse
//! - Reading back dead-time-corrected counts-per-minute
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 02_count_mode
//! ```

use steady_core::{ChannelMode, Engine, FilterConfig, FilterKind};

fn main() {
    println!("Steady Count Mode Example");
    println!("=========================\n");

    // Geiger tube channel: 100 µs dead-time, rates smoothed by an EMA.
    // Count-mode channels always warm up for a full rate window before
    // the first filtered value appears.
    let config = FilterConfig::new(FilterKind::Ema)
        .with_window_length(10)
        .with_sample_rate_hz(1.0)
        .with_mode(ChannelMode::Count)
        .with_dead_time_us(100.0);

    let mut engine = match Engine::new(&[config], 0) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("configuration rejected: {e}");
            return;
        }
    };

    // A tight burst: four pulses inside 130 µs. With a 100 µs dead-time
    // only the first and third are far enough apart to count.
    println!("Pulse burst (µs stamps against a 100 µs dead-time):");
    for stamp in [0u32, 50, 120, 130] {
        match engine.on_pulse(0, stamp) {
            Ok(true) => println!("  t={:4}µs  counted", stamp),
            Ok(false) => println!("  t={:4}µs  inside dead-time, dropped", stamp),
            Err(e) => {
                eprintln!("pulse rejected: {e}");
                return;
            }
        }
    }

    // Steady background activity for the rest of the minute: one pulse
    // every two seconds.
    for i in 1..=28u32 {
        let _ = engine.on_pulse(0, i * 2_000_000);
    }

    // The rate is computed on demand once a full window has elapsed.
    println!("\nRate after one minute:");
    match engine.cpm(0, 60_000) {
        Ok(Some(rate)) => {
            println!("  counts per minute : {}", rate.cpm);
            println!("  corrected rate    : {:.4} cps", rate.corrected_cps);
            match engine.value(0) {
                Ok(v) => println!("  filtered estimate : {:.4} cps", v),
                Err(e) => eprintln!("read failed: {e}"),
            }
        }
        Ok(None) => println!("  window not yet elapsed"),
        Err(e) => eprintln!("rate computation failed: {e}"),
    }
}

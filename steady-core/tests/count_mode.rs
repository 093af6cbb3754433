//! Integration tests for the pulse / count-mode path

use steady_core::{ChannelMode, Engine, EngineError, FilterConfig, FilterKind};

fn geiger_config() -> FilterConfig {
    FilterConfig::new(FilterKind::Ema)
        .with_window_length(10)
        .with_sample_rate_hz(1.0)
        .with_mode(ChannelMode::Count)
        .with_dead_time_us(100.0)
}

#[test]
fn dead_time_collapses_bursts() {
    let engine = Engine::new(&[geiger_config()], 0).unwrap();

    assert!(engine.on_pulse(0, 0).unwrap());
    assert!(!engine.on_pulse(0, 50).unwrap());
    assert!(engine.on_pulse(0, 120).unwrap());
    assert!(!engine.on_pulse(0, 130).unwrap());
}

#[test]
fn cpm_over_one_minute() {
    let mut engine = Engine::new(&[geiger_config()], 0).unwrap();

    // 30 pulses spread over the first minute, 2 s apart
    for i in 0..30u32 {
        engine.on_pulse(0, i * 2_000_000).unwrap();
    }

    // Window not yet elapsed
    assert_eq!(engine.cpm(0, 59_000).unwrap(), None);

    let rate = engine.cpm(0, 60_000).unwrap().unwrap();
    assert_eq!(rate.cpm, 30);

    // Corrected rate: cps = 0.5, correction is tiny at 100 µs dead-time
    let cps = 0.5;
    let expected = cps / (1.0 - cps * 100.0 * 1e-6);
    assert!((rate.corrected_cps - expected).abs() < 1e-5);

    // The corrected rate seeds the channel's filtered value
    assert!((engine.value(0).unwrap() - rate.corrected_cps).abs() < 1e-6);
}

#[test]
fn counter_resets_between_windows() {
    let mut engine = Engine::new(&[geiger_config()], 0).unwrap();

    for i in 0..10u32 {
        engine.on_pulse(0, i * 1_000_000).unwrap();
    }
    assert_eq!(engine.cpm(0, 60_000).unwrap().unwrap().cpm, 10);

    // Nothing arrived since: the next window reads zero
    assert_eq!(engine.cpm(0, 120_000).unwrap().unwrap().cpm, 0);
}

#[test]
fn cpm_scales_to_the_actual_window() {
    let mut engine = Engine::new(&[geiger_config()], 0).unwrap();

    // 30 pulses over a 90 s window: 20 counts per minute
    for i in 0..30u32 {
        engine.on_pulse(0, i * 3_000_000).unwrap();
    }
    let rate = engine.cpm(0, 90_000).unwrap().unwrap();
    assert_eq!(rate.cpm, 20);
}

#[test]
fn warm_up_floor_defers_the_filtered_value() {
    // Even a config asking for no warm-up gets the 60 s count-mode floor,
    // so the first rate feedback is the first accepted value.
    let config = geiger_config().with_warm_up_ms(0);
    let mut engine = Engine::new(&[config], 0).unwrap();

    for i in 0..60u32 {
        engine.on_pulse(0, i * 1_000_000).unwrap();
    }
    assert_eq!(engine.value(0).unwrap(), 0.0);

    let rate = engine.cpm(0, 60_000).unwrap().unwrap();
    assert!((engine.value(0).unwrap() - rate.corrected_cps).abs() < 1e-6);
}

#[test]
fn continuous_channels_reject_pulse_calls() {
    let config = FilterConfig::new(FilterKind::Ema).with_sample_rate_hz(1.0);
    let mut engine = Engine::new(&[config], 0).unwrap();

    assert_eq!(engine.on_pulse(0, 10), Err(EngineError::NotCountMode));
    assert_eq!(engine.cpm(0, 60_000), Err(EngineError::NotCountMode));
}

#[test]
fn dead_time_reconfiguration_applies_to_new_pulses() {
    let mut engine = Engine::new(&[geiger_config()], 0).unwrap();

    assert!(engine.on_pulse(0, 0).unwrap());
    assert!(engine.on_pulse(0, 150).unwrap());
    engine.set_dead_time_us(0, 1_000.0).unwrap();
    // Gap of 500 µs now falls inside the widened dead-time
    assert!(!engine.on_pulse(0, 650).unwrap());
}

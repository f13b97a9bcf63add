//! Integration tests for the AppService → FSM → actuators pipeline.
//!
//! Scripted readings in, recorded relay calls and events out.

use vegimeter::app::events::AppEvent;
use vegimeter::app::service::AppService;
use vegimeter::config::ControllerConfig;
use vegimeter::error::{HaltCode, ProbeError};
use vegimeter::fsm::StateId;
use vegimeter::sensors::SensorId;

use crate::mock_hw::{ActuatorCall, MockHardware, RecordingSink};

fn make_app(config: ControllerConfig, hw: &mut MockHardware) -> (AppService, RecordingSink) {
    let mut app = AppService::new(config);
    let mut sink = RecordingSink::new();
    app.start(hw, &mut sink);
    hw.clear_history();
    sink.clear();
    (app, sink)
}

// ── Hysteresis ────────────────────────────────────────────────

#[test]
fn cold_soil_and_water_runs_heater_and_pump() {
    let mut hw = MockHardware::uniform(2_000, 500, 1_000);
    let (mut app, mut sink) = make_app(ControllerConfig::default(), &mut hw);

    app.tick(&mut hw, &mut sink);

    assert!(hw.heater_is_on());
    assert!(hw.pump_is_on());
    assert_eq!(app.heater_streak(), 1);
    assert_eq!(sink.statuses(), 1);
}

#[test]
fn warm_soil_turns_everything_off_and_resets_streak() {
    let mut hw = MockHardware::uniform(2_000, 500, 1_000);
    let (mut app, mut sink) = make_app(ControllerConfig::default(), &mut hw);
    for _ in 0..5 {
        app.tick(&mut hw, &mut sink);
    }
    assert_eq!(app.heater_streak(), 5);

    hw.set_soil([2_100, 2_100, 2_100, 2_100]);
    app.tick(&mut hw, &mut sink);

    assert!(!hw.heater_is_on());
    assert!(!hw.pump_is_on());
    assert_eq!(app.heater_streak(), 0);
}

#[test]
fn hot_water_keeps_pump_but_stops_heater() {
    let mut hw = MockHardware::uniform(2_000, 500, 1_000);
    let (mut app, mut sink) = make_app(ControllerConfig::default(), &mut hw);
    app.tick(&mut hw, &mut sink);
    assert!(hw.heater_is_on());

    hw.set_water(4_400, 4_400);
    app.tick(&mut hw, &mut sink);
    assert!(!hw.heater_is_on());
    assert!(hw.pump_is_on());
    assert_eq!(app.heater_streak(), 0);
}

#[test]
fn diverging_water_probes_stop_heater() {
    let mut hw = MockHardware::uniform(2_000, 500, 1_000);
    hw.set_water(3_000, 1_000);
    let (mut app, mut sink) = make_app(ControllerConfig::default(), &mut hw);
    app.tick(&mut hw, &mut sink);
    assert!(!hw.heater_is_on());
    assert!(hw.pump_is_on());
}

#[test]
fn equal_sub_zero_water_keeps_heater_off() {
    let mut hw = MockHardware::uniform(500, -1_000, -100);
    let (mut app, mut sink) = make_app(ControllerConfig::default(), &mut hw);
    app.tick(&mut hw, &mut sink);
    assert!(!hw.heater_is_on());
    assert!(hw.pump_is_on());
}

#[test]
fn every_cycle_rewrites_both_relays() {
    let mut hw = MockHardware::uniform(2_000, 500, 1_000);
    let (mut app, mut sink) = make_app(ControllerConfig::basic(), &mut hw);
    app.tick(&mut hw, &mut sink);
    app.tick(&mut hw, &mut sink);
    assert_eq!(
        hw.calls,
        [
            ActuatorCall::Heater(true),
            ActuatorCall::Pump(true),
            ActuatorCall::Heater(true),
            ActuatorCall::Pump(true),
        ]
    );
}

// ── Over-temperature ──────────────────────────────────────────

#[test]
fn hot_air_halts_before_other_reads() {
    let mut hw = MockHardware::uniform(6_000, 500, 1_000);
    let (mut app, mut sink) = make_app(ControllerConfig::default(), &mut hw);

    app.tick(&mut hw, &mut sink);

    assert_eq!(hw.reads, [SensorId::Air]);
    assert_eq!(app.state(), StateId::Halted);
    assert_eq!(app.halt(), Some(HaltCode::OverTemperature));
    assert!(!hw.heater_is_on());
    assert!(!hw.pump_is_on());
    assert_eq!(sink.events, [AppEvent::Halted(HaltCode::OverTemperature)]);
}

#[test]
fn air_at_limit_halts() {
    let mut hw = MockHardware::uniform(5_000, 500, 1_000);
    let (mut app, mut sink) = make_app(ControllerConfig::default(), &mut hw);
    app.tick(&mut hw, &mut sink);
    assert_eq!(app.halt(), Some(HaltCode::OverTemperature));
}

// ── Heater runaway ────────────────────────────────────────────

#[test]
fn runaway_halts_when_streak_exceeds_limit() {
    let config = ControllerConfig {
        max_heater_periods: 3,
        ..ControllerConfig::default()
    };
    let mut hw = MockHardware::uniform(2_000, 500, 1_000);
    let (mut app, mut sink) = make_app(config, &mut hw);

    for _ in 0..3 {
        app.tick(&mut hw, &mut sink);
    }
    assert_eq!(app.state(), StateId::Running);
    assert_eq!(app.heater_streak(), 3);

    app.tick(&mut hw, &mut sink);
    assert_eq!(app.state(), StateId::Halted);
    assert_eq!(app.halt(), Some(HaltCode::HeaterRunaway));
    assert!(!hw.heater_is_on());
    assert!(!hw.pump_is_on());
    assert_eq!(sink.events.last(), Some(&AppEvent::Halted(HaltCode::HeaterRunaway)));
}

#[test]
fn halted_cycles_repeat_the_code_and_skip_reads() {
    let config = ControllerConfig {
        max_heater_periods: 1,
        ..ControllerConfig::default()
    };
    let mut hw = MockHardware::uniform(2_000, 500, 1_000);
    let (mut app, mut sink) = make_app(config, &mut hw);
    app.tick(&mut hw, &mut sink);
    app.tick(&mut hw, &mut sink);
    assert_eq!(app.halt(), Some(HaltCode::HeaterRunaway));

    hw.clear_history();
    sink.clear();
    for _ in 0..4 {
        app.tick(&mut hw, &mut sink);
        app.wait_for_next_cycle(&mut hw);
    }

    assert!(hw.reads.is_empty());
    assert_eq!(sink.halts(), [HaltCode::HeaterRunaway; 4]);
    assert_eq!(sink.statuses(), 0);
    assert!(!hw.heater_is_on());
    assert!(!hw.pump_is_on());
    assert!(hw.led_is_on());
    assert_eq!(hw.slept_ms, 4_000);
}

// ── Bad readings ──────────────────────────────────────────────

#[test]
fn bad_reading_finishes_cycle_then_halts_next_cycle() {
    let mut hw = MockHardware::uniform(2_000, 500, 1_000);
    hw.set(SensorId::SoilB, Err(ProbeError::NoPresence));
    let (mut app, mut sink) = make_app(ControllerConfig::default(), &mut hw);

    app.tick(&mut hw, &mut sink);
    assert_eq!(hw.reads, SensorId::ALL);
    assert_eq!(app.state(), StateId::Running);
    assert_eq!(app.pending_halt(), Some(HaltCode::BadReading));
    assert!(!hw.heater_is_on());
    assert!(!hw.pump_is_on());
    assert_eq!(sink.statuses(), 1);

    hw.clear_history();
    sink.clear();
    app.tick(&mut hw, &mut sink);
    assert!(hw.reads.is_empty());
    assert_eq!(app.state(), StateId::Halted);
    assert_eq!(sink.events, [AppEvent::Halted(HaltCode::BadReading)]);

    sink.clear();
    app.tick(&mut hw, &mut sink);
    assert_eq!(sink.events, [AppEvent::HaltRepeated(HaltCode::BadReading)]);
}

#[test]
fn bad_reading_on_air_still_reads_everything() {
    let mut hw = MockHardware::uniform(2_000, 500, 1_000);
    hw.set(SensorId::Air, Err(ProbeError::BusStuck));
    let (mut app, mut sink) = make_app(ControllerConfig::default(), &mut hw);
    app.tick(&mut hw, &mut sink);
    assert_eq!(hw.reads, SensorId::ALL);
    assert_eq!(app.pending_halt(), Some(HaltCode::BadReading));
}

#[test]
fn halt_survives_recovered_probe() {
    let mut hw = MockHardware::uniform(2_000, 500, 1_000);
    hw.set(SensorId::WaterB, Err(ProbeError::ConversionTimeout));
    let (mut app, mut sink) = make_app(ControllerConfig::default(), &mut hw);
    app.tick(&mut hw, &mut sink);
    app.tick(&mut hw, &mut sink);

    hw.set(SensorId::WaterB, Ok(1_000));
    for _ in 0..3 {
        app.tick(&mut hw, &mut sink);
    }
    assert_eq!(app.state(), StateId::Halted);
    assert!(!hw.heater_is_on());
}

#[test]
fn basic_config_never_halts_but_idles_faulted_cycles() {
    let mut hw = MockHardware::uniform(9_000, 500, 1_000);
    hw.set(SensorId::SoilC, Err(ProbeError::NoPresence));
    let (mut app, mut sink) = make_app(ControllerConfig::basic(), &mut hw);

    app.tick(&mut hw, &mut sink);
    assert!(!hw.heater_is_on());
    assert!(!hw.pump_is_on());

    hw.set(SensorId::SoilC, Ok(500));
    app.tick(&mut hw, &mut sink);
    assert_eq!(app.state(), StateId::Running);
    assert!(hw.heater_is_on());
    assert!(hw.pump_is_on());
    assert!(sink.halts().is_empty());
}

//! End-to-end cycles over the simulated board.
//!
//! Real 1-Wire transactions against emulated probes, real relay lines and
//! the status text exactly as it leaves the serial reporter.

use vegimeter::adapters::hardware::HardwareAdapter;
use vegimeter::adapters::serial_report::SerialReporter;
use vegimeter::app::ports::ByteSink;
use vegimeter::app::service::AppService;
use vegimeter::config::ControllerConfig;
use vegimeter::drivers::one_wire::{CONVERT_T, READ_SCRATCHPAD, SKIP_ROM};
use vegimeter::drivers::sim::{SimBoard, SimProbe};
use vegimeter::error::{HaltCode, ProbeError, SinkError};
use vegimeter::fsm::StateId;
use vegimeter::sensors::SensorId;

#[derive(Default)]
struct Transcript {
    bytes: Vec<u8>,
}

impl Transcript {
    fn text(&self) -> &str {
        std::str::from_utf8(&self.bytes).unwrap()
    }
}

impl ByteSink for Transcript {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), SinkError> {
        self.bytes.extend_from_slice(bytes);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

struct Rig {
    app: AppService,
    hw: HardwareAdapter<SimBoard>,
    out: SerialReporter<Transcript>,
}

impl Rig {
    /// Every probe attached: one air, one soil and one water temperature.
    fn new(config: ControllerConfig, air: i32, soil: i32, water: i32) -> Self {
        let mut board = SimBoard::new();
        let lines = config.lines;
        board.attach_probe(lines.air, SimProbe::at_centidegrees(air));
        for line in lines.soil {
            board.attach_probe(line, SimProbe::at_centidegrees(soil));
        }
        for line in lines.water {
            board.attach_probe(line, SimProbe::at_centidegrees(water));
        }
        let hw = HardwareAdapter::new(board, &config);
        let mut rig = Self {
            app: AppService::new(config),
            hw,
            out: SerialReporter::new(Transcript::default()),
        };
        rig.app.start(&mut rig.hw, &mut rig.out);
        rig
    }

    fn tick(&mut self) {
        self.app.tick(&mut self.hw, &mut self.out);
    }

    fn text(&self) -> &str {
        self.out.sink().text()
    }

    fn probe(&mut self, id: SensorId) -> &mut SimProbe {
        let line = id.line(&self.app.config().lines);
        self.hw.board_mut().probe_mut(line).unwrap()
    }
}

#[test]
fn cold_cycle_reports_and_drives_relays() {
    let mut rig = Rig::new(ControllerConfig::default(), 2_150, 500, 1_000);
    rig.tick();

    assert_eq!(
        rig.text(),
        "Initializing Vegimeter: 0\n\
         Air: 2150\n\
         Soil A,B,C,D,+: 500,500,500,500,2000\n\
         Water A,B,+: 1000,1000,2000\n\
         Heater,Pump,Streak: 1,1,1\n"
    );
    assert!(rig.hw.heater_is_on());
    assert!(rig.hw.pump_is_on());

    let lines = rig.app.config().lines;
    assert!(rig.hw.board().output_level(lines.heater));
    assert!(rig.hw.board().output_level(lines.pump));
}

#[test]
fn every_probe_sees_convert_then_read() {
    let mut rig = Rig::new(ControllerConfig::default(), 2_000, 500, 1_000);
    rig.tick();

    for id in SensorId::ALL {
        assert_eq!(
            rig.probe(id).received,
            [SKIP_ROM, CONVERT_T, SKIP_ROM, READ_SCRATCHPAD],
            "{}",
            id.name()
        );
    }
}

#[test]
fn sub_zero_probes_round_trip_through_the_bus() {
    let mut rig = Rig::new(ControllerConfig::default(), -1_000, -500, 2_000);
    rig.tick();
    let report = rig.app.status_report();
    assert_eq!(report.air, Ok(-1_000));
    assert_eq!(report.soil_sum, Ok(-2_000));
    assert_eq!(report.water_sum, Ok(4_000));
}

#[test]
fn strobe_alternates_the_status_led() {
    let mut rig = Rig::new(ControllerConfig::default(), 2_000, 500, 1_000);
    rig.tick();
    let first = rig.hw.led_is_on();
    rig.tick();
    assert_ne!(rig.hw.led_is_on(), first);
    rig.tick();
    assert_eq!(rig.hw.led_is_on(), first);
}

#[test]
fn warming_soil_switches_everything_off() {
    let mut rig = Rig::new(ControllerConfig::default(), 2_000, 500, 1_000);
    rig.tick();
    assert!(rig.hw.heater_is_on());

    for id in SensorId::SOIL {
        rig.probe(id).set_centidegrees(2_500);
    }
    rig.tick();
    assert!(!rig.hw.heater_is_on());
    assert!(!rig.hw.pump_is_on());
    assert_eq!(rig.app.heater_streak(), 0);
}

#[test]
fn detached_probe_prints_sentinel_then_halts() {
    let mut rig = Rig::new(ControllerConfig::default(), 2_000, 500, 1_000);
    let line = SensorId::WaterA.line(&rig.app.config().lines);
    rig.hw.board_mut().detach_probe(line);

    rig.tick();
    assert!(rig.text().contains("Water A,B,+: 54321,1000,54321\n"));
    assert!(rig.text().contains("Heater,Pump,Streak: 0,0,0\n"));
    assert!(!rig.hw.heater_is_on());
    assert!(!rig.hw.pump_is_on());

    rig.tick();
    assert_eq!(rig.app.halt(), Some(HaltCode::BadReading));
    assert!(rig.text().ends_with("Halt: 1\n"));

    rig.tick();
    assert!(rig.text().ends_with("Halt: 1\nHalt: 1\n"));
}

#[test]
fn absent_probe_reports_as_sentinel() {
    let mut rig = Rig::new(ControllerConfig::default(), 2_000, 500, 1_000);
    rig.probe(SensorId::SoilC).present = false;
    rig.tick();
    assert!(rig.text().contains("Soil A,B,C,D,+: 500,500,54321,500,54321\n"));
    assert_eq!(rig.app.pending_halt(), Some(HaltCode::BadReading));
}

#[test]
fn sensor_dropping_out_before_scratchpad_prints_sentinel() {
    let mut rig = Rig::new(ControllerConfig::default(), 2_000, 500, 1_000);
    rig.probe(SensorId::SoilD).answers_resets = Some(1);
    rig.tick();

    assert_eq!(rig.probe(SensorId::SoilD).received, [SKIP_ROM, CONVERT_T]);
    assert_eq!(rig.app.status_report().soil[3], Err(ProbeError::NoPresence));
    assert!(rig.text().contains("Soil A,B,C,D,+: 500,500,500,54321,54321\n"));
    assert_eq!(rig.app.pending_halt(), Some(HaltCode::BadReading));
}

#[test]
fn runaway_status_carries_the_tripping_streak() {
    let config = ControllerConfig {
        max_heater_periods: 2,
        ..ControllerConfig::default()
    };
    let mut rig = Rig::new(config, 2_000, 500, 1_000);
    for _ in 0..3 {
        rig.tick();
    }
    assert!(rig.text().ends_with("Heater,Pump,Streak: 0,0,3\nHalt: 3\n"));
}

#[test]
fn stuck_line_is_a_bad_reading() {
    let mut rig = Rig::new(ControllerConfig::default(), 2_000, 500, 1_000);
    rig.probe(SensorId::SoilA).stuck_low = true;
    rig.tick();
    assert_eq!(rig.app.pending_halt(), Some(HaltCode::BadReading));
    rig.tick();
    assert_eq!(rig.app.state(), StateId::Halted);
}

#[test]
fn hung_conversion_times_out() {
    let mut rig = Rig::new(ControllerConfig::default(), 2_000, 500, 1_000);
    rig.probe(SensorId::WaterB).never_converts = true;
    rig.tick();
    assert!(rig.text().contains("Water A,B,+: 1000,54321,54321\n"));
}

#[test]
fn corrupt_crc_ignored_unless_verified() {
    let mut rig = Rig::new(ControllerConfig::default(), 2_000, 500, 1_000);
    rig.probe(SensorId::Air).corrupt_crc = true;
    rig.tick();
    assert_eq!(rig.app.pending_halt(), None);

    let config = ControllerConfig {
        verify_crc: true,
        ..ControllerConfig::default()
    };
    let mut rig = Rig::new(config, 2_000, 500, 1_000);
    rig.probe(SensorId::Air).corrupt_crc = true;
    rig.tick();
    assert!(rig.text().contains("Air: 54321\n"));
    assert_eq!(rig.app.pending_halt(), Some(HaltCode::BadReading));
}

#[test]
fn hot_enclosure_halts_with_code_two() {
    let mut rig = Rig::new(ControllerConfig::default(), 5_500, 500, 1_000);
    rig.tick();
    assert_eq!(rig.text(), "Initializing Vegimeter: 0\nHalt: 2\n");
    assert!(rig.probe(SensorId::SoilA).received.is_empty());
    assert!(!rig.hw.heater_is_on());
    assert!(rig.hw.led_is_on());
}

#[test]
fn polling_wait_advances_the_board_clock() {
    use vegimeter::app::ports::ClockPort;

    let mut rig = Rig::new(ControllerConfig::default(), 2_000, 500, 1_000);
    let before = rig.hw.board_mut().now_us();
    rig.app.wait_for_next_cycle(&mut rig.hw);
    let after = rig.hw.board_mut().now_us();
    assert_eq!(after.wrapping_sub(before), 1_000_000);
}

//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the FSM, the safety monitor and the shared context.
//! All I/O flows through port traits passed in at call sites, so the
//! whole control cycle runs against mock adapters in tests.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                 │      AppService        │
//! ActuatorPort ◀──│  FSM · Safety · Relays │
//!                 └────────────────────────┘
//! ```
//!
//! One [`tick`](AppService::tick) is one polling cycle:
//!
//! 1. halted: relays off, re-announce the halt, nothing else;
//! 2. a halt left pending by the previous cycle takes effect;
//! 3. air probe, over-temperature check;
//! 4. soil and water probes (a fault never cuts the reads short);
//! 5. FSM decision (hysteresis, streak);
//! 6. runaway check;
//! 7. relays, strobe, status.

use embedded_hal::delay::DelayNs;
use log::info;

use crate::config::ControllerConfig;
use crate::error::HaltCode;
use crate::fsm::context::{FsmContext, SensorSnapshot};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::safety::SafetyMonitor;
use crate::sensors::SensorId;

use super::events::{AppEvent, StatusReport};
use super::ports::{ActuatorPort, EventSink, SensorPort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

pub struct AppService {
    fsm: Fsm,
    ctx: FsmContext,
    safety: SafetyMonitor,
    /// Strobe level driven on the status LED.
    led_on: bool,
    tick_count: u64,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch hardware; call [`start`](Self::start) next.
    pub fn new(config: ControllerConfig) -> Self {
        let safety = SafetyMonitor::new(&config);
        let ctx = FsmContext::new(config);
        let fsm = Fsm::new(build_state_table(), StateId::Running);
        Self {
            fsm,
            ctx,
            safety,
            led_on: false,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Force both relays off and announce the controller.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx);
        self.led_on = false;
        self.apply_actuators(hw);
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!("AppService started in {:?}", self.fsm.current_state());
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one polling cycle.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`], which avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn tick(&mut self, hw: &mut (impl SensorPort + ActuatorPort), sink: &mut impl EventSink) {
        self.tick_count += 1;

        if let Some(code) = self.ctx.halt {
            self.fsm.tick(&mut self.ctx);
            self.apply_actuators(hw);
            sink.emit(&AppEvent::HaltRepeated(code));
            return;
        }

        if let Some(code) = self.safety.take_pending() {
            self.enter_halt(code, hw, sink);
            return;
        }

        let air = hw.read(SensorId::Air);
        self.safety.check_reading(SensorId::Air, air);
        self.ctx.sensors = SensorSnapshot {
            air,
            ..SensorSnapshot::default()
        };
        if let Some(code) = self.safety.check_air(air) {
            self.enter_halt(code, hw, sink);
            return;
        }

        let safety = &mut self.safety;
        let mut read = |id: SensorId| {
            let r = hw.read(id);
            safety.check_reading(id, r);
            r
        };
        let soil = SensorId::SOIL.map(&mut read);
        let water = SensorId::WATER.map(&mut read);
        self.ctx.sensors = SensorSnapshot { air, soil, water };

        self.fsm.tick(&mut self.ctx);

        // Entering Halted resets the streak; report the one that tripped.
        let streak = self.ctx.heater_streak;
        let runaway = self.safety.check_runaway(streak).map(|code| self.latch(code));
        if runaway.is_none() {
            self.led_on = !self.led_on;
        }

        self.apply_actuators(hw);
        let mut report = self.status_report();
        report.heater_streak = streak;
        sink.emit(&AppEvent::Status(report));
        if let Some(code) = runaway {
            sink.emit(&AppEvent::Halted(code));
        }
    }

    /// Block for one polling period.
    pub fn wait_for_next_cycle(&self, delay: &mut impl DelayNs) {
        delay.delay_ms(self.ctx.config.polling_period_ms);
    }

    // ── Queries ───────────────────────────────────────────────

    /// Snapshot of the last cycle for reporting.
    pub fn status_report(&self) -> StatusReport {
        let s = &self.ctx.sensors;
        StatusReport {
            cycle: self.tick_count,
            state: self.fsm.current_state(),
            air: s.air,
            soil: s.soil,
            soil_sum: s.soil_sum(),
            water: s.water,
            water_sum: s.water_sum(),
            heater: self.ctx.commands.heater,
            pump: self.ctx.commands.pump,
            heater_streak: self.ctx.heater_streak,
            halt: self.ctx.halt.or(self.pending_halt()),
        }
    }

    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// The terminal halt, once latched.
    pub fn halt(&self) -> Option<HaltCode> {
        self.ctx.halt
    }

    /// Halt that will take effect at the start of the next cycle.
    pub fn pending_halt(&self) -> Option<HaltCode> {
        if self.safety.is_pending() {
            Some(HaltCode::BadReading)
        } else {
            None
        }
    }

    pub fn heater_streak(&self) -> u32 {
        self.ctx.heater_streak
    }

    /// Total cycles executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.ctx.config
    }

    // ── Internal ──────────────────────────────────────────────

    fn enter_halt(
        &mut self,
        code: HaltCode,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        let code = self.latch(code);
        self.apply_actuators(hw);
        sink.emit(&AppEvent::Halted(code));
    }

    /// Latch `code` unless a halt is already latched, and move to Halted.
    fn latch(&mut self, code: HaltCode) -> HaltCode {
        let code = *self.ctx.halt.get_or_insert(code);
        self.fsm.force_transition(StateId::Halted, &mut self.ctx);
        code
    }

    /// Drive every output from the context.  Unchanged outputs are
    /// rewritten anyway.
    fn apply_actuators(&mut self, hw: &mut impl ActuatorPort) {
        let cmds = self.ctx.commands;
        if cmds.heater {
            hw.heater_on();
        } else {
            hw.heater_off();
        }
        if cmds.pump {
            hw.pump_on();
        } else {
            hw.pump_off();
        }

        if self.ctx.config.diagnostic_strobe {
            if self.ctx.halt.is_some() {
                self.led_on = true;
            }
            hw.set_status_led(self.led_on);
        }
    }
}

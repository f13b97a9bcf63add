//! Concrete state handler functions and table builder.
//!
//! ```text
//!  RUNNING ──[halt latched]──▶ HALTED ──╳  (power cycle only)
//! ```
//!
//! Halts are forced by the service through
//! [`Fsm::force_transition`](super::Fsm::force_transition) the moment a
//! safety check latches one; `running_update` also refuses to run with a
//! latched halt in the context.

use super::context::FsmContext;
use super::{StateDescriptor, StateId};
use log::{error, info};

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0: Running
        StateDescriptor {
            id: StateId::Running,
            name: "Running",
            on_enter: Some(running_enter),
            on_update: running_update,
        },
        // Index 1: Halted
        StateDescriptor {
            id: StateId::Halted,
            name: "Halted",
            on_enter: Some(halted_enter),
            on_update: halted_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  RUNNING
// ═══════════════════════════════════════════════════════════════════════════

fn running_enter(ctx: &mut FsmContext) {
    ctx.all_off();
    info!(
        "RUNNING: gate < {} soil sum, heater cutoff > {} water sum",
        ctx.config.soil_gate(),
        ctx.config.water_cutoff()
    );
}

fn running_update(ctx: &mut FsmContext) -> Option<StateId> {
    if ctx.halt.is_some() {
        return Some(StateId::Halted);
    }
    ctx.decide();
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  HALTED (terminal)
// ═══════════════════════════════════════════════════════════════════════════

fn halted_enter(ctx: &mut FsmContext) {
    ctx.all_off();
    match ctx.halt {
        Some(code) => error!("HALTED: {} (code {})", code, code.code()),
        None => error!("HALTED without a latched code"),
    }
}

fn halted_update(ctx: &mut FsmContext) -> Option<StateId> {
    ctx.all_off();
    None
}

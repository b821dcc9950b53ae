//! Host run loop integration.
//!
//! [`ScriptHost`] owns the two long-lived contexts the overworld runs: the
//! primary context for regular scripts and the level context for map and
//! cutscene scripts. Both are created once and reused for the life of the host,
//! and both read and write the host's one set of temporary variables.

use crate::error::ScriptResult;
use crate::execution_context::ScriptExecutionContext;
use crate::execution_mode::StepOutcome;
use crate::temporaries::{SharedTemporaries, TemporaryVars};
use log::{trace, warn};
use overworld_config::EngineConfig;
use std::rc::Rc;

/// Outcome of one host tick for each context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub level: ScriptResult<StepOutcome>,
    pub primary: ScriptResult<StepOutcome>,
}

impl TickReport {
    /// Returns `true` if either context will do work on the next tick.
    pub fn is_active(&self) -> bool {
        matches!(self.level, Ok(StepOutcome::Running))
            || matches!(self.primary, Ok(StepOutcome::Running))
    }

    pub fn has_fault(&self) -> bool {
        self.level.is_err() || self.primary.is_err()
    }
}

/// What the input system may do with player movement this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputGate {
    pub movement_allowed: bool,
    /// Direction forced by a script, if any.
    pub override_direction: Option<u8>,
}

/// Owner of the primary and level script contexts.
#[derive(Debug)]
pub struct ScriptHost {
    primary: ScriptExecutionContext,
    level: ScriptExecutionContext,
    temporaries: SharedTemporaries,
    ticks: u64,
    faults: u64,
}

impl ScriptHost {
    pub fn new(config: &EngineConfig) -> Self {
        let temporaries = TemporaryVars::shared();
        let mut primary = ScriptExecutionContext::with_config("primary", &config.primary);
        let mut level = ScriptExecutionContext::with_config("level", &config.level);
        primary.share_temporaries(Rc::clone(&temporaries));
        level.share_temporaries(Rc::clone(&temporaries));
        Self {
            primary,
            level,
            temporaries,
            ticks: 0,
            faults: 0,
        }
    }

    pub fn primary(&self) -> &ScriptExecutionContext {
        &self.primary
    }

    pub fn primary_mut(&mut self) -> &mut ScriptExecutionContext {
        &mut self.primary
    }

    pub fn level(&self) -> &ScriptExecutionContext {
        &self.level
    }

    pub fn level_mut(&mut self) -> &mut ScriptExecutionContext {
        &mut self.level
    }

    pub fn temporary(&self, id: u16) -> ScriptResult<u16> {
        self.temporaries.borrow().get(id)
    }

    /// Writes a temporary, e.g. an argument for the next script to read.
    pub fn set_temporary(&mut self, id: u16, value: u16) -> ScriptResult<()> {
        self.temporaries.borrow_mut().set(id, value)
    }

    pub fn temporaries(&self) -> TemporaryVars {
        *self.temporaries.borrow()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Number of context faults seen across all ticks.
    pub fn faults(&self) -> u64 {
        self.faults
    }

    /// Steps the level context, then the primary context.
    ///
    /// A fault in one context does not prevent the other from running; the
    /// faulted context has already dropped back to paused.
    pub fn tick(&mut self) -> TickReport {
        self.ticks += 1;
        let level = self.level.step();
        let primary = self.primary.step();
        trace!(
            "tick {}: level={:?} primary={:?}",
            self.ticks,
            level,
            primary
        );
        for (name, result) in [("level", &level), ("primary", &primary)] {
            if let Err(err) = result {
                self.faults += 1;
                warn!("tick {}: {} context stopped: {}", self.ticks, name, err);
            }
        }
        TickReport {
            tick: self.ticks,
            level,
            primary,
        }
    }

    /// Input overrides for the current tick.
    ///
    /// Movement is blocked while the primary context is running or holding a
    /// parked script, unless that script handed input control back.
    pub fn player_input(&self) -> InputGate {
        let primary = &self.primary;
        let busy = !primary.mode().is_paused() || primary.parked().is_some();
        let direction = primary.input_override_direction();
        InputGate {
            movement_allowed: !busy || primary.input_control_enabled(),
            override_direction: (direction != 0).then_some(direction),
        }
    }
}

impl Default for ScriptHost {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

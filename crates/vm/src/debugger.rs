//! Debugger for script execution contexts.
//!
//! This module provides breakpoints and single stepping on top of a
//! [`ScriptExecutionContext`].

use crate::error::{ScriptError, ScriptResult};
use crate::execution_context::ScriptExecutionContext;
use crate::execution_mode::StepOutcome;
use log::debug;
use std::collections::BTreeSet;

/// Why [`ScriptDebugger::execute`] handed control back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebugStop {
    /// The cursor reached a breakpoint; the instruction there has not run yet.
    Breakpoint(usize),
    /// A command suspended the script.
    Suspended,
    /// The script ended or a native callback finished.
    Halted,
    /// Nothing was running.
    Idle,
    /// A step command finished with the cursor at this offset.
    Stepped(usize),
    /// The step limit was reached with the script still running.
    StepLimit,
    /// A fault stopped the context.
    Fault(ScriptError),
}

impl From<StepOutcome> for DebugStop {
    fn from(outcome: StepOutcome) -> Self {
        match outcome {
            StepOutcome::Idle => DebugStop::Idle,
            StepOutcome::Running => DebugStop::StepLimit,
            StepOutcome::Suspended => DebugStop::Suspended,
            StepOutcome::Halted => DebugStop::Halted,
        }
    }
}

/// Represents a debugger for a script context.
#[derive(Debug)]
pub struct ScriptDebugger {
    /// The context being debugged.
    context: ScriptExecutionContext,

    /// Breakpoint offsets into the running script.
    breakpoints: BTreeSet<usize>,

    /// Breakpoint the last run stopped on; the next run steps past it.
    stopped_at: Option<usize>,
}

impl ScriptDebugger {
    /// Creates a new debugger around the specified context.
    pub fn new(context: ScriptExecutionContext) -> Self {
        Self {
            context,
            breakpoints: BTreeSet::new(),
            stopped_at: None,
        }
    }

    pub fn context(&self) -> &ScriptExecutionContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut ScriptExecutionContext {
        &mut self.context
    }

    /// Releases the context.
    pub fn into_context(self) -> ScriptExecutionContext {
        self.context
    }

    /// Adds a breakpoint. Returns `false` if it was already set.
    pub fn add_breakpoint(&mut self, offset: usize) -> bool {
        self.breakpoints.insert(offset)
    }

    /// Removes a breakpoint. Returns `false` if it was not set.
    pub fn remove_breakpoint(&mut self, offset: usize) -> bool {
        self.breakpoints.remove(&offset)
    }

    pub fn clear_breakpoints(&mut self) {
        self.breakpoints.clear();
    }

    /// Breakpoint offsets in ascending order.
    pub fn breakpoints(&self) -> impl Iterator<Item = usize> + '_ {
        self.breakpoints.iter().copied()
    }

    pub fn has_breakpoint(&self, offset: usize) -> bool {
        self.breakpoints.contains(&offset)
    }

    /// Dispatches exactly one instruction, ignoring breakpoints and the
    /// context's dispatch policy.
    pub fn step_into(&mut self) -> ScriptResult<StepOutcome> {
        self.stopped_at = None;
        self.context.step_once()
    }

    /// Runs until the current call returns to its caller's depth.
    pub fn step_out(&mut self, max_steps: usize) -> DebugStop {
        let depth = self.context.depth();
        if depth == 0 {
            return self.execute(max_steps);
        }
        self.run_while(max_steps, |context| context.depth() >= depth)
    }

    /// Runs one instruction, finishing any call it makes.
    pub fn step_over(&mut self, max_steps: usize) -> DebugStop {
        let depth = self.context.depth();
        match self.step_into() {
            Ok(StepOutcome::Running) if self.context.depth() > depth => {
                self.run_while(max_steps, |context| context.depth() > depth)
            }
            Ok(outcome) => outcome.into(),
            Err(err) => DebugStop::Fault(err),
        }
    }

    /// Executes until a breakpoint is hit, the script suspends or halts, a
    /// fault occurs, or `max_steps` instructions have run.
    ///
    /// After stopping on a breakpoint, calling `execute` again runs the
    /// instruction under it instead of stopping at the same place.
    pub fn execute(&mut self, max_steps: usize) -> DebugStop {
        self.run_while(max_steps, |_| true)
    }

    fn run_while(
        &mut self,
        max_steps: usize,
        keep_going: impl Fn(&ScriptExecutionContext) -> bool,
    ) -> DebugStop {
        let resume_from = self.stopped_at.take();
        for step in 0..max_steps {
            if let Some(offset) = self.breakpoint_hit() {
                if step > 0 || resume_from != Some(offset) {
                    debug!("{}: breakpoint at {:#x}", self.context.name(), offset);
                    self.stopped_at = Some(offset);
                    return DebugStop::Breakpoint(offset);
                }
            }
            match self.step_into() {
                Ok(StepOutcome::Running) if keep_going(&self.context) => {}
                Ok(StepOutcome::Running) => return DebugStop::Stepped(self.cursor_offset()),
                Ok(outcome) => return outcome.into(),
                Err(err) => return DebugStop::Fault(err),
            }
        }
        DebugStop::StepLimit
    }

    fn breakpoint_hit(&self) -> Option<usize> {
        let offset = self.context.instruction_pointer()?.offset();
        self.has_breakpoint(offset).then_some(offset)
    }

    fn cursor_offset(&self) -> usize {
        self.context
            .instruction_pointer()
            .map(|cursor| cursor.offset())
            .unwrap_or_default()
    }
}

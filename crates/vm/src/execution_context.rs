//! Execution context module for the script engine.
//!
//! A [`ScriptExecutionContext`] is a resumable interpreter: an instruction cursor,
//! a bounded call stack, four variable banks and the command table it dispatches
//! through. The host steps it once per tick.

use crate::command_table::CommandTable;
use crate::error::{Corruption, ScriptError, ScriptResult};
use crate::execution_mode::{CommandStatus, ExecutionMode, NativeStatus, StepOutcome};
use crate::script::{Script, ScriptCursor};
use crate::temporaries::{SharedTemporaries, TemporaryVars};
use log::{debug, error, trace, warn};
use overworld_config::{
    ContextConfig, DispatchPolicy, BANK_COUNT, DEFAULT_MAX_INSTRUCTIONS_PER_TICK, STACK_CAPACITY,
};
use std::fmt;
use std::sync::Arc;

/// Native logic run once per step while the context is in [`ExecutionMode::Asm`].
pub type NativeFunction = Box<dyn FnMut() -> NativeStatus>;

/// What the context is doing. Each variant carries only the state valid in it.
enum Activity {
    Paused,
    Normal(ScriptCursor),
    Asm(NativeFunction),
}

/// A resumable script interpreter.
pub struct ScriptExecutionContext {
    /// Label used in log records.
    name: String,

    activity: Activity,

    /// Cursor of a script that suspended or handed off to native code.
    parked: Option<ScriptCursor>,

    /// Result of the last comparison, consumed by conditional commands.
    comparison_result: u8,

    /// Saved return addresses; `len()` is the call depth.
    call_stack: Vec<ScriptCursor>,

    command_table: Arc<CommandTable>,

    variables: [u32; BANK_COUNT],

    /// Host-owned `u16` temporaries; contexts of one host share the same set.
    temporaries: SharedTemporaries,

    /// Kill switch; a disabled context refuses `start()` and never advances.
    enabled: bool,

    /// Read by the host input system; never interpreted here.
    input_control_enabled: bool,
    input_override_direction: u8,

    dispatch: DispatchPolicy,
    max_instructions_per_tick: usize,

    last_fault: Option<ScriptError>,
}

impl ScriptExecutionContext {
    /// Creates a paused context bound to the core command table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            activity: Activity::Paused,
            parked: None,
            comparison_result: 0,
            call_stack: Vec::with_capacity(STACK_CAPACITY),
            command_table: CommandTable::core(),
            variables: [0; BANK_COUNT],
            temporaries: TemporaryVars::shared(),
            enabled: true,
            input_control_enabled: false,
            input_override_direction: 0,
            dispatch: DispatchPolicy::default(),
            max_instructions_per_tick: DEFAULT_MAX_INSTRUCTIONS_PER_TICK,
            last_fault: None,
        }
    }

    /// Creates a paused context using the given settings.
    pub fn with_config(name: impl Into<String>, config: &ContextConfig) -> Self {
        let mut context = Self::new(name);
        context.enabled = config.enabled;
        context.dispatch = config.dispatch;
        context.max_instructions_per_tick = config.max_instructions_per_tick.max(1);
        context
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> ExecutionMode {
        match self.activity {
            Activity::Paused => ExecutionMode::Paused,
            Activity::Normal(_) => ExecutionMode::Normal,
            Activity::Asm(_) => ExecutionMode::Asm,
        }
    }

    /// Current call stack occupancy.
    pub fn depth(&self) -> usize {
        self.call_stack.len()
    }

    pub fn call_stack(&self) -> &[ScriptCursor] {
        &self.call_stack
    }

    /// The instruction cursor; only present in normal mode.
    pub fn instruction_pointer(&self) -> Option<&ScriptCursor> {
        match &self.activity {
            Activity::Normal(cursor) => Some(cursor),
            _ => None,
        }
    }

    /// The cursor that `resume()` would continue from.
    pub fn parked(&self) -> Option<&ScriptCursor> {
        self.parked.as_ref()
    }

    pub fn command_table(&self) -> &Arc<CommandTable> {
        &self.command_table
    }

    pub fn dispatch_policy(&self) -> DispatchPolicy {
        self.dispatch
    }

    pub fn set_dispatch_policy(&mut self, dispatch: DispatchPolicy) {
        self.dispatch = dispatch;
    }

    pub fn last_fault(&self) -> Option<&ScriptError> {
        self.last_fault.as_ref()
    }

    /// Starts `script` from its first byte, preempting anything in progress.
    pub fn start(&mut self, script: Script, table: Arc<CommandTable>) -> ScriptResult<()> {
        self.ensure_enabled()?;
        if !self.mode().is_paused() {
            debug!("{}: preempting {:?} execution", self.name, self.mode());
        }

        self.reset_for_start(table);
        debug!(
            "{}: starting script of {} bytes with table '{}'",
            self.name,
            script.len(),
            self.command_table.name()
        );
        self.activity = Activity::Normal(script.start());
        Ok(())
    }

    /// Starts a native callback with no script behind it.
    pub fn start_native(
        &mut self,
        callback: impl FnMut() -> NativeStatus + 'static,
    ) -> ScriptResult<()> {
        self.ensure_enabled()?;
        let table = Arc::clone(&self.command_table);
        self.reset_for_start(table);
        debug!("{}: starting native callback", self.name);
        self.activity = Activity::Asm(Box::new(callback));
        Ok(())
    }

    fn reset_for_start(&mut self, table: Arc<CommandTable>) {
        self.call_stack.clear();
        self.parked = None;
        self.last_fault = None;
        self.command_table = table;
    }

    fn ensure_enabled(&self) -> ScriptResult<()> {
        if self.enabled {
            Ok(())
        } else {
            debug!("{}: start refused, context disabled", self.name);
            Err(ScriptError::Disabled)
        }
    }

    /// Runs one tick according to the dispatch policy.
    ///
    /// Under [`DispatchPolicy::SingleInstruction`] at most one opcode is
    /// dispatched. Under [`DispatchPolicy::UntilSuspend`] opcodes keep running
    /// until one suspends, the script ends or leaves normal mode, or the
    /// per-tick budget is spent.
    ///
    /// Any error is fatal: it is logged, kept in [`last_fault`](Self::last_fault),
    /// the context drops back to paused, and the error is returned.
    pub fn step(&mut self) -> ScriptResult<StepOutcome> {
        let budget = match self.dispatch {
            DispatchPolicy::SingleInstruction => 1,
            DispatchPolicy::UntilSuspend => self.max_instructions_per_tick,
        };
        self.run(budget)
    }

    /// Runs exactly one dispatch unit regardless of the dispatch policy.
    pub fn step_once(&mut self) -> ScriptResult<StepOutcome> {
        self.run(1)
    }

    fn run(&mut self, budget: usize) -> ScriptResult<StepOutcome> {
        if !self.enabled {
            return Ok(StepOutcome::Idle);
        }

        let result = match self.mode() {
            ExecutionMode::Paused => return Ok(StepOutcome::Idle),
            ExecutionMode::Asm => Ok(self.step_native()),
            ExecutionMode::Normal => self.dispatch_loop(budget),
        };
        result.map_err(|err| self.fault(err))
    }

    fn step_native(&mut self) -> StepOutcome {
        let Activity::Asm(callback) = &mut self.activity else {
            return StepOutcome::Idle;
        };
        match callback() {
            NativeStatus::Pending => StepOutcome::Running,
            NativeStatus::Finished => {
                debug!("{}: native callback finished", self.name);
                self.activity = Activity::Paused;
                StepOutcome::Halted
            }
        }
    }

    fn dispatch_loop(&mut self, budget: usize) -> ScriptResult<StepOutcome> {
        for _ in 0..budget {
            let outcome = self.dispatch_one()?;
            if outcome != StepOutcome::Running || !self.mode().is_normal() {
                return Ok(outcome);
            }
        }
        Ok(StepOutcome::Running)
    }

    fn dispatch_one(&mut self) -> ScriptResult<StepOutcome> {
        let (offset, opcode) = {
            let Activity::Normal(cursor) = &mut self.activity else {
                return Ok(StepOutcome::Idle);
            };
            if cursor.is_at_end() {
                debug!(
                    "{}: reached end of script at {:#x}",
                    self.name,
                    cursor.offset()
                );
                self.activity = Activity::Paused;
                self.parked = None;
                return Ok(StepOutcome::Halted);
            }
            (cursor.offset(), cursor.read_u8()?)
        };

        let handler = self
            .command_table
            .handler(opcode)
            .map_err(|kind| ScriptError::corrupt(offset, kind))?;
        trace!(
            "{}: dispatch {:#04x} at {:#x} via '{}'",
            self.name,
            opcode,
            offset,
            self.command_table.name()
        );

        // Suspend only parks a script still in normal mode. A handler that
        // already stopped or handed off to native code keeps that mode.
        if handler(self)? == CommandStatus::Suspend && self.mode().is_normal() {
            if let Activity::Normal(cursor) =
                std::mem::replace(&mut self.activity, Activity::Paused)
            {
                debug!("{}: suspended at {:#x}", self.name, cursor.offset());
                self.parked = Some(cursor);
            }
        }

        Ok(match self.mode() {
            ExecutionMode::Normal | ExecutionMode::Asm => StepOutcome::Running,
            ExecutionMode::Paused if self.parked.is_some() => StepOutcome::Suspended,
            ExecutionMode::Paused => StepOutcome::Halted,
        })
    }

    fn fault(&mut self, err: ScriptError) -> ScriptError {
        error!("{}: script fault: {}", self.name, err);
        self.activity = Activity::Paused;
        self.parked = None;
        self.last_fault = Some(err.clone());
        err
    }

    /// Continues a parked script in normal mode.
    ///
    /// Fails with [`ScriptError::NothingToResume`] unless the context is paused
    /// with a parked cursor.
    pub fn resume(&mut self) -> ScriptResult<()> {
        if !self.enabled {
            return Err(ScriptError::Disabled);
        }
        if !self.mode().is_paused() {
            return Err(ScriptError::NothingToResume);
        }
        let cursor = self.parked.take().ok_or(ScriptError::NothingToResume)?;
        debug!("{}: resuming at {:#x}", self.name, cursor.offset());
        self.activity = Activity::Normal(cursor);
        Ok(())
    }

    /// Stops the script entirely; nothing is left to resume.
    pub fn stop(&mut self) {
        self.activity = Activity::Paused;
        self.parked = None;
    }

    /// Hands control to native code, parking the running script (if any) so
    /// the host can `resume()` it once the callback finishes.
    pub fn run_native(&mut self, callback: impl FnMut() -> NativeStatus + 'static) {
        let previous = std::mem::replace(&mut self.activity, Activity::Asm(Box::new(callback)));
        if let Activity::Normal(cursor) = previous {
            self.parked = Some(cursor);
        }
    }

    fn cursor_mut(&mut self, operation: &'static str) -> ScriptResult<&mut ScriptCursor> {
        match &mut self.activity {
            Activity::Normal(cursor) => Ok(cursor),
            _ => Err(ScriptError::NotRunning { operation }),
        }
    }

    /// Pushes the current cursor and continues at `target`.
    ///
    /// At capacity nothing changes and [`ScriptError::StackOverflow`] is returned.
    pub fn call(&mut self, target: ScriptCursor) -> ScriptResult<()> {
        let Activity::Normal(cursor) = &mut self.activity else {
            return Err(ScriptError::NotRunning { operation: "call" });
        };
        if self.call_stack.len() >= STACK_CAPACITY {
            warn!(
                "{}: call to {:#x} refused, stack full at depth {}",
                self.name,
                target.offset(),
                self.call_stack.len()
            );
            return Err(ScriptError::StackOverflow {
                capacity: STACK_CAPACITY,
            });
        }
        let return_to = std::mem::replace(cursor, target);
        self.call_stack.push(return_to);
        Ok(())
    }

    /// Pops the last saved cursor. An empty stack is [`ScriptError::StackUnderflow`]
    /// and leaves the context unchanged.
    pub fn return_(&mut self) -> ScriptResult<()> {
        let Activity::Normal(cursor) = &mut self.activity else {
            return Err(ScriptError::NotRunning { operation: "return" });
        };
        *cursor = self.call_stack.pop().ok_or(ScriptError::StackUnderflow)?;
        Ok(())
    }

    /// Moves the cursor to `target` without touching the call stack.
    pub fn jump(&mut self, target: ScriptCursor) -> ScriptResult<()> {
        *self.cursor_mut("jump")? = target;
        Ok(())
    }

    /// Rebinds the active table. The handler currently running is unaffected;
    /// the next dispatch uses `table`.
    pub fn set_command_table(&mut self, table: Arc<CommandTable>) {
        debug!(
            "{}: command table '{}' -> '{}'",
            self.name,
            self.command_table.name(),
            table.name()
        );
        self.command_table = table;
    }

    /// Rebinds the active table and hands back the previous one for restoring later.
    pub fn swap_command_table(&mut self, table: Arc<CommandTable>) -> Arc<CommandTable> {
        let previous = Arc::clone(&self.command_table);
        self.set_command_table(table);
        previous
    }

    pub fn read_variable(&self, bank: usize) -> ScriptResult<u32> {
        self.variables
            .get(bank)
            .copied()
            .ok_or(ScriptError::InvalidBankIndex(bank))
    }

    pub fn write_variable(&mut self, bank: usize, value: u32) -> ScriptResult<()> {
        let slot = self
            .variables
            .get_mut(bank)
            .ok_or(ScriptError::InvalidBankIndex(bank))?;
        *slot = value;
        Ok(())
    }

    pub fn variables(&self) -> &[u32; BANK_COUNT] {
        &self.variables
    }

    pub fn read_temporary(&self, id: u16) -> ScriptResult<u16> {
        self.temporaries.borrow().get(id)
    }

    pub fn write_temporary(&mut self, id: u16, value: u16) -> ScriptResult<()> {
        self.temporaries.borrow_mut().set(id, value)
    }

    /// Snapshot of the temporaries this context sees.
    pub fn temporaries(&self) -> TemporaryVars {
        *self.temporaries.borrow()
    }

    /// Binds the context to a temporaries set owned elsewhere.
    pub fn share_temporaries(&mut self, temporaries: SharedTemporaries) {
        self.temporaries = temporaries;
    }

    pub fn comparison_result(&self) -> u8 {
        self.comparison_result
    }

    pub fn set_comparison_result(&mut self, value: u8) {
        self.comparison_result = value;
    }

    pub fn read_u8(&mut self) -> ScriptResult<u8> {
        self.cursor_mut("read_u8")?.read_u8()
    }

    pub fn read_u16(&mut self) -> ScriptResult<u16> {
        self.cursor_mut("read_u16")?.read_u16()
    }

    pub fn read_u32(&mut self) -> ScriptResult<u32> {
        self.cursor_mut("read_u32")?.read_u32()
    }

    /// Reads a `u32` address operand and resolves it inside the running script.
    pub fn read_target(&mut self) -> ScriptResult<ScriptCursor> {
        let cursor = self.cursor_mut("read_target")?;
        let at = cursor.offset();
        let target = cursor.read_u32()? as usize;
        let len = cursor.script().len();
        cursor
            .with_offset(target)
            .map_err(|_| ScriptError::corrupt(at, Corruption::TargetOutOfBounds { target, len }))
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn input_control_enabled(&self) -> bool {
        self.input_control_enabled
    }

    pub fn set_input_control(&mut self, enabled: bool) {
        self.input_control_enabled = enabled;
    }

    pub fn input_override_direction(&self) -> u8 {
        self.input_override_direction
    }

    pub fn set_input_override_direction(&mut self, direction: u8) {
        self.input_override_direction = direction;
    }
}

impl Default for ScriptExecutionContext {
    fn default() -> Self {
        Self::new("script")
    }
}

impl fmt::Debug for ScriptExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptExecutionContext")
            .field("name", &self.name)
            .field("mode", &self.mode())
            .field("instruction_pointer", &self.instruction_pointer())
            .field("parked", &self.parked)
            .field("depth", &self.depth())
            .field("comparison_result", &self.comparison_result)
            .field("command_table", &self.command_table.name())
            .field("variables", &self.variables)
            .field("temporaries", &self.temporaries.borrow())
            .field("enabled", &self.enabled)
            .field("input_control_enabled", &self.input_control_enabled)
            .field("input_override_direction", &self.input_override_direction)
            .field("last_fault", &self.last_fault)
            .finish()
    }
}

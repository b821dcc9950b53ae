//! Execution mode and step signalling types.

/// Indicates what a context does when it is stepped.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Not executing anything; `step()` is a no-op.
    #[default]
    Paused = 0,

    /// Reading and dispatching byte-coded instructions.
    Normal = 1,

    /// Running a native callback once per step.
    Asm = 2,
}

impl ExecutionMode {
    #[inline]
    pub fn is_paused(self) -> bool {
        self == ExecutionMode::Paused
    }

    #[inline]
    pub fn is_normal(self) -> bool {
        self == ExecutionMode::Normal
    }

    #[inline]
    pub fn is_asm(self) -> bool {
        self == ExecutionMode::Asm
    }
}

/// What a command handler asks the context to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    /// Keep going; the dispatch policy decides whether the next opcode runs this tick.
    Continue,
    /// Stop for the rest of the tick and park the script until the host resumes it.
    ///
    /// Only takes effect while the context is still in normal mode. If the
    /// handler already called `stop()` or `run_native()`, that mode wins and
    /// the native callback runs on the following steps.
    Suspend,
}

/// Value returned by a native callback running in [`ExecutionMode::Asm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeStatus {
    Finished,
    Pending,
}

impl From<bool> for NativeStatus {
    fn from(finished: bool) -> Self {
        if finished {
            NativeStatus::Finished
        } else {
            NativeStatus::Pending
        }
    }
}

/// Result of a single `step()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The context was paused or disabled and did nothing.
    Idle,
    /// Work was done and the context is still in normal or asm mode.
    Running,
    /// A command suspended; the script is parked and the context paused.
    Suspended,
    /// The script or native callback finished; the context is paused.
    Halted,
}

impl StepOutcome {
    /// Returns `true` when the context will do more work on the next step.
    pub fn is_active(self) -> bool {
        self == StepOutcome::Running
    }
}

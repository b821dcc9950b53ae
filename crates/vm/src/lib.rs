//! # Overworld script engine
//!
//! A resumable bytecode interpreter for overworld event scripts.
//!
//! Scripts are byte streams of one-byte opcodes followed by operands. A
//! [`ScriptExecutionContext`] walks a stream one tick at a time, dispatching each
//! opcode through the [`CommandTable`] it is bound to. Commands can call into
//! subroutines, branch on the last comparison, read and write four `u32` variable
//! banks and the host's `u16` temporaries, suspend the script until the host resumes it, or hand control to native
//! code for a while.
//!
//! ## Architecture
//!
//! - **ScriptExecutionContext**: cursor, call stack, banks and mode of one script
//! - **CommandTable**: opcode to handler mapping, shared behind `Arc` and
//!   swappable between instructions
//! - **ScriptHost**: the primary and level contexts a game loop ticks
//! - **ScriptDebugger**: breakpoints and stepping over a context
//! - **ScriptBuilder**: assembler for the core command set
//!
//! ## Example
//!
//! ```rust
//! use overworld_vm::{CommandTable, ScriptBuilder, ScriptExecutionContext, StepOutcome};
//!
//! # fn example() -> Result<(), overworld_vm::ScriptError> {
//! let mut builder = ScriptBuilder::new();
//! builder.load_bank(1, 40).add_bank(1, 2).end();
//!
//! let mut context = ScriptExecutionContext::new("primary");
//! context.start(builder.to_script(), CommandTable::core())?;
//!
//! while context.step()? == StepOutcome::Running {}
//! assert_eq!(context.read_variable(1)?, 42);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(rustdoc::missing_crate_level_docs)]

/// Opcode to handler mapping and the core handlers
pub mod command_table;
/// Breakpoints and stepping
pub mod debugger;
/// Error types and result alias
pub mod error;
/// Resumable interpreter state
pub mod execution_context;
/// Execution modes and step outcomes
pub mod execution_mode;
/// Host integration for the primary and level contexts
pub mod host;
/// Core opcode and condition definitions
pub mod op_code;
/// Script buffers and cursors
pub mod script;
/// Utility for assembling core scripts
pub mod script_builder;
/// Host-owned temporary variables
pub mod temporaries;

pub use command_table::{CommandHandler, CommandTable, CommandTableBuilder};
pub use debugger::{DebugStop, ScriptDebugger};
pub use error::{Corruption, ScriptError, ScriptResult};
pub use execution_context::{NativeFunction, ScriptExecutionContext};
pub use execution_mode::{CommandStatus, ExecutionMode, NativeStatus, StepOutcome};
pub use host::{InputGate, ScriptHost, TickReport};
pub use op_code::{Condition, OpCode};
pub use script::{Script, ScriptCursor};
pub use script_builder::ScriptBuilder;
pub use temporaries::{SharedTemporaries, TemporaryVars, RESULT_VAR, TEMP_VARS};

pub use overworld_config::{
    ContextConfig, DispatchPolicy, EngineConfig, BANK_COUNT, MESSAGE_BANK, STACK_CAPACITY,
};

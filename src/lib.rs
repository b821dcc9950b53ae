//! # Overworld-RS: cooperative script engine for overworld game events
//!
//! This library bundles the workspace crates behind one dependency:
//! - Resumable script contexts with a bounded call stack and four variable banks
//! - Hot-swappable command tables shared behind `Arc`
//! - A core command set, a script builder and a breakpoint debugger
//! - A host that ticks the primary and level contexts over shared temporaries
//! - TOML configuration for dispatch policy and instruction budgets
//!
//! ## Quick Start
//!
//! ```rust
//! use overworld_rs::prelude::*;
//!
//! # fn main() -> Result<(), ScriptError> {
//! let mut builder = ScriptBuilder::new();
//! builder.lock_input().face(2).wait().release_input().end();
//!
//! let mut host = ScriptHost::new(&EngineConfig::default());
//! host.primary_mut().start(builder.to_script(), CommandTable::core())?;
//!
//! while host.tick().primary? == StepOutcome::Running {}
//! assert!(!host.player_input().movement_allowed);
//!
//! host.primary_mut().resume()?;
//! while host.tick().primary? == StepOutcome::Running {}
//! assert!(host.player_input().movement_allowed);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`config`] - constants and [`EngineConfig`](config::EngineConfig)
//! - [`vm`] - contexts, command tables, host and debugger

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub use overworld_config as config;
pub use overworld_vm as vm;

/// Common imports for driving scripts
pub mod prelude {
    pub use crate::config::{ContextConfig, DispatchPolicy, EngineConfig};
    pub use crate::vm::{
        CommandStatus, CommandTable, CommandTableBuilder, ExecutionMode, Script, ScriptBuilder,
        ScriptError, ScriptExecutionContext, ScriptHost, ScriptResult, StepOutcome, TemporaryVars,
        RESULT_VAR,
    };
}

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

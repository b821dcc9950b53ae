//! Overworld CLI library.
//!
//! Argument definitions and the script runner used by the `overworld-cli` binary.

pub mod args;
pub mod runner;

pub use args::{Cli, Command, RunArgs};
pub use runner::{load_config, load_script, run_script, RunSummary};

//! Script engine error types.
//!
//! Script byte streams are compiled, trusted input. Apart from [`ScriptError::Disabled`]
//! and [`ScriptError::NothingToResume`], every error here means the running program or
//! the command table is broken and the context must be restarted by the host.

use thiserror::Error;

/// Result type used throughout the script engine.
pub type ScriptResult<T> = std::result::Result<T, ScriptError>;

/// Ways a byte stream can be malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corruption {
    /// The opcode lies beyond the last entry of the active command table.
    OpcodeOutOfRange { opcode: u8, table_len: usize },
    /// The opcode is inside the table bound but has no handler registered.
    UnassignedOpcode { opcode: u8 },
    /// An operand runs past the end of the script.
    TruncatedOperand { wanted: usize, available: usize },
    /// A jump or call target lies outside the script.
    TargetOutOfBounds { target: usize, len: usize },
    /// A conditional command carries an unknown condition code.
    InvalidCondition { code: u8 },
}

impl std::fmt::Display for Corruption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Corruption::OpcodeOutOfRange { opcode, table_len } => write!(
                f,
                "opcode {opcode:#04x} outside command table of {table_len} entries"
            ),
            Corruption::UnassignedOpcode { opcode } => {
                write!(f, "opcode {opcode:#04x} has no handler")
            }
            Corruption::TruncatedOperand { wanted, available } => write!(
                f,
                "operand needs {wanted} bytes but only {available} remain"
            ),
            Corruption::TargetOutOfBounds { target, len } => {
                write!(f, "target {target:#x} outside script of {len} bytes")
            }
            Corruption::InvalidCondition { code } => {
                write!(f, "unknown condition code {code}")
            }
        }
    }
}

/// Errors raised by script contexts and command handlers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("script context is disabled")]
    Disabled,

    #[error("call stack overflow: capacity of {capacity} return addresses reached")]
    StackOverflow { capacity: usize },

    #[error("call stack underflow: return without a matching call")]
    StackUnderflow,

    #[error("corrupt program at offset {offset:#x}: {kind}")]
    CorruptProgram { offset: usize, kind: Corruption },

    #[error("invalid variable bank index {0}")]
    InvalidBankIndex(usize),

    #[error("invalid temporary variable {0:#06x}")]
    InvalidTemporary(u16),

    #[error("{operation} requires a context in normal mode")]
    NotRunning { operation: &'static str },

    #[error("no parked script to resume")]
    NothingToResume,
}

impl ScriptError {
    pub fn corrupt(offset: usize, kind: Corruption) -> Self {
        ScriptError::CorruptProgram { offset, kind }
    }

    /// Returns `true` when the error leaves the context unusable until the next `start()`.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ScriptError::Disabled | ScriptError::NothingToResume)
    }
}

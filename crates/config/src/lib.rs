//! Overworld Configuration Module
//!
//! This module provides the constants and configuration types shared by the
//! script engine crates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Maximum number of saved return addresses on a context call stack.
pub const STACK_CAPACITY: usize = 20;
/// Number of general purpose variable banks per context.
pub const BANK_COUNT: usize = 4;
/// Bank used to hand a pointer-sized payload (e.g. a message offset) to a command.
pub const MESSAGE_BANK: usize = 0;
/// Instruction budget for a single tick under [`DispatchPolicy::UntilSuspend`].
pub const DEFAULT_MAX_INSTRUCTIONS_PER_TICK: usize = 1024;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// How many instructions a context may dispatch per host tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DispatchPolicy {
    /// Exactly one opcode per `step()`.
    #[default]
    SingleInstruction,
    /// Keep dispatching inside one `step()` until a command suspends, the
    /// script ends or leaves normal mode, or the per-tick budget runs out.
    UntilSuspend,
}

impl fmt::Display for DispatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchPolicy::SingleInstruction => write!(f, "single-instruction"),
            DispatchPolicy::UntilSuspend => write!(f, "until-suspend"),
        }
    }
}

impl FromStr for DispatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" | "single-instruction" | "step" => Ok(DispatchPolicy::SingleInstruction),
            "until-suspend" | "until_suspend" | "run" => Ok(DispatchPolicy::UntilSuspend),
            _ => Err(format!("Unknown dispatch policy: {}", s)),
        }
    }
}

/// Per-context engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Whether the context accepts `start()` right after construction.
    pub enabled: bool,
    pub dispatch: DispatchPolicy,
    pub max_instructions_per_tick: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dispatch: DispatchPolicy::default(),
            max_instructions_per_tick: DEFAULT_MAX_INSTRUCTIONS_PER_TICK,
        }
    }
}

impl ContextConfig {
    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.max_instructions_per_tick == 0 {
            return Err(ConfigError::Invalid {
                field,
                reason: "max_instructions_per_tick must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Engine configuration for the host run loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Context running regular (NPC, signpost, item) scripts.
    pub primary: ContextConfig,
    /// Context running level and cutscene scripts.
    pub level: ContextConfig,
}

impl EngineConfig {
    /// Parses a TOML document and validates it.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Renders the configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.primary.validate("primary.max_instructions_per_tick")?;
        self.level.validate("level.max_instructions_per_tick")?;
        Ok(())
    }
}

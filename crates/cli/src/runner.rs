//! Loads scripts and drives them through a [`ScriptHost`].

use anyhow::{Context, Result};
use overworld_config::{DispatchPolicy, EngineConfig};
use overworld_vm::{CommandTable, Script, ScriptHost, StepOutcome, TickReport, BANK_COUNT};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Reads a script file, decoding it from hex text when `hex_input` is set.
pub fn load_script(path: &Path, hex_input: bool) -> Result<Script> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read script {}", path.display()))?;
    if !hex_input {
        return Ok(Script::new(bytes));
    }

    let text = String::from_utf8(bytes)
        .with_context(|| format!("script {} is not valid UTF-8 text", path.display()))?;
    let digits: String = text.split_whitespace().collect();
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(&digits);
    let decoded = hex::decode(digits)
        .with_context(|| format!("script {} is not valid hex", path.display()))?;
    Ok(Script::new(decoded))
}

/// Loads the engine configuration and applies command-line overrides.
pub fn load_config(path: Option<&Path>, policy: Option<DispatchPolicy>) -> Result<EngineConfig> {
    let mut config = match path {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(policy) = policy {
        config.primary.dispatch = policy;
    }
    config.validate()?;
    Ok(config)
}

/// Final state of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub outcome: StepOutcome,
    pub variables: [u32; BANK_COUNT],
}

/// Starts `script` in the primary context and ticks the host up to `max_ticks`
/// times, calling `on_tick` after every tick.
///
/// The run ends when the script halts, or suspends while `auto_resume` is off.
/// A script fault is returned as an error.
pub fn run_script(
    host: &mut ScriptHost,
    script: Script,
    max_ticks: u64,
    auto_resume: bool,
    mut on_tick: impl FnMut(&TickReport, &ScriptHost),
) -> Result<RunSummary> {
    info!(target: "overworld", bytes = script.len(), "starting script");
    host.primary_mut().start(script, CommandTable::core())?;

    let mut outcome = StepOutcome::Running;
    for _ in 0..max_ticks {
        let report = host.tick();
        on_tick(&report, host);
        outcome = report.primary?;
        match outcome {
            StepOutcome::Running => {}
            StepOutcome::Suspended if auto_resume => {
                debug!(target: "overworld", tick = report.tick, "resuming suspended script");
                host.primary_mut().resume()?;
            }
            StepOutcome::Suspended | StepOutcome::Halted | StepOutcome::Idle => break,
        }
    }

    if outcome == StepOutcome::Running {
        warn!(target: "overworld", max_ticks, "tick limit reached with script still running");
    }
    let summary = RunSummary {
        ticks: host.ticks(),
        outcome,
        variables: *host.primary().variables(),
    };
    info!(
        target: "overworld",
        ticks = summary.ticks,
        outcome = ?summary.outcome,
        "script run finished"
    );
    Ok(summary)
}

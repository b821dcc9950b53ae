use clap::{Args, Parser, Subcommand};
use overworld_config::DispatchPolicy;
use std::path::PathBuf;

/// Command-line arguments for the overworld CLI
#[derive(Parser, Debug, Clone)]
#[command(
    name = "overworld-cli",
    version = env!("CARGO_PKG_VERSION"),
    about = "Overworld CLI - drive script byte streams through the script engine"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run a script in the primary context, one host tick at a time
    Run(RunArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Script file; raw bytes unless `--hex` is given
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Treat the file as hexadecimal text (whitespace and a `0x` prefix are ignored)
    #[arg(long)]
    pub hex: bool,

    /// Maximum number of host ticks to run
    #[arg(long, default_value_t = 1000, value_name = "N")]
    pub ticks: u64,

    /// Engine configuration file (TOML)
    #[arg(long, value_name = "PATH", env = "OVERWORLD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Overrides the primary context dispatch policy (single, until-suspend)
    #[arg(long, value_name = "POLICY")]
    pub policy: Option<DispatchPolicy>,

    /// Resume the script every time it suspends instead of stopping
    #[arg(long)]
    pub resume: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_arguments() {
        let cli = Cli::parse_from([
            "overworld-cli",
            "run",
            "intro.hex",
            "--hex",
            "--ticks",
            "12",
            "--policy",
            "until-suspend",
            "--resume",
        ]);
        let Command::Run(args) = cli.command;
        assert_eq!(args.file, PathBuf::from("intro.hex"));
        assert!(args.hex);
        assert_eq!(args.ticks, 12);
        assert_eq!(args.policy, Some(DispatchPolicy::UntilSuspend));
        assert!(args.resume);
    }

    #[test]
    fn test_rejects_unknown_policy() {
        let result = Cli::try_parse_from(["overworld-cli", "run", "a.bin", "--policy", "fast"]);
        assert!(result.is_err());
    }
}

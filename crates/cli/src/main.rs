use anyhow::Result;
use clap::Parser;
use overworld_cli::{load_config, load_script, run_script, Cli, Command, RunArgs};
use overworld_vm::{ScriptHost, TickReport};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run(args),
    }
}

fn run(args: RunArgs) -> Result<()> {
    let config = load_config(args.config.as_deref(), args.policy)?;
    let script = load_script(&args.file, args.hex)?;
    info!(
        target: "overworld",
        file = %args.file.display(),
        policy = %config.primary.dispatch,
        "script loaded"
    );

    let mut host = ScriptHost::new(&config);
    let result = run_script(&mut host, script, args.ticks, args.resume, print_tick);
    match result {
        Ok(summary) => {
            println!(
                "finished after {} ticks: {:?} banks={:?}",
                summary.ticks, summary.outcome, summary.variables
            );
            Ok(())
        }
        Err(err) => {
            error!(target: "overworld", error = %err, "script run failed");
            Err(err)
        }
    }
}

fn print_tick(report: &TickReport, host: &ScriptHost) {
    let outcome = match &report.primary {
        Ok(outcome) => format!("{outcome:?}"),
        Err(err) => format!("fault: {err}"),
    };
    let gate = host.player_input();
    println!(
        "tick {:>4}: {:<10} banks={:?} cmp={} input={}",
        report.tick,
        outcome,
        host.primary().variables(),
        host.primary().comparison_result(),
        if gate.movement_allowed { "free" } else { "locked" }
    );
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,overworld=info"));
    let _ = fmt().with_env_filter(env_filter).try_init();
}

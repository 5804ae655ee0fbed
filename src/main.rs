use clap::Parser;
use rewrite_gate::{
    Cli, Command,
    handlers::{handle_analyze, handle_apply, handle_propose, handle_quality, handle_validate},
};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    match &cli.command {
        Command::Analyze { objective, format } => handle_analyze(&cli, objective, *format),
        Command::Validate { target, proposed } => handle_validate(&cli, target, proposed),
        Command::Apply {
            target,
            proposed,
            skip_validation,
        } => handle_apply(&cli, target, proposed, *skip_validation),
        Command::Propose {
            target,
            issue,
            provider,
            apply,
        } => handle_propose(&cli, target, issue, provider.as_deref(), *apply),
        Command::Quality { target, format } => handle_quality(&cli, target, *format),
    }
}

fn init_tracing(quiet: bool, verbose: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("REWRITE_GATE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Reports go to stdout; logs must not interleave with them.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

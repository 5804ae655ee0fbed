//! `analyze` command.

use super::{EXIT_ERROR, build_engine};
use crate::Cli;
use crate::cli::OutputFormat;
use crate::reporter::{JsonReporter, Reporter, TextReporter};
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing::info;

pub fn handle_analyze(cli: &Cli, objective: &str, format: OutputFormat) -> ExitCode {
    let engine = match build_engine(cli) {
        Ok(engine) => engine,
        Err(code) => return code,
    };

    let session = match engine.run_analysis_session(objective) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let output = match format {
        OutputFormat::Text => TextReporter::new()
            .with_color(std::io::stdout().is_terminal())
            .report(&session),
        OutputFormat::Json => JsonReporter::new().report(&session),
    };
    println!("{output}");

    info!(
        session = %session.session_id,
        proposals = session.proposals.len(),
        "Analyze finished"
    );
    ExitCode::SUCCESS
}

//! CLI command handlers.
//!
//! Exit codes: 0 success, 1 rejected or reverted, 2 error.

mod analyze;
mod apply;
mod propose;

pub use analyze::handle_analyze;
pub use apply::{handle_apply, handle_validate};
pub use propose::{handle_propose, handle_quality};

use crate::Cli;
use crate::config::Config;
use crate::engine::ReplicationEngine;
use crate::validator::Verdict;
use colored::Colorize;
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use tracing::debug;

pub(crate) const EXIT_REJECTED: u8 = 1;
pub(crate) const EXIT_ERROR: u8 = 2;

pub(crate) fn load_config(cli: &Cli) -> Result<Config, ExitCode> {
    let loaded = match &cli.config {
        Some(path) => Config::from_file(path),
        None => Config::load(Some(&cli.root)),
    };
    let mut config = loaded.map_err(|e| {
        eprintln!("Error: {e}");
        ExitCode::from(EXIT_ERROR)
    })?;

    if let Some(path) = &cli.custom_rules {
        let path = std::path::absolute(path).map_err(|e| {
            eprintln!("Error: Invalid custom rules path {}: {e}", path.display());
            ExitCode::from(EXIT_ERROR)
        })?;
        config.custom_rules = Some(path);
    }
    Ok(config)
}

pub(crate) fn build_engine(cli: &Cli) -> Result<ReplicationEngine, ExitCode> {
    let config = load_config(cli)?;
    ReplicationEngine::new(&cli.root, config).map_err(|e| {
        eprintln!("Error: {e}");
        ExitCode::from(EXIT_ERROR)
    })
}

/// Normalize a command-line target to a `/`-separated path relative to the
/// source root. Accepts paths that exist relative to the working directory
/// as well as paths already relative to the source root.
pub(crate) fn relative_target(engine: &ReplicationEngine, target: &str) -> String {
    let as_given = Path::new(target);
    if as_given.is_file()
        && let Ok(absolute) = fs::canonicalize(as_given)
        && let Ok(root) = fs::canonicalize(engine.source_root())
        && let Ok(relative) = absolute.strip_prefix(&root)
    {
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        debug!(target, %relative, "Resolved target against source root");
        return relative;
    }
    target.trim_start_matches("./").replace('\\', "/")
}

pub(crate) fn read_proposed(path: &Path) -> Result<String, ExitCode> {
    fs::read_to_string(path).map_err(|e| {
        eprintln!("Error: Failed to read {}: {e}", path.display());
        ExitCode::from(EXIT_ERROR)
    })
}

pub(crate) fn print_verdict(verdict: &Verdict) {
    for reason in &verdict.reasons {
        if verdict.accepted {
            eprintln!("{}", reason.green());
        } else {
            eprintln!("{}", reason.red());
        }
    }
}

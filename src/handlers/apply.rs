//! `validate` and `apply` commands.

use super::{
    EXIT_ERROR, EXIT_REJECTED, build_engine, print_verdict, read_proposed, relative_target,
};
use crate::Cli;
use crate::engine::{ApplyOutcome, RewriteProposal};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

const MANUAL_PROVIDER: &str = "manual";

pub fn handle_validate(cli: &Cli, target: &str, proposed_path: &Path) -> ExitCode {
    let engine = match build_engine(cli) {
        Ok(engine) => engine,
        Err(code) => return code,
    };
    let proposed = match read_proposed(proposed_path) {
        Ok(content) => content,
        Err(code) => return code,
    };
    let target = relative_target(&engine, target);

    match engine.validate_rewrite(&target, &proposed) {
        Ok(verdict) => {
            print_verdict(&verdict);
            if verdict.accepted {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(EXIT_REJECTED)
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

pub fn handle_apply(
    cli: &Cli,
    target: &str,
    proposed_path: &Path,
    skip_validation: bool,
) -> ExitCode {
    let engine = match build_engine(cli) {
        Ok(engine) => engine,
        Err(code) => return code,
    };
    let proposed = match read_proposed(proposed_path) {
        Ok(content) => content,
        Err(code) => return code,
    };
    let target = relative_target(&engine, target);

    if skip_validation {
        eprintln!("{}", "Safety gates skipped".yellow());
    } else {
        match engine.validate_rewrite(&target, &proposed) {
            Ok(verdict) => {
                print_verdict(&verdict);
                if !verdict.accepted {
                    return ExitCode::from(EXIT_REJECTED);
                }
            }
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::from(EXIT_ERROR);
            }
        }
    }

    let mut proposal = RewriteProposal::manual(&target, "Manual rewrite", MANUAL_PROVIDER);
    match engine.apply_proposal(&mut proposal, &proposed) {
        Ok(ApplyOutcome::Committed) => {
            println!("{} {}", "Applied".green().bold(), target);
            ExitCode::SUCCESS
        }
        Ok(ApplyOutcome::Reverted { reason }) => {
            println!("{} {}", "Reverted".red().bold(), target);
            eprintln!("{reason}");
            ExitCode::from(EXIT_REJECTED)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

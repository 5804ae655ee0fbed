//! `propose` and `quality` commands.

use super::{EXIT_ERROR, EXIT_REJECTED, build_engine, print_verdict, relative_target};
use crate::Cli;
use crate::cli::OutputFormat;
use crate::client::ProposalClient;
use crate::engine::{ReplicationEngine, ReplicationSession, RewriteProposal};
use crate::reporter::{Reporter, TextReporter};
use colored::Colorize;
use std::fs;
use std::process::ExitCode;

fn build_client(engine: &ReplicationEngine) -> Result<ProposalClient, ExitCode> {
    ProposalClient::new(&engine.config().proposal).map_err(|e| {
        eprintln!("Error: {e}");
        ExitCode::from(EXIT_ERROR)
    })
}

pub fn handle_propose(
    cli: &Cli,
    target: &str,
    issue: &str,
    provider: Option<&str>,
    apply: bool,
) -> ExitCode {
    let engine = match build_engine(cli) {
        Ok(engine) => engine,
        Err(code) => return code,
    };
    let client = match build_client(&engine) {
        Ok(client) => client,
        Err(code) => return code,
    };
    let target = relative_target(&engine, target);
    let path = engine.resolve_target(&target);
    if !path.is_file() {
        eprintln!("Error: File not found: {}", path.display());
        return ExitCode::from(EXIT_ERROR);
    }

    let provider_name = provider.unwrap_or(&engine.config().proposal.default_provider);
    let proposal = RewriteProposal::manual(&target, issue, provider_name);

    if apply {
        let mut session = ReplicationSession::new(format!("Rewrite {target}: {issue}"));
        session.proposals.push(proposal);
        let committed = engine.rewrite_and_apply(&client, &mut session, 0, provider);
        println!("{}", TextReporter::new().report(&session));
        return if committed {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(EXIT_REJECTED)
        };
    }

    let Some(proposed) = engine.request_rewrite(&client, &proposal, provider) else {
        eprintln!("{} {}", "No rewrite proposed for".yellow(), target);
        return ExitCode::from(EXIT_REJECTED);
    };

    match engine.validate_rewrite(&target, &proposed) {
        Ok(verdict) => {
            println!("{proposed}");
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

pub fn handle_quality(cli: &Cli, target: &str, format: OutputFormat) -> ExitCode {
    let engine = match build_engine(cli) {
        Ok(engine) => engine,
        Err(code) => return code,
    };
    let client = match build_client(&engine) {
        Ok(client) => client,
        Err(code) => return code,
    };
    let target = relative_target(&engine, target);
    let path = engine.resolve_target(&target);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error: Failed to read {}: {e}", path.display());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let report = client.analyze_module_quality(&target, &content);

    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::from(EXIT_ERROR);
            }
        },
        OutputFormat::Text => {
            println!("Quality: {} ({}/10)", target, report.score);
            if !report.issues.is_empty() {
                println!("\nIssues:");
                for issue in &report.issues {
                    println!("  • {issue}");
                }
            }
            if !report.suggestions.is_empty() {
                println!("\nSuggestions:");
                for suggestion in &report.suggestions {
                    println!("  • {suggestion}");
                }
            }
        }
    }
    ExitCode::SUCCESS
}

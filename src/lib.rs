pub mod cli;
pub mod client;
pub mod config;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod reporter;
pub mod rules;
pub mod scanner;
pub mod validator;

#[cfg(test)]
pub mod test_utils;

pub use cli::{Cli, Command, OutputFormat};
pub use client::{ProposalClient, QualityReport};
pub use config::Config;
pub use engine::{ApplyError, ApplyOutcome, ReplicationEngine, ReplicationSession, RewriteProposal};
pub use error::{GateError, Result};
pub use reporter::{JsonReporter, Reporter, TextReporter};
pub use rules::{Finding, Priority, RuleEngine};
pub use scanner::{Dialect, SourceModule, SourceScanner};
pub use validator::{CommandCompiler, CompileCheck, CompileOutcome, RewriteValidator, Verdict};

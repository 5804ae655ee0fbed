use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub const DEFAULT_OBJECTIVE: &str = "Improve code quality and correctness";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "rewrite-gate",
    version,
    about = "Safety gate for self-rewriting code agents",
    long_about = "rewrite-gate scans a project's live source, turns rule findings into rewrite proposals, \
                  and only lets a proposed rewrite onto disk after it passes ordered safety gates, \
                  with backup and rollback around every write."
)]
pub struct Cli {
    /// Project root containing the source directory
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Configuration file (skips config discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// YAML custom rules file, loaded after the config's rules
    #[arg(long, global = true, value_name = "PATH")]
    pub custom_rules: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Errors only
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan and analyze the source tree, then print the session report
    Analyze {
        /// Objective recorded in the session
        #[arg(long, default_value = DEFAULT_OBJECTIVE)]
        objective: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Run the safety gates for a proposed rewrite without writing anything
    Validate {
        /// Target file, relative to the source root or a path under it
        target: String,

        /// File holding the proposed content
        proposed: PathBuf,
    },

    /// Validate a proposed rewrite, then write it with backup and rollback
    Apply {
        /// Target file, relative to the source root or a path under it
        target: String,

        /// File holding the proposed content
        proposed: PathBuf,

        /// Skip the safety gates; post-write verification still runs
        #[arg(long)]
        skip_validation: bool,
    },

    /// Ask the proposal service for a rewrite and validate it
    Propose {
        /// Target file, relative to the source root or a path under it
        target: String,

        /// Issue the rewrite should address
        #[arg(long)]
        issue: String,

        /// Model provider requested from the service
        #[arg(long)]
        provider: Option<String>,

        /// Apply the rewrite when it passes validation
        #[arg(long)]
        apply: bool,
    },

    /// Request a remote quality audit of one file
    Quality {
        /// Target file, relative to the source root or a path under it
        target: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

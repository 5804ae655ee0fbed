//! Ordered safety gates every proposed rewrite must pass before it may touch
//! the live source tree.
//!
//! Gates run in a fixed order and the first failure short-circuits:
//!
//! 1. non-empty
//! 2. shrinkage (truncated model output)
//! 3. deny list
//! 4. syntax, dynamic-scripting files only
//! 5. compile, compiled-static files only

mod compile;
mod deny;
mod syntax;

pub use compile::{CommandCompiler, CompileCheck, CompileOutcome};
pub use deny::{BUILTIN_DENY_PATTERNS, DenyList};
pub use syntax::{SyntaxError, check_syntax, grammar_for};

use crate::config::{Config, ScanConfig, ValidatorConfig};
use crate::error::Result;
use crate::scanner::Dialect;
use serde::Serialize;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// File name prefix of the compile gate's scratch copies. Scans skip it.
pub const SCRATCH_PREFIX: &str = ".rewrite-gate-";

/// Outcome of [`RewriteValidator::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub accepted: bool,
    /// `REJECTED: ...` or `APPROVED: ...` lines.
    pub reasons: Vec<String>,
}

impl Verdict {
    fn approved(reason: String) -> Self {
        Self {
            accepted: true,
            reasons: vec![reason],
        }
    }

    fn rejected(reason: String) -> Self {
        Self {
            accepted: false,
            reasons: vec![reason],
        }
    }

    /// First line of the first reason, for one-line status output.
    pub fn summary(&self) -> &str {
        self.reasons
            .first()
            .and_then(|r| r.lines().next())
            .unwrap_or_default()
    }
}

pub struct RewriteValidator {
    project_root: PathBuf,
    source_root: PathBuf,
    scan: ScanConfig,
    config: ValidatorConfig,
    deny: DenyList,
    compiler: Arc<dyn CompileCheck>,
}

impl RewriteValidator {
    /// Validator for the project at `project_root`, compiling with the
    /// configured command.
    pub fn new(project_root: impl Into<PathBuf>, config: &Config) -> Result<Self> {
        let project_root = project_root.into();
        let source_root = project_root.join(&config.scan.source_dir);
        let deny = DenyList::with_extra(&config.validator.deny_patterns)?;
        let compiler = CommandCompiler::from_argv(
            &config.validator.compile_command,
            config.validator.compile_timeout(),
        );

        Ok(Self {
            project_root,
            source_root,
            scan: config.scan.clone(),
            config: config.validator.clone(),
            deny,
            compiler: Arc::new(compiler),
        })
    }

    pub fn with_compiler(mut self, compiler: impl CompileCheck + 'static) -> Self {
        self.compiler = Arc::new(compiler);
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// Run every gate that applies to `filename` over `proposed`.
    ///
    /// Never fails: problems in the gates themselves become rejections or,
    /// for a missing compiler, a logged degraded pass.
    pub fn validate(&self, filename: &str, original: &str, proposed: &str) -> Verdict {
        let dialect = self.scan.dialect_for(filename);
        let compiled = dialect == Some(Dialect::CompiledStatic);

        let result = self
            .check_non_empty(proposed)
            .and_then(|()| self.check_size(original, proposed))
            .and_then(|()| self.check_deny_list(proposed))
            .and_then(|()| match dialect {
                Some(Dialect::DynamicScripting) => self.check_syntax(filename, proposed),
                _ => Ok(()),
            })
            .and_then(|()| {
                if compiled {
                    self.check_compile(filename, proposed)
                } else {
                    Ok(())
                }
            });

        match result {
            Ok(()) => {
                let gates = if compiled { 4 } else { 3 };
                info!(file = filename, gates, "Proposal approved");
                Verdict::approved(format!("APPROVED: all {gates} safety gates passed"))
            }
            Err(reason) => {
                info!(
                    file = filename,
                    reason = reason.lines().next().unwrap_or_default(),
                    "Proposal rejected"
                );
                Verdict::rejected(reason)
            }
        }
    }

    fn check_non_empty(&self, proposed: &str) -> std::result::Result<(), String> {
        if proposed.trim().is_empty() {
            return Err("REJECTED: Proposed content is empty".to_string());
        }
        Ok(())
    }

    fn check_size(&self, original: &str, proposed: &str) -> std::result::Result<(), String> {
        let original_len = original.chars().count();
        let proposed_len = proposed.chars().count();

        if original_len > self.config.min_original_len
            && (proposed_len as f64) < (original_len as f64) * self.config.min_size_ratio
        {
            let percent = 100 * proposed_len / original_len;
            return Err(format!(
                "REJECTED: Proposed content is {proposed_len} chars vs original {original_len} chars \
                 ({percent}% of original), likely truncated output"
            ));
        }
        Ok(())
    }

    fn check_deny_list(&self, proposed: &str) -> std::result::Result<(), String> {
        match self.deny.first_match(proposed) {
            Some(pattern) => Err(format!("REJECTED: Dangerous pattern detected: `{pattern}`")),
            None => Ok(()),
        }
    }

    fn check_syntax(&self, filename: &str, proposed: &str) -> std::result::Result<(), String> {
        check_syntax(filename, proposed).map_err(|e| format!("REJECTED: Syntax error at {e}"))
    }

    fn staging_dir(&self, filename: &str) -> PathBuf {
        let relative = Path::new(filename);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return self.source_root.clone();
        }
        self.source_root
            .join(relative)
            .parent()
            .filter(|dir| dir.is_dir())
            .map_or_else(|| self.source_root.clone(), Path::to_path_buf)
    }

    fn check_compile(&self, filename: &str, proposed: &str) -> std::result::Result<(), String> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("ts");

        // The scratch copy sits next to the target so relative imports and the
        // project's compiler settings resolve as they would for the real file.
        let staging_dir = self.staging_dir(filename);
        let mut scratch = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .suffix(&format!(".{ext}"))
            .tempfile_in(&staging_dir)
            .map_err(|e| {
                format!(
                    "REJECTED: Could not stage proposal in {}: {e}",
                    staging_dir.display()
                )
            })?;
        scratch
            .write_all(proposed.as_bytes())
            .and_then(|()| scratch.flush())
            .map_err(|e| format!("REJECTED: Could not stage proposal: {e}"))?;

        debug!(file = filename, scratch = %scratch.path().display(), "Staged proposal for compile check");

        match self.compiler.check(&self.project_root, scratch.path()) {
            CompileOutcome::Passed => Ok(()),
            CompileOutcome::Unavailable(message) => {
                warn!(file = filename, %message, "Compile gate skipped");
                Ok(())
            }
            CompileOutcome::Failed(output) => {
                Err(format!("REJECTED: Compile check failed:\n{output}"))
            }
        }
    }
}

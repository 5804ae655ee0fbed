use super::backup::BackupGuard;
use super::error::{ApplyError, ApplyOutcome};
use super::locks::LockRegistry;
use super::session::{ReplicationSession, RewriteProposal, SessionPhase};
use crate::client::ProposalClient;
use crate::config::Config;
use crate::error::{GateError, Result};
use crate::reporter::{Reporter, TextReporter};
use crate::rules::RuleEngine;
use crate::scanner::{Dialect, SourceScanner};
use crate::validator::{
    CommandCompiler, CompileCheck, CompileOutcome, RewriteValidator, Verdict, check_syntax,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, error, info, warn};

/// Drives scan, analysis, optional remote proposing and guarded apply for
/// one project.
///
/// Safe to share across threads: applies to the same file are serialized,
/// applies to different files run concurrently.
pub struct ReplicationEngine {
    project_root: PathBuf,
    source_root: PathBuf,
    config: Config,
    rules: RuleEngine,
    validator: RewriteValidator,
    verifier: Arc<dyn CompileCheck>,
    apply_locks: LockRegistry,
    request_locks: LockRegistry,
}

impl ReplicationEngine {
    pub fn new(project_root: impl Into<PathBuf>, mut config: Config) -> Result<Self> {
        let project_root = project_root.into();
        if let Some(path) = config.custom_rules.take() {
            config.custom_rules = Some(project_root.join(path));
        }
        let source_root = project_root.join(&config.scan.source_dir);
        let rules = RuleEngine::from_config(&config)?;
        let validator = RewriteValidator::new(project_root.clone(), &config)?;
        let verifier =
            CommandCompiler::from_argv(&config.apply.verify_command, config.apply.verify_timeout());

        Ok(Self {
            project_root,
            source_root,
            config,
            rules,
            validator,
            verifier: Arc::new(verifier),
            apply_locks: LockRegistry::default(),
            request_locks: LockRegistry::default(),
        })
    }

    /// Replace the compile checker used by the validator's compile gate.
    pub fn with_compile_check(mut self, check: impl CompileCheck + 'static) -> Self {
        self.validator = self.validator.with_compiler(check);
        self
    }

    /// Replace the checker used to verify a written compiled-static file.
    pub fn with_verifier(mut self, check: impl CompileCheck + 'static) -> Self {
        self.verifier = Arc::new(check);
        self
    }

    pub fn with_rules(mut self, rules: RuleEngine) -> Self {
        self.rules = rules;
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn scanner(&self) -> Result<SourceScanner> {
        SourceScanner::new(&self.source_root, &self.config.scan)
    }

    /// Absolute path of a target given relative to the source root.
    pub fn resolve_target(&self, target_file: &str) -> PathBuf {
        self.source_root.join(target_file)
    }

    /// Request lock for a target, keyed on its canonical path so spellings
    /// of the same file share one lock.
    pub(crate) fn request_lock(&self, target: &Path) -> Arc<Mutex<()>> {
        let key = fs::canonicalize(target).unwrap_or_else(|_| target.to_path_buf());
        self.request_locks.lock_for(&key)
    }

    /// Scan and analyze the source tree into a fresh session.
    ///
    /// One proposal per finding. The proposal service is not contacted.
    pub fn run_analysis_session(&self, objective: &str) -> Result<ReplicationSession> {
        let mut session = ReplicationSession::new(objective);
        info!(session = %session.session_id, objective, "Replication session started");

        session.transition(SessionPhase::Scanning);
        let scanner = self.scanner()?;
        session.modules = scanner.scan().collect();

        session.transition(SessionPhase::Analyzing);
        let findings = self.rules.analyze_all(&session.modules);
        session.proposals = findings.iter().map(RewriteProposal::from_finding).collect();

        session.transition(SessionPhase::Reporting);
        info!(
            session = %session.session_id,
            files = session.files_scanned(),
            proposals = session.proposals.len(),
            "Analysis complete"
        );
        Ok(session)
    }

    /// Run the safety gates for `proposed` against the current content of
    /// `target_file`.
    pub fn validate_rewrite(&self, target_file: &str, proposed: &str) -> Result<Verdict> {
        let path = self.resolve_target(target_file);
        let original = fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GateError::FileNotFound(path.display().to_string())
            } else {
                GateError::ReadError {
                    path: path.display().to_string(),
                    source: e,
                }
            }
        })?;
        Ok(self.validator.validate(target_file, &original, proposed))
    }

    /// Write `new_content` over the proposal's target with backup, verify
    /// and rollback.
    ///
    /// On return the target holds either `new_content` with the proposal
    /// accepted, or its exact previous bytes with the proposal untouched.
    pub fn apply_proposal(
        &self,
        proposal: &mut RewriteProposal,
        new_content: &str,
    ) -> std::result::Result<ApplyOutcome, ApplyError> {
        let target = self.checked_target(&proposal.target_file)?;

        let lock = self.apply_locks.lock_for(&target);
        let _held = lock.lock().unwrap_or_else(PoisonError::into_inner);
        debug!(file = %proposal.target_file, "Apply staged");

        let mut backup = BackupGuard::create(&target, &self.config.apply.backup_suffix)?;
        debug!(file = %proposal.target_file, backup = %backup.path().display(), "Apply backed up");

        if let Err(e) = fs::write(&target, new_content) {
            return revert(&mut backup, &proposal.target_file, format!("write failed: {e}"));
        }
        debug!(file = %proposal.target_file, bytes = new_content.len(), "Apply written");

        match self.verify(&target, &proposal.target_file, new_content) {
            Ok(()) => {
                backup.commit();
                proposal.accepted = true;
                info!(file = %proposal.target_file, "Apply committed");
                Ok(ApplyOutcome::Committed)
            }
            Err(reason) => revert(&mut backup, &proposal.target_file, reason),
        }
    }

    /// Apply the proposal at `index` and record the result in the session.
    pub fn apply_in_session(
        &self,
        session: &mut ReplicationSession,
        index: usize,
        new_content: &str,
    ) -> bool {
        let Some(proposal) = session.proposals.get_mut(index) else {
            session.errors.push(format!("no proposal at index {index}"));
            return false;
        };
        let target_file = proposal.target_file.clone();

        match self.apply_proposal(proposal, new_content) {
            Ok(ApplyOutcome::Committed) => {
                session.applied.push(target_file);
                true
            }
            Ok(ApplyOutcome::Reverted { reason }) => {
                session
                    .errors
                    .push(format!("{target_file}: reverted: {reason}"));
                false
            }
            Err(e) => {
                session.errors.push(format!("{target_file}: {e}"));
                false
            }
        }
    }

    /// Ask the proposal service for a rewrite of the proposal's current
    /// file content. Requests for the same file are serialized.
    pub fn request_rewrite(
        &self,
        client: &ProposalClient,
        proposal: &RewriteProposal,
        provider: Option<&str>,
    ) -> Option<String> {
        let target = self.resolve_target(&proposal.target_file);
        let lock = self.request_lock(&target);
        let _held = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let content = match fs::read_to_string(&target) {
            Ok(content) => content,
            Err(e) => {
                error!(file = %proposal.target_file, error = %e, "Could not read rewrite target");
                return None;
            }
        };
        let provider = provider.unwrap_or(&self.config.proposal.default_provider);

        client.propose_rewrite(
            &proposal.target_file,
            &content,
            &proposal.issue_description,
            provider,
        )
    }

    /// Request, validate and apply a rewrite for the proposal at `index`,
    /// recording every failure in the session.
    pub fn rewrite_and_apply(
        &self,
        client: &ProposalClient,
        session: &mut ReplicationSession,
        index: usize,
        provider: Option<&str>,
    ) -> bool {
        let Some(proposal) = session.proposals.get(index).cloned() else {
            session.errors.push(format!("no proposal at index {index}"));
            return false;
        };
        if session.phase != SessionPhase::Proposing {
            session.transition(SessionPhase::Proposing);
        }

        let Some(proposed) = self.request_rewrite(client, &proposal, provider) else {
            session
                .errors
                .push(format!("{}: no rewrite proposed", proposal.target_file));
            return false;
        };

        let verdict = match self.validate_rewrite(&proposal.target_file, &proposed) {
            Ok(verdict) => verdict,
            Err(e) => {
                session.errors.push(format!("{}: {e}", proposal.target_file));
                return false;
            }
        };
        if !verdict.accepted {
            session
                .errors
                .push(format!("{}: {}", proposal.target_file, verdict.summary()));
            return false;
        }

        self.apply_in_session(session, index, &proposed)
    }

    pub fn get_session_report(&self, session: &ReplicationSession) -> String {
        TextReporter::new().report(session)
    }

    fn checked_target(&self, target_file: &str) -> std::result::Result<PathBuf, ApplyError> {
        let target = self.resolve_target(target_file);
        if !target.is_file() {
            return Err(ApplyError::TargetMissing(target));
        }
        let canonical = fs::canonicalize(&target).map_err(|_| ApplyError::TargetMissing(target.clone()))?;
        let root = fs::canonicalize(&self.source_root).unwrap_or_else(|_| self.source_root.clone());
        if !canonical.starts_with(&root) {
            return Err(ApplyError::OutsideRoot(canonical));
        }
        Ok(canonical)
    }

    fn verify(&self, target: &Path, target_file: &str, expected: &str) -> std::result::Result<(), String> {
        let written = fs::read(target).map_err(|e| format!("read-back failed: {e}"))?;
        if written != expected.as_bytes() {
            return Err("read-back content differs from the written content".to_string());
        }

        match self.config.scan.dialect_for(target_file) {
            Some(Dialect::DynamicScripting) => {
                check_syntax(target_file, expected).map_err(|e| format!("syntax error at {e}"))
            }
            Some(Dialect::CompiledStatic) => match self.verifier.check(&self.project_root, target) {
                CompileOutcome::Passed => Ok(()),
                CompileOutcome::Unavailable(message) => {
                    warn!(file = target_file, %message, "Post-write compile check skipped");
                    Ok(())
                }
                CompileOutcome::Failed(output) => Err(format!("compile check failed:\n{output}")),
            },
            None => Ok(()),
        }
    }
}

fn revert(
    backup: &mut BackupGuard,
    target_file: &str,
    reason: String,
) -> std::result::Result<ApplyOutcome, ApplyError> {
    backup.restore()?;
    warn!(file = target_file, reason = reason.lines().next().unwrap_or_default(), "Apply reverted");
    Ok(ApplyOutcome::Reverted { reason })
}

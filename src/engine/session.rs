use crate::rules::{Finding, Priority};
use crate::scanner::SourceModule;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

/// Provider recorded on proposals produced by the rule engine.
pub const STATIC_PROVIDER: &str = "StaticAnalyzer";
/// Confidence assigned to rule-engine proposals.
pub const STATIC_CONFIDENCE: f64 = 0.95;

const SESSION_ID_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Created,
    Scanning,
    Analyzing,
    Proposing,
    Reporting,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionPhase::Created => "created",
            SessionPhase::Scanning => "scanning",
            SessionPhase::Analyzing => "analyzing",
            SessionPhase::Proposing => "proposing",
            SessionPhase::Reporting => "reporting",
        };
        f.write_str(name)
    }
}

/// A recommendation to replace one file's content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RewriteProposal {
    /// Path relative to the source root.
    pub target_file: String,
    pub issue_description: String,
    pub proposed_change: String,
    pub priority: Priority,
    pub provider: String,
    pub confidence: f64,
    pub accepted: bool,
}

impl RewriteProposal {
    pub fn from_finding(finding: &Finding) -> Self {
        Self {
            target_file: finding.file.clone(),
            issue_description: format!(
                "[Static][{}] {} ({} occurrences)",
                finding.rule_id, finding.description, finding.match_count
            ),
            proposed_change: format!(
                "Refactor {} violations in {}",
                finding.rule_id, finding.file
            ),
            priority: finding.priority,
            provider: STATIC_PROVIDER.to_string(),
            confidence: STATIC_CONFIDENCE,
            accepted: false,
        }
    }

    /// Proposal for a caller-supplied issue, e.g. from the command line.
    pub fn manual(target_file: &str, issue: &str, provider: &str) -> Self {
        Self {
            target_file: target_file.to_string(),
            issue_description: issue.to_string(),
            proposed_change: format!("Rewrite {target_file}"),
            priority: Priority::Medium,
            provider: provider.to_string(),
            confidence: 0.0,
            accepted: false,
        }
    }
}

/// Everything one run produced. Owned by the caller; nothing is persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ReplicationSession {
    pub session_id: String,
    pub objective: String,
    /// RFC 3339, UTC.
    pub started_at: String,
    pub phase: SessionPhase,
    #[serde(skip)]
    pub modules: Vec<SourceModule>,
    pub proposals: Vec<RewriteProposal>,
    /// Target files whose rewrite was committed, in order.
    pub applied: Vec<String>,
    pub errors: Vec<String>,
}

impl ReplicationSession {
    pub fn new(objective: impl Into<String>) -> Self {
        let mut session_id = Uuid::new_v4().simple().to_string();
        session_id.truncate(SESSION_ID_LEN);

        Self {
            session_id,
            objective: objective.into(),
            started_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            phase: SessionPhase::Created,
            modules: Vec::new(),
            proposals: Vec::new(),
            applied: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn files_scanned(&self) -> usize {
        self.modules.len()
    }

    pub(crate) fn transition(&mut self, next: SessionPhase) {
        info!(session = %self.session_id, from = %self.phase, to = %next, "Session phase");
        self.phase = next;
    }

    /// Proposals of one priority, in session order.
    pub fn proposals_with(&self, priority: Priority) -> impl Iterator<Item = &RewriteProposal> {
        self.proposals.iter().filter(move |p| p.priority == priority)
    }
}

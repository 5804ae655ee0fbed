use crate::engine::{ReplicationSession, RewriteProposal};
use crate::reporter::Reporter;
use crate::rules::Priority;
use serde::Serialize;

pub struct JsonReporter;

impl JsonReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct SessionView<'a> {
    session_id: &'a str,
    objective: &'a str,
    started_at: &'a str,
    files_scanned: usize,
    proposals: Vec<ProposalView<'a>>,
    applied: &'a [String],
    errors: &'a [String],
}

#[derive(Serialize)]
struct ProposalView<'a> {
    target_file: &'a str,
    issue: &'a str,
    priority: Priority,
    provider: &'a str,
    confidence: f64,
    accepted: bool,
}

impl<'a> From<&'a RewriteProposal> for ProposalView<'a> {
    fn from(p: &'a RewriteProposal) -> Self {
        Self {
            target_file: &p.target_file,
            issue: &p.issue_description,
            priority: p.priority,
            provider: &p.provider,
            confidence: p.confidence,
            accepted: p.accepted,
        }
    }
}

impl Reporter for JsonReporter {
    fn report(&self, session: &ReplicationSession) -> String {
        let view = SessionView {
            session_id: &session.session_id,
            objective: &session.objective,
            started_at: &session.started_at,
            files_scanned: session.files_scanned(),
            proposals: session.proposals.iter().map(ProposalView::from).collect(),
            applied: &session.applied,
            errors: &session.errors,
        };
        serde_json::to_string_pretty(&view)
            .unwrap_or_else(|e| format!(r#"{{"error": "Failed to serialize session: {}"}}"#, e))
    }
}

use crate::engine::ReplicationSession;
use crate::reporter::Reporter;
use crate::rules::Priority;
use colored::Colorize;

/// Human-readable session report, proposals grouped by priority.
pub struct TextReporter {
    color: bool,
}

impl TextReporter {
    pub fn new() -> Self {
        Self { color: false }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    fn priority_header(&self, priority: Priority, count: usize) -> String {
        let label = format!("[{priority}]");
        let label = if self.color {
            match priority {
                Priority::Critical => label.red().bold().to_string(),
                Priority::High => label.yellow().bold().to_string(),
                Priority::Medium => label.cyan().to_string(),
                Priority::Low => label.white().to_string(),
            }
        } else {
            label
        };
        format!("{label} ({count} issues)")
    }
}

impl Default for TextReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for TextReporter {
    fn report(&self, session: &ReplicationSession) -> String {
        let mut lines = vec![
            format!("=== Replication Session [{}] ===", session.session_id),
            format!("Objective: {}", session.objective),
            format!("Files Scanned: {}", session.files_scanned()),
            format!("Proposals Generated: {}", session.proposals.len()),
            String::new(),
            "── Proposals by Priority ──".to_string(),
        ];

        for priority in Priority::DESCENDING {
            let group: Vec<_> = session.proposals_with(priority).collect();
            if group.is_empty() {
                continue;
            }
            lines.push(String::new());
            lines.push(self.priority_header(priority, group.len()));
            for proposal in group {
                let applied = if proposal.accepted { " [applied]" } else { "" };
                lines.push(format!(
                    "  • {}: {}{}",
                    proposal.target_file, proposal.issue_description, applied
                ));
            }
        }

        if !session.applied.is_empty() {
            lines.push(String::new());
            lines.push("── Applied ──".to_string());
            lines.extend(session.applied.iter().map(|f| format!("  • {f}")));
        }

        if !session.errors.is_empty() {
            lines.push(String::new());
            lines.push("── Errors ──".to_string());
            lines.extend(session.errors.iter().map(|e| format!("  • {e}")));
        }

        lines.join("\n")
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct RewriteRequest<'a> {
    pub filename: &'a str,
    pub content: &'a str,
    pub issue: &'a str,
    pub provider: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RewriteResponse {
    #[serde(default)]
    pub proposed_content: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnalyzeRequest<'a> {
    pub filename: &'a str,
    pub content: &'a str,
    pub mode: &'static str,
}

/// Remote quality audit of one module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// 0 to 10. Required in responses.
    pub score: f64,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl QualityReport {
    pub const MAX_SCORE: f64 = 10.0;

    /// Whether the score lies in `0..=10`. NaN is out of range.
    pub fn has_valid_score(&self) -> bool {
        (0.0..=Self::MAX_SCORE).contains(&self.score)
    }

    /// Zero score carrying the failure text as its only issue.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            score: 0.0,
            issues: vec![reason.into()],
            suggestions: Vec::new(),
        }
    }
}

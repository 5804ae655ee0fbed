//! Blocking client for the remote rewrite/analysis service.
//!
//! Every failure degrades to an absent result and an `error!` log; nothing
//! here returns an error to the caller once the client is built.

mod error;
mod types;

pub use error::TransportError;
pub use types::QualityReport;

use crate::config::ProposalConfig;
use crate::error::{GateError, Result};
use reqwest::blocking::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error};
use types::{AnalyzeRequest, RewriteRequest, RewriteResponse};

const MAX_ERROR_BODY: usize = 200;

pub struct ProposalClient {
    http: Client,
    base_url: String,
    rewrite_timeout: Duration,
    analyze_timeout: Duration,
}

impl ProposalClient {
    pub fn new(config: &ProposalConfig) -> Result<Self> {
        let http = Client::builder()
            .build()
            .map_err(|e| GateError::HttpClient(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.server_url.trim_end_matches('/').to_string(),
            rewrite_timeout: Duration::from_secs(config.rewrite_timeout_secs),
            analyze_timeout: Duration::from_secs(config.analyze_timeout_secs),
        })
    }

    pub fn with_timeouts(mut self, rewrite: Duration, analyze: Duration) -> Self {
        self.rewrite_timeout = rewrite;
        self.analyze_timeout = analyze;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ask `provider` for a rewrite of `content`. `None` on any failure or
    /// when the service has no proposal.
    pub fn propose_rewrite(
        &self,
        filename: &str,
        content: &str,
        issue: &str,
        provider: &str,
    ) -> Option<String> {
        let request = RewriteRequest {
            filename,
            content,
            issue,
            provider,
        };

        match self.post::<_, RewriteResponse>("/api/rewrite", &request, self.rewrite_timeout) {
            Ok(response) => {
                debug!(
                    file = filename,
                    provider,
                    has_proposal = response.proposed_content.is_some(),
                    "Rewrite response received"
                );
                response.proposed_content
            }
            Err(e) => {
                error!(file = filename, provider, error = %e, "Rewrite request failed");
                None
            }
        }
    }

    /// Remote quality audit. Failures fold into a zero score whose only
    /// issue is the failure text.
    pub fn analyze_module_quality(&self, filename: &str, content: &str) -> QualityReport {
        let request = AnalyzeRequest {
            filename,
            content,
            mode: "quality_audit",
        };

        let result = self
            .post::<_, QualityReport>("/api/analyze", &request, self.analyze_timeout)
            .and_then(|report| {
                if report.has_valid_score() {
                    Ok(report)
                } else {
                    Err(TransportError::Decode(format!(
                        "quality score {} outside 0..={}",
                        report.score,
                        QualityReport::MAX_SCORE
                    )))
                }
            });

        match result {
            Ok(report) => report,
            Err(e) => {
                error!(file = filename, error = %e, "Quality audit failed");
                QualityReport::failed(e.to_string())
            }
        }
    }

    fn post<Req, Resp>(
        &self,
        path: &str,
        body: &Req,
        timeout: Duration,
    ) -> std::result::Result<Resp, TransportError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.post(&url).timeout(timeout).json(body).send()?;

        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                message: text.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        serde_json::from_str(&text).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

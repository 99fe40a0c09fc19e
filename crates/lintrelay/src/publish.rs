//! Check-run publishing.
//!
//! The publisher is a trait so the orchestration can be exercised with
//! an in-memory fake; the real implementation talks to the GitHub
//! check-runs API over blocking HTTP.

use chrono::Utc;
use serde_json::json;
use tracing::{debug, warn};

use lintrelay_core::CheckRunUpdate;
use lintrelay_types::Conclusion;

const ACCEPT_CHECKS_PREVIEW: &str = "application/vnd.github.antiope-preview+json";
const USER_AGENT: &str = concat!("lintrelay/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("check-run request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("check-run API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("check-run API response malformed: {0}")]
    MalformedResponse(String),
}

/// Identifier of a created check run.
pub type CheckRunId = u64;

/// Delivery target for check-run payloads.
///
/// Contract: `create` once, then any number of `update` calls, then
/// exactly one `conclude` carrying the final verdict.
pub trait CheckRunPublisher {
    fn create(&self) -> Result<CheckRunId, PublishError>;
    fn update(&self, id: CheckRunId, update: &CheckRunUpdate) -> Result<(), PublishError>;
    fn conclude(&self, id: CheckRunId, conclusion: Conclusion) -> Result<(), PublishError>;
}

/// GitHub check-runs API client.
pub struct GithubChecks {
    client: reqwest::blocking::Client,
    token: String,
    owner: String,
    repo: String,
    check_name: String,
    head_sha: String,
}

impl GithubChecks {
    pub fn new(
        token: String,
        owner: String,
        repo: String,
        check_name: String,
        head_sha: String,
    ) -> Result<Self, PublishError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            token,
            owner,
            repo,
            check_name,
            head_sha,
        })
    }

    fn runs_url(&self) -> String {
        format!(
            "https://api.github.com/repos/{}/{}/check-runs",
            self.owner, self.repo
        )
    }

    fn send(
        &self,
        request: reqwest::blocking::RequestBuilder,
        body: serde_json::Value,
    ) -> Result<reqwest::blocking::Response, PublishError> {
        let response = request
            .header(reqwest::header::ACCEPT, ACCEPT_CHECKS_PREVIEW)
            .bearer_auth(&self.token)
            .json(&body)
            .send()?;

        let status = response.status();
        if status.as_u16() >= 300 {
            let body = response.text().unwrap_or_default();
            warn!("check-run API rejected request: {status}");
            return Err(PublishError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

impl CheckRunPublisher for GithubChecks {
    fn create(&self) -> Result<CheckRunId, PublishError> {
        debug!("creating check run '{}'", self.check_name);
        let body = json!({
            "name": self.check_name,
            "head_sha": self.head_sha,
            "status": "in_progress",
            "started_at": Utc::now().to_rfc3339(),
        });

        let response = self.send(self.client.post(self.runs_url()), body)?;
        let data: serde_json::Value = response.json()?;
        data.get("id")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| PublishError::MalformedResponse("missing check run id".to_string()))
    }

    fn update(&self, id: CheckRunId, update: &CheckRunUpdate) -> Result<(), PublishError> {
        debug!(
            "publishing {} annotation(s) to check run {id}",
            update.output.annotations.len()
        );
        let body = json!({
            "name": self.check_name,
            "head_sha": self.head_sha,
            "output": update.output,
        });

        let url = format!("{}/{id}", self.runs_url());
        self.send(self.client.patch(url), body)?;
        Ok(())
    }

    fn conclude(&self, id: CheckRunId, conclusion: Conclusion) -> Result<(), PublishError> {
        debug!("concluding check run {id} as {}", conclusion.as_str());
        let body = json!({
            "name": self.check_name,
            "head_sha": self.head_sha,
            "status": "completed",
            "completed_at": Utc::now().to_rfc3339(),
            "conclusion": conclusion.as_str(),
        });

        let url = format!("{}/{id}", self.runs_url());
        self.send(self.client.patch(url), body)?;
        Ok(())
    }
}

//! HTTP client for the policy analysis backend's upload/ask endpoints.

use std::time::Duration;

use poliscope_core::{decode_decision, PolicyDecision};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Budget for the upload round trip.
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);
/// Budget for a question-answer round trip.
const ASK_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport failures, rendered verbatim to the user.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Rejected locally, before any network call.
    #[error("Please select a PDF file")]
    NotPdf,
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// HTTP client for the backend's upload-policy/ask/health endpoints.
pub struct PolicyClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct AskRequest<'a> {
    question: &'a str,
}

#[derive(Deserialize)]
struct UploadResponse {
    #[serde(default)]
    message: String,
}

/// Connectivity probe result.
#[derive(Deserialize, Debug)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
}

impl PolicyClient {
    /// Create a new client for the given backend base URL.
    ///
    /// `base_url` should be like `http://localhost:8888` (no trailing slash).
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Upload a policy document for analysis.
    ///
    /// Only PDF files are accepted; anything else is rejected here and
    /// never reaches the network. Returns the backend's confirmation
    /// message.
    pub async fn upload_policy(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ClientError> {
        if !is_pdf(file_name) {
            return Err(ClientError::NotPdf);
        }

        let url = format!("{}/upload-policy", self.base_url);
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")?;
        let form = reqwest::multipart::Form::new().part("file", part);

        info!(url = %url, file = %file_name, "uploading policy");
        let resp = self
            .client
            .post(&url)
            .multipart(form)
            .timeout(UPLOAD_TIMEOUT)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let result: UploadResponse = resp.json().await?;
        info!("policy upload accepted");
        Ok(result.message)
    }

    /// Submit a question and decode the backend's decision envelope.
    ///
    /// Transport and status failures surface as errors; whatever JSON
    /// comes back decodes to a [`PolicyDecision`] without further failure
    /// modes.
    pub async fn ask(&self, question: &str) -> Result<PolicyDecision, ClientError> {
        let url = format!("{}/ask", self.base_url);

        info!(url = %url, "submitting question");
        let resp = self
            .client
            .post(&url)
            .json(&AskRequest { question })
            .timeout(ASK_TIMEOUT)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await?;
        let raw: serde_json::Value = serde_json::from_str(&body)?;
        let decision = decode_decision(&raw);
        info!(verdict = decision.summary.verdict.as_str(), "decision received");
        Ok(decision)
    }

    /// Probe backend connectivity.
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp.json().await?)
    }
}

/// The client-side gate: only `.pdf` selections go to the network.
fn is_pdf(file_name: &str) -> bool {
    file_name.to_ascii_lowercase().ends_with(".pdf")
}

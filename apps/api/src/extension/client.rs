//! Client for the extension endpoints, driven by an explicit configuration
//! value rather than anything read from ambient storage.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::extraction::ExtractedJob;
use crate::normalize::ExtensionPayload;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Please fill in all fields")]
    MissingConfig,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx answer; `message` is the server's `error` field when present.
    #[error("{message}")]
    Api { status: u16, message: String },
}

/// Where to send clipped jobs and as whom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionConfig {
    pub api_endpoint: String,
    pub auth_token: String,
}

impl ExtensionConfig {
    /// Trims both values and drops one trailing `/` from the endpoint.
    /// Both are required.
    pub fn new(api_endpoint: &str, auth_token: &str) -> Result<Self, ClientError> {
        let api_endpoint = api_endpoint.trim();
        let api_endpoint = api_endpoint.strip_suffix('/').unwrap_or(api_endpoint);
        let auth_token = auth_token.trim();
        if api_endpoint.is_empty() || auth_token.is_empty() {
            return Err(ClientError::MissingConfig);
        }
        Ok(Self {
            api_endpoint: api_endpoint.to_string(),
            auth_token: auth_token.to_string(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_endpoint)
    }
}

#[derive(Debug, Deserialize)]
pub struct SaveResult {
    pub success: bool,
    pub data: Value,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ConnectionInfo {
    pub email: Option<String>,
    pub user_id: Uuid,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl From<ExtractedJob> for ExtensionPayload {
    fn from(job: ExtractedJob) -> Self {
        let keep = |s: String| (!s.is_empty()).then_some(s);
        ExtensionPayload {
            company: keep(job.company),
            position: keep(job.position),
            job_url: keep(job.job_url),
            location: keep(job.location),
            salary: keep(job.salary),
            notes: keep(job.notes),
            source_url: keep(job.source_url),
            extracted_at: keep(job.extracted_at),
        }
    }
}

pub struct ExtensionClient {
    client: Client,
    config: ExtensionConfig,
}

impl ExtensionClient {
    pub fn new(config: ExtensionConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            config,
        }
    }

    pub async fn save_job(&self, payload: &ExtensionPayload) -> Result<SaveResult, ClientError> {
        let url = self.config.url("/api/applications/from-extension");
        debug!("POST {url}");
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.auth_token)
            .json(payload)
            .send()
            .await?;

        let response = check(response, "Failed to save application").await?;
        Ok(response.json().await?)
    }

    pub async fn test_connection(&self) -> Result<ConnectionInfo, ClientError> {
        let response = self
            .client
            .get(self.config.url("/api/test-connection"))
            .bearer_auth(&self.config.auth_token)
            .send()
            .await?;

        let response = check(response, "Connection failed. Please check your credentials.").await?;
        Ok(response.json().await?)
    }
}

async fn check(response: reqwest::Response, fallback: &str) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error)
        .unwrap_or_else(|| fallback.to_string());
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

impl ClientError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Api { status, .. } if *status == StatusCode::UNAUTHORIZED.as_u16())
    }
}

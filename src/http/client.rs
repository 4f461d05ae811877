//! Dynatrace log ingest client
//!
//! Sends one JSON array of records per request and classifies the reply:
//! - 204 means every record was accepted
//! - other 2xx replies carry `{"success": {"code", "message"}}`
//! - anything else becomes [`Error::HttpStatus`]

use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Path of the log ingest endpoint
pub const INGEST_PATH: &str = "/api/v2/logs/ingest";

/// Message recorded for a 204 reply, which has no body of its own
pub const NO_CONTENT_MESSAGE: &str = "Successfully uploaded all data.";

/// Outcome of an accepted ingest request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestResponse {
    /// HTTP status of the reply
    pub status: u16,
    /// Code reported by the API
    pub code: u16,
    /// Message reported by the API
    pub message: String,
}

/// Status object inside an ingest reply body
#[derive(Debug, Clone, Deserialize)]
struct ReplyStatus {
    code: u16,
    message: String,
}

/// Ingest reply body
#[derive(Debug, Clone, Deserialize)]
struct ReplyBody {
    #[serde(default)]
    success: Option<ReplyStatus>,
    #[serde(default)]
    error: Option<ReplyStatus>,
}

/// Anything that accepts a serialized batch of log records
#[async_trait]
pub trait LogIngest: Send + Sync {
    /// Send one JSON payload
    async fn ingest(&self, payload: String) -> Result<IngestResponse>;

    /// Where payloads are sent, for logging
    fn endpoint(&self) -> &str;
}

/// Configuration for the ingest client
#[derive(Clone)]
pub struct IngestClientConfig {
    /// Full ingest URL
    pub endpoint: Url,
    /// API token with the `logs.ingest` scope
    pub api_token: String,
    /// Request timeout; `None` keeps the HTTP client default
    pub timeout: Option<Duration>,
    /// User agent string
    pub user_agent: String,
}

impl IngestClientConfig {
    /// Config for a Dynatrace SaaS environment (`https://{id}.live.dynatrace.com`)
    pub fn for_environment(environment_id: &str, api_token: impl Into<String>) -> Result<Self> {
        if environment_id.is_empty() {
            return Err(Error::missing_field("environment_id"));
        }
        let endpoint = Url::parse(&format!(
            "https://{environment_id}.live.dynatrace.com{INGEST_PATH}"
        ))?;
        Ok(Self::with_endpoint(endpoint, api_token))
    }

    /// Config for an explicit ingest URL
    pub fn with_endpoint(endpoint: Url, api_token: impl Into<String>) -> Self {
        Self {
            endpoint,
            api_token: api_token.into(),
            timeout: None,
            user_agent: format!("sheet-ingest/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Value of the `Authorization` header
    pub fn authorization(&self) -> String {
        format!("Api-Token {}", self.api_token)
    }
}

impl std::fmt::Debug for IngestClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestClientConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_token", &"***")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// HTTP client for the log ingest API
pub struct IngestClient {
    client: Client,
    config: IngestClientConfig,
}

impl IngestClient {
    /// Create a client from configuration
    pub fn with_config(config: IngestClientConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    /// Client configuration
    pub fn config(&self) -> &IngestClientConfig {
        &self.config
    }

    /// POST one payload and classify the reply
    pub async fn post(&self, payload: String) -> Result<IngestResponse> {
        let response = self
            .client
            .post(self.config.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json; charset=utf-8")
            .header(AUTHORIZATION, self.config.authorization())
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        debug!("Ingest response: {}", status.as_u16());

        if status == StatusCode::NO_CONTENT {
            return Ok(IngestResponse {
                status: status.as_u16(),
                code: status.as_u16(),
                message: NO_CONTENT_MESSAGE.to_string(),
            });
        }

        let body = response.text().await?;

        if status.is_success() {
            let reply: ReplyBody = serde_json::from_str(&body)
                .map_err(|e| Error::decode(format!("Invalid ingest reply: {e}")))?;
            let success = reply
                .success
                .ok_or_else(|| Error::decode("Ingest reply has no 'success' object"))?;
            return Ok(IngestResponse {
                status: status.as_u16(),
                code: success.code,
                message: success.message,
            });
        }

        Err(Error::http_status(status.as_u16(), failure_message(status, &body)))
    }
}

#[async_trait]
impl LogIngest for IngestClient {
    async fn ingest(&self, payload: String) -> Result<IngestResponse> {
        self.post(payload).await
    }

    fn endpoint(&self) -> &str {
        self.config.endpoint.as_str()
    }
}

impl std::fmt::Debug for IngestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Best description of a rejected request: the API's error message, the
/// raw body, or the status reason when the body is empty
fn failure_message(status: StatusCode, body: &str) -> String {
    if let Ok(ReplyBody {
        error: Some(error), ..
    }) = serde_json::from_str::<ReplyBody>(body)
    {
        return error.message;
    }

    let body = body.trim();
    if body.is_empty() {
        status.canonical_reason().unwrap_or("Unknown status").to_string()
    } else {
        body.to_string()
    }
}

//! Upstream recruitment backend: the source of raw candidate records.
//!
//! The backend owns persistence; this service only reads candidates and
//! reconciles their scores. All upstream calls go through `CandidateSource`
//! so handlers can be tested against an in-memory list.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::Candidate;

const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read access to candidate records.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    async fn candidates(&self) -> Result<Vec<Candidate>, BackendError>;

    /// Looks up one candidate. The backend only exposes the listing, so the
    /// default scans it.
    async fn candidate(&self, id: i64) -> Result<Option<Candidate>, BackendError> {
        Ok(self.candidates().await?.into_iter().find(|c| c.id == id))
    }
}

#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl BackendClient {
    pub fn new(base_url: String, token: Option<String>) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    /// GETs `path` and returns the JSON body, or `None` on 404.
    /// Retries on 429 and 5xx with exponential backoff (1s, 2s).
    async fn get_json(&self, path: &str) -> Result<Option<Value>, BackendError> {
        let url = format!("{}{}", self.base_url, path);
        let mut last_error: Option<BackendError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Backend call to {} failed (attempt {}), retrying after {}ms",
                    path,
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.authorized(self.client.get(&url)).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(BackendError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Backend returned {}: {}", status, body);
                last_error = Some(BackendError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if status == StatusCode::NOT_FOUND {
                return Ok(None);
            }

            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(BackendError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let body = response.text().await?;
            debug!("Backend GET {} succeeded ({} bytes)", path, body.len());
            return Ok(Some(serde_json::from_str(&body)?));
        }

        Err(last_error.unwrap_or(BackendError::Api {
            status: StatusCode::SERVICE_UNAVAILABLE.as_u16(),
            message: format!("no response after {MAX_RETRIES} attempts"),
        }))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl CandidateSource for BackendClient {
    async fn candidates(&self) -> Result<Vec<Candidate>, BackendError> {
        let body = self.get_json("/candidates").await?.unwrap_or(Value::Null);
        Ok(parse_candidate_listing(body))
    }
}

/// Accepts a bare array or `{"data": [...]}`. Records that do not look like a
/// candidate are skipped.
pub fn parse_candidate_listing(body: Value) -> Vec<Candidate> {
    match unwrap_data(body) {
        Value::Array(items) => items.into_iter().filter_map(parse_candidate_record).collect(),
        other => {
            warn!("Unexpected candidate listing shape: {}", kind_of(&other));
            Vec::new()
        }
    }
}

fn parse_candidate_record(record: Value) -> Option<Candidate> {
    match serde_json::from_value::<Candidate>(record) {
        Ok(candidate) => Some(candidate),
        Err(e) => {
            warn!("Skipping malformed candidate record: {}", e);
            None
        }
    }
}

fn unwrap_data(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Fixed candidate list, used by router and handler tests.
#[cfg(test)]
pub struct InMemoryCandidates(pub Vec<Candidate>);

#[cfg(test)]
#[async_trait]
impl CandidateSource for InMemoryCandidates {
    async fn candidates(&self) -> Result<Vec<Candidate>, BackendError> {
        Ok(self.0.clone())
    }
}

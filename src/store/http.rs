// src/store/http.rs

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use super::RecordSource;
use crate::error::FetchError;
use crate::record::{Record, RecordSet};

/// `{ "records": [...] }`; any other top-level fields are ignored.
#[derive(Debug, Deserialize)]
struct Payload {
    #[serde(default)]
    records: Option<Vec<Record>>,
}

/// Upper bound on a single retry delay.
pub const MAX_BACKOFF_MS: u64 = 30_000;

/// Delay before retry number `attempt` (1-based): doubles each time, capped.
fn backoff_delay(initial_ms: u64, attempt: u32) -> u64 {
    let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
    initial_ms.saturating_mul(factor).min(MAX_BACKOFF_MS)
}

/// Fetches the record set with one GET against a fixed endpoint.
#[derive(Debug, Clone)]
pub struct HttpRecordSource {
    client: Client,
    endpoint: Url,
    /// Endpoint without its query string, so the API key stays out of logs.
    label: String,
    max_retries: u32,
    initial_backoff_ms: u64,
}

impl HttpRecordSource {
    pub fn new(client: Client, endpoint: Url) -> Self {
        let mut bare = endpoint.clone();
        bare.set_query(None);
        Self {
            client,
            endpoint,
            label: bare.to_string(),
            max_retries: 0,
            initial_backoff_ms: 500,
        }
    }

    pub fn with_retries(mut self, max_retries: u32, initial_backoff_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.initial_backoff_ms = initial_backoff_ms;
        self
    }

    /// A client whose requests give up after `timeout`.
    pub fn client_with_timeout(timeout: Duration) -> reqwest::Result<Client> {
        Client::builder().timeout(timeout).build()
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn get_text_core(&self) -> Result<String, FetchError> {
        let url = self.label.as_str();
        debug!("Fetching records from {}", url);
        let resp = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|e| request_error(url, e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        resp.text().await.map_err(|e| request_error(url, e))
    }

    async fn get_text_with_retry(&self) -> Result<String, FetchError> {
        let mut attempts = 0;
        loop {
            match self.get_text_core().await {
                Ok(t) => return Ok(t),
                Err(e) if e.is_retryable() && attempts < self.max_retries => {
                    attempts += 1;
                    let backoff = backoff_delay(self.initial_backoff_ms, attempts);
                    warn!(url = %self.label, attempt = attempts, delay_ms = backoff, error = %e, "Retrying");
                    sleep(Duration::from_millis(backoff)).await;
                }
                Err(e) => {
                    if self.max_retries > 0 {
                        error!(url = %self.label, error = %e, "Exhausted retries");
                    }
                    return Err(e);
                }
            }
        }
    }
}

fn request_error(url: &str, source: reqwest::Error) -> FetchError {
    if source.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Request {
            url: url.to_string(),
            source,
        }
    }
}

/// Parse a response body into a record set. A missing or null `records`
/// field is an empty set; a body that is not a JSON object is an error.
pub fn parse_records(body: &str) -> Result<RecordSet, FetchError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    if !value.is_object() {
        return Err(FetchError::Shape("top-level value is not an object".into()));
    }
    let payload: Payload = serde_json::from_value(value)
        .map_err(|e| FetchError::Shape(format!("records: {}", e)))?;
    Ok(RecordSet::new(payload.records.unwrap_or_default()))
}

impl RecordSource for HttpRecordSource {
    #[instrument(level = "info", skip(self), fields(url = %self.label))]
    async fn fetch_all(&self) -> Result<RecordSet, FetchError> {
        let body = self.get_text_with_retry().await?;
        let set = parse_records(&body)?;
        info!(count = set.len(), "fetched records");
        Ok(set)
    }
}

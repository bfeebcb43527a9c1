// # REST Record Client
//
// Pushes record upserts to the dynupdate record API.
//
// ## Behavior
//
// - One `POST {url}/api/v1/records` per call, bearer-authenticated
// - 10 second request timeout
// - HTTP 200 and 201 are success; every other status is a rejection
// - Transport failures (DNS, refused, timeout) are reported, never raised
// - No retries here: the watcher retries on its next poll
//
// ## Security
//
// - The bearer token never appears in logs or in `Debug` output
//
// ## API Reference
//
// ```http
// POST /api/v1/records
// Authorization: Bearer <token>
// Content-Type: application/json
//
// {"name": "myhost.example.org.", "type": "AAAA", "ttl": 300, "value": "2001:db8::1"}
// ```

use async_trait::async_trait;
use dynupdate_core::config::RECORDS_PATH;
use dynupdate_core::traits::{RecordClient, RecordUpdate, UpdateOutcome};
use dynupdate_core::{Error, Result, WatchConfig};
use std::time::Duration;

/// Default HTTP timeout for API requests (10 seconds)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the record API
///
/// # Security
///
/// The Debug implementation does NOT expose the bearer token.
pub struct HttpRecordClient {
    /// Full URL of the records collection
    endpoint: String,

    /// Bearer token
    /// ⚠️ NEVER log this value
    token: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    timeout: Duration,
}

// Custom Debug implementation that hides the token
impl std::fmt::Debug for HttpRecordClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRecordClient")
            .field("endpoint", &self.endpoint)
            .field("token", &"<REDACTED>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HttpRecordClient {
    /// Create a client for the API at `api_url` with the default timeout
    ///
    /// A trailing `/` on `api_url` is ignored. Fails if the token is empty
    /// or the HTTP client cannot be built.
    pub fn new(api_url: &str, token: impl Into<String>) -> Result<Self> {
        Self::with_timeout(api_url, token, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create a client with an explicit request timeout
    pub fn with_timeout(
        api_url: &str,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(Error::config("API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: format!("{}{}", api_url.trim_end_matches('/'), RECORDS_PATH),
            token,
            client,
            timeout,
        })
    }

    /// Create a client from the API URL and token in `config`
    pub fn from_config(config: &WatchConfig) -> Result<Self> {
        Self::new(&config.api_url, config.token.clone())
    }

    /// URL the upserts are posted to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn describe_transport_error(&self, err: &reqwest::Error) -> String {
        if err.is_timeout() {
            format!("timed out after {:?}", self.timeout)
        } else if err.is_connect() {
            format!("connect error: {}", err)
        } else {
            err.to_string()
        }
    }
}

#[async_trait]
impl RecordClient for HttpRecordClient {
    async fn upsert(&self, update: &RecordUpdate) -> UpdateOutcome {
        let body = match update.to_json() {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("Failed to encode record update: {}", e);
                return UpdateOutcome::Unreachable {
                    reason: format!("request not sent: {}", e),
                };
            }
        };

        tracing::debug!(
            "POST {} name={} type={} ttl={} value={}",
            self.endpoint,
            update.name,
            update.record_type,
            update.ttl,
            update.value
        );

        let response = match self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let reason = self.describe_transport_error(&e);
                tracing::error!("API connection failed: {}", reason);
                return UpdateOutcome::Unreachable { reason };
            }
        };

        let status = response.status().as_u16();
        match status {
            200 | 201 => {
                tracing::info!(
                    "Updated {} {} -> {} (HTTP {})",
                    update.name,
                    update.record_type,
                    update.value,
                    status
                );
                UpdateOutcome::Applied { status }
            }
            _ => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unable to read error response".to_string());
                tracing::error!("API returned HTTP {}: {}", status, body);
                UpdateOutcome::Rejected { status, body }
            }
        }
    }

    fn client_name(&self) -> &'static str {
        "rest"
    }
}

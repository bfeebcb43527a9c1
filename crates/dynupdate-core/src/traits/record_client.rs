// # Record Client Trait
//
// Defines the interface for pushing a DNS record upsert to the remote API.
//
// ## Implementations
//
// - REST (`POST /api/v1/records`): `dynupdate-client` crate
//
// ## Wire Format
//
// ```http
// POST /api/v1/records
// Authorization: Bearer <token>
// Content-Type: application/json
//
// {"name": "myhost.example.org.", "type": "A", "ttl": 300, "value": "192.0.2.5"}
// ```

use crate::config::RecordType;
use async_trait::async_trait;
use serde::Serialize;

/// One upsert attempt: the record tuple sent to the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordUpdate {
    /// Fully-qualified record name
    pub name: String,
    /// A or AAAA
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Record TTL in seconds
    pub ttl: u32,
    /// Address to publish
    pub value: String,
}

impl RecordUpdate {
    pub fn new(
        name: impl Into<String>,
        record_type: RecordType,
        ttl: u32,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            record_type,
            ttl,
            value: value.into(),
        }
    }

    /// Serialize to the JSON request body
    pub fn to_json(&self) -> Result<Vec<u8>, crate::Error> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Outcome of one upsert attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The API accepted the record (HTTP 200 or 201)
    Applied {
        /// HTTP status code
        status: u16,
    },
    /// The API answered with any other status
    Rejected {
        /// HTTP status code
        status: u16,
        /// Response body, for diagnostics
        body: String,
    },
    /// No HTTP response at all (DNS failure, refused, timeout)
    Unreachable {
        /// Connection-level reason
        reason: String,
    },
}

impl UpdateOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    /// Diagnostic detail suitable for a log line
    pub fn detail(&self) -> String {
        match self {
            Self::Applied { status } => format!("HTTP {}", status),
            Self::Rejected { status, body } => format!("HTTP {}: {}", status, body),
            Self::Unreachable { reason } => format!("connection failed: {}", reason),
        }
    }
}

/// Trait for record client implementations
///
/// # Contract
///
/// - Exactly one request per call; never retries (the next poll retries)
/// - Never fails by panic or error: every transport and protocol problem is
///   folded into [`UpdateOutcome`] and logged by the implementation
/// - Bounded: implementations must enforce a request timeout
/// - Never logs the bearer token
#[async_trait]
pub trait RecordClient: Send + Sync {
    /// Upsert one record
    async fn upsert(&self, update: &RecordUpdate) -> UpdateOutcome;

    /// Client name (for logging/debugging)
    fn client_name(&self) -> &'static str;
}

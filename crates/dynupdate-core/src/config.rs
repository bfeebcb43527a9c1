//! Configuration types for the interface watcher
//!
//! A [`WatchConfig`] is produced once at startup, validated, and then handed
//! to the [`Watcher`](crate::Watcher) by value. An invalid configuration never
//! reaches the loop.

use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Default base URL of the record API
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Path of the record upsert endpoint, relative to the API base URL
pub const RECORDS_PATH: &str = "/api/v1/records";

/// Environment variable consulted for the bearer token when no flag is given
pub const TOKEN_ENV_VAR: &str = "DYNUPDATE_TOKEN";

/// Smallest TTL the record API accepts
pub const MIN_TTL: u32 = 60;

/// Largest TTL the record API accepts
pub const MAX_TTL: u32 = 86_400;

/// Default record TTL in seconds
pub const DEFAULT_TTL: u32 = 300;

/// Default poll interval in seconds
pub const DEFAULT_INTERVAL_SECS: u64 = 30;

/// Default upper bound for a single external command, in seconds
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 10;

/// Address family to watch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressFamily {
    /// IPv4 (A record)
    #[default]
    V4,
    /// IPv6 (AAAA record)
    V6,
}

impl AddressFamily {
    /// Map the `--ipv6` style boolean onto a family
    pub fn from_ipv6_flag(want_ipv6: bool) -> Self {
        if want_ipv6 { Self::V6 } else { Self::V4 }
    }

    pub fn is_ipv6(self) -> bool {
        self == Self::V6
    }

    /// DNS record type carrying addresses of this family
    pub fn record_type(self) -> RecordType {
        match self {
            Self::V4 => RecordType::A,
            Self::V6 => RecordType::Aaaa,
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V4 => f.write_str("IPv4"),
            Self::V6 => f.write_str("IPv6"),
        }
    }
}

/// DNS record type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecordType {
    /// A record (IPv4)
    #[serde(rename = "A")]
    A,
    /// AAAA record (IPv6)
    #[serde(rename = "AAAA")]
    Aaaa,
}

impl RecordType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main watcher configuration
///
/// # Security
///
/// The token is skipped on serialization and redacted from `Debug`.
#[derive(Clone, Serialize)]
pub struct WatchConfig {
    /// Interface to watch (e.g. "eth0", "utun7") or the literal "tailscale"
    pub interface: String,

    /// Fully-qualified record name, with trailing dot
    pub record_name: String,

    /// Base URL of the record API
    pub api_url: String,

    /// Bearer token for the record API
    /// ⚠️ NEVER log this value
    #[serde(skip_serializing)]
    pub token: String,

    /// Seconds between polls
    pub interval_secs: u64,

    /// TTL advertised for the record
    pub ttl: u32,

    /// Which address family to watch
    pub family: AddressFamily,

    /// Debug-level logging
    pub verbose: bool,

    /// Upper bound for a single external command
    pub command_timeout_secs: u64,
}

// Custom Debug implementation that hides the token
impl fmt::Debug for WatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchConfig")
            .field("interface", &self.interface)
            .field("record_name", &self.record_name)
            .field("api_url", &self.api_url)
            .field("token", &"<REDACTED>")
            .field("interval_secs", &self.interval_secs)
            .field("ttl", &self.ttl)
            .field("family", &self.family)
            .field("verbose", &self.verbose)
            .field("command_timeout_secs", &self.command_timeout_secs)
            .finish()
    }
}

impl WatchConfig {
    /// Create a configuration with defaults for everything optional
    pub fn new(
        interface: impl Into<String>,
        record_name: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            interface: interface.into(),
            record_name: record_name.into(),
            api_url: DEFAULT_API_URL.to_string(),
            token: token.into(),
            interval_secs: DEFAULT_INTERVAL_SECS,
            ttl: DEFAULT_TTL,
            family: AddressFamily::default(),
            verbose: false,
            command_timeout_secs: DEFAULT_COMMAND_TIMEOUT_SECS,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_interval_secs(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs;
        self
    }

    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_family(mut self, family: AddressFamily) -> Self {
        self.family = family;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_command_timeout_secs(mut self, secs: u64) -> Self {
        self.command_timeout_secs = secs;
        self
    }

    /// Validate the configuration
    ///
    /// Checks, in order: interface, record name, API URL, token, interval,
    /// TTL and command timeout. The first violation is returned.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.interface.trim().is_empty() {
            return Err(crate::Error::config("Interface cannot be empty"));
        }

        if self.record_name.is_empty() {
            return Err(crate::Error::config("Record name cannot be empty"));
        }
        if !self.record_name.ends_with('.') {
            return Err(crate::Error::config(format!(
                "Record name must end with a trailing dot: {}",
                self.record_name
            )));
        }

        if self.api_url.is_empty() {
            return Err(crate::Error::config("API URL cannot be empty"));
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(crate::Error::config(format!(
                "API URL must use HTTP or HTTPS scheme. Got: {}",
                self.api_url
            )));
        }

        if self.token.is_empty() {
            return Err(crate::Error::config(format!(
                "Token is required (pass --token or set {})",
                TOKEN_ENV_VAR
            )));
        }

        if self.interval_secs < 1 {
            return Err(crate::Error::config(format!(
                "Interval must be a positive integer: {}",
                self.interval_secs
            )));
        }

        if !(MIN_TTL..=MAX_TTL).contains(&self.ttl) {
            return Err(crate::Error::config(format!(
                "TTL must be between {} and {}: {}",
                MIN_TTL, MAX_TTL, self.ttl
            )));
        }

        if self.command_timeout_secs < 1 {
            return Err(crate::Error::config(format!(
                "Command timeout must be a positive integer: {}",
                self.command_timeout_secs
            )));
        }

        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    pub fn record_type(&self) -> RecordType {
        self.family.record_type()
    }

    /// Full URL of the upsert endpoint; a trailing `/` on the base is dropped
    pub fn records_endpoint(&self) -> String {
        format!("{}{}", self.api_url.trim_end_matches('/'), RECORDS_PATH)
    }
}

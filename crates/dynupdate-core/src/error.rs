//! Error types for the interface watcher
//!
//! The variants follow the failure taxonomy of the poll loop: environment
//! problems, transient resolution problems, remote update problems and
//! configuration problems. Malformed addresses are not errors; the loop
//! reports them as [`WatchEvent::AddressRejected`](crate::WatchEvent).

use thiserror::Error;

/// Result type alias for watcher operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the interface watcher
#[derive(Error, Debug)]
pub enum Error {
    /// The host lacks a tool the resolver needs (no `ip`, no `ifconfig`, no `tailscale`)
    #[error("Environment error: {0}")]
    Environment(String),

    /// An external command ran but failed (non-zero exit, timeout)
    #[error("Command `{command}` failed: {reason}")]
    CommandFailed {
        /// The command line that was run
        command: String,
        /// Exit status, stderr or timeout description
        reason: String,
    },

    /// The command succeeded but reported no address of the wanted family
    #[error("No address found: {0}")]
    NoAddress(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client errors (from the record API)
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an environment error
    pub fn environment(msg: impl Into<String>) -> Self {
        Self::Environment(msg.into())
    }

    /// Create a command failure error
    pub fn command_failed(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CommandFailed {
            command: command.into(),
            reason: reason.into(),
        }
    }

    /// Create a "no address" error
    pub fn no_address(msg: impl Into<String>) -> Self {
        Self::NoAddress(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Whether the error stems from the host environment rather than a
    /// transient condition. Environment errors are logged at ERROR.
    pub fn is_environment(&self) -> bool {
        matches!(self, Self::Environment(_))
    }
}

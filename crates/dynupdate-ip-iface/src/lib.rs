// # Interface Address Resolver
//
// Reports the current address of a network interface by running the host's
// own tools and parsing their output.
//
// ## Strategies
//
// - `tailscale` (the literal interface name): `tailscale ip -4|-6`
// - `ip` when installed: `ip -4|-6 addr show dev IF`, link-local skipped
// - `ifconfig` otherwise: `ifconfig IF`, `fe80` skipped, zone suffix removed
//
// The probe runs on every poll, so installing a missing tool takes effect
// without a restart.

pub mod exec;
pub mod parse;
pub mod strategy;

pub use strategy::{Strategy, TAILSCALE_INTERFACE};

use async_trait::async_trait;
use dynupdate_core::config::DEFAULT_COMMAND_TIMEOUT_SECS;
use dynupdate_core::traits::AddressSource;
use dynupdate_core::{AddressFamily, Error, Result, WatchConfig};
use std::ffi::OsString;
use std::time::Duration;
use tracing::debug;

/// Address source backed by the host's interface tools
#[derive(Debug, Clone)]
pub struct InterfaceAddressSource {
    interface: String,
    family: AddressFamily,
    command_timeout: Duration,
    /// PATH override; `None` uses the process PATH
    search_path: Option<OsString>,
}

impl InterfaceAddressSource {
    pub fn new(interface: impl Into<String>, family: AddressFamily) -> Self {
        Self {
            interface: interface.into(),
            family,
            command_timeout: Duration::from_secs(DEFAULT_COMMAND_TIMEOUT_SECS),
            search_path: None,
        }
    }

    /// Build a source for the interface and family named in `config`
    pub fn from_config(config: &WatchConfig) -> Self {
        Self::new(config.interface.clone(), config.family)
            .with_command_timeout(config.command_timeout())
    }

    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Look up programs in `path` instead of the process PATH
    pub fn with_search_path(mut self, path: impl Into<OsString>) -> Self {
        self.search_path = Some(path.into());
        self
    }

    /// Run the capability probe for this source's interface
    pub fn strategy(&self) -> Result<Strategy> {
        Strategy::select(&self.interface, |program| {
            strategy::find_program(program, self.search_path.as_ref()).is_some()
        })
    }
}

#[async_trait]
impl AddressSource for InterfaceAddressSource {
    async fn current(&self) -> Result<String> {
        let strategy = self.strategy()?;
        let program = strategy::find_program(strategy.program(), self.search_path.as_ref())
            .ok_or_else(|| {
                Error::environment(format!("'{}' not found in PATH", strategy.program()))
            })?;
        let program = program.to_string_lossy();
        let args = strategy.args(&self.interface, self.family);

        debug!(
            "Querying {} address of {} via {}",
            self.family, self.interface, strategy
        );
        let stdout = exec::exec_stdout(&program, &args, self.command_timeout).await?;

        strategy.parse(&stdout, self.family).ok_or_else(|| {
            Error::no_address(format!(
                "{} reported no {} address for {}",
                strategy, self.family, self.interface
            ))
        })
    }

    fn family(&self) -> AddressFamily {
        self.family
    }

    fn describe(&self) -> String {
        match self.strategy() {
            Ok(strategy) => strategy.to_string(),
            Err(_) => "no resolver available".to_string(),
        }
    }
}

/// Resolve the current `family` address of `interface` once
///
/// Uses the process PATH and the default command timeout.
pub async fn resolve(interface: &str, family: AddressFamily) -> Result<String> {
    InterfaceAddressSource::new(interface, family).current().await
}

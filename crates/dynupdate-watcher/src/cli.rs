//! Command-line surface

use clap::Parser;
use dynupdate_core::config::{
    DEFAULT_API_URL, DEFAULT_COMMAND_TIMEOUT_SECS, DEFAULT_INTERVAL_SECS, DEFAULT_TTL,
    TOKEN_ENV_VAR,
};
use dynupdate_core::{AddressFamily, Error, WatchConfig};

const EXAMPLES: &str = "\
Examples:
  # Watch eth0, update A record
  dynupdate-watcher -i eth0 -n myhost.example.org. -t secret

  # Tailscale IP via the tailscale CLI
  dynupdate-watcher -i tailscale -n myhost.ts.example.org. -t secret

  # Tailscale interface directly (Linux)
  dynupdate-watcher -i tailscale0 -n myhost.ts.example.org. -t secret

  # IPv6 on a macOS utun interface
  dynupdate-watcher -i utun7 -n myhost.ts.example.org. -t secret --ipv6

  # Token from the environment
  DYNUPDATE_TOKEN=secret dynupdate-watcher -i tailscale0 -n myhost.ts.example.org.";

/// Watch a network interface and keep a DNS record pointed at its address
#[derive(Parser, Debug)]
#[command(name = "dynupdate-watcher", version, after_help = EXAMPLES)]
pub struct Cli {
    /// Interface to watch (e.g. eth0, utun7) or "tailscale" for the tailscale CLI
    #[arg(short = 'i', long)]
    pub interface: String,

    /// DNS record name, fully qualified with trailing dot
    #[arg(short = 'n', long)]
    pub name: String,

    /// Record API base URL
    #[arg(short = 'u', long, default_value = DEFAULT_API_URL)]
    pub url: String,

    /// Bearer token (falls back to $DYNUPDATE_TOKEN)
    #[arg(short = 't', long)]
    pub token: Option<String>,

    /// Poll interval in seconds
    #[arg(short = 'I', long, default_value_t = DEFAULT_INTERVAL_SECS, value_name = "SECS")]
    pub interval: u64,

    /// Record TTL in seconds (60-86400)
    #[arg(short = 'T', long, default_value_t = DEFAULT_TTL, value_name = "SECS")]
    pub ttl: u32,

    /// Watch the IPv6 address and update an AAAA record
    #[arg(long)]
    pub ipv6: bool,

    /// Debug logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Upper bound for one interface query command
    #[arg(long, default_value_t = DEFAULT_COMMAND_TIMEOUT_SECS, value_name = "SECS")]
    pub command_timeout: u64,
}

impl Cli {
    /// Turn parsed flags into a validated configuration
    ///
    /// `env_token` is the value of the token environment variable, used only
    /// when `--token` is absent. Empty values count as absent.
    pub fn into_config(self, env_token: Option<String>) -> Result<WatchConfig, Error> {
        let token = self
            .token
            .filter(|t| !t.is_empty())
            .or_else(|| env_token.filter(|t| !t.is_empty()))
            .ok_or_else(|| {
                Error::config(format!("--token or ${} is required", TOKEN_ENV_VAR))
            })?;

        let config = WatchConfig::new(self.interface, self.name, token)
            .with_api_url(self.url)
            .with_interval_secs(self.interval)
            .with_ttl(self.ttl)
            .with_family(AddressFamily::from_ipv6_flag(self.ipv6))
            .with_verbose(self.verbose)
            .with_command_timeout_secs(self.command_timeout);

        config.validate()?;
        Ok(config)
    }
}

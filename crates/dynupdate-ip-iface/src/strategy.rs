//! Resolution strategies and the capability probe that picks one

use dynupdate_core::{AddressFamily, Error, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::parse;

/// Interface name that selects the tailscale CLI instead of an OS query
pub const TAILSCALE_INTERFACE: &str = "tailscale";

/// How the address of an interface is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// `tailscale ip -4|-6`
    Tailscale,
    /// `ip -4|-6 addr show dev IF` (preferred OS query)
    IpRoute2,
    /// `ifconfig IF` (fallback OS query)
    Ifconfig,
}

impl Strategy {
    /// Pick the strategy for `interface`, given which programs are available
    ///
    /// Fails with an environment error when no usable program exists.
    pub fn select(interface: &str, available: impl Fn(&str) -> bool) -> Result<Self> {
        if interface == TAILSCALE_INTERFACE {
            return if available(Self::Tailscale.program()) {
                Ok(Self::Tailscale)
            } else {
                Err(Error::environment("'tailscale' CLI not found in PATH"))
            };
        }

        [Self::IpRoute2, Self::Ifconfig]
            .into_iter()
            .find(|s| available(s.program()))
            .ok_or_else(|| Error::environment("Neither 'ip' nor 'ifconfig' found in PATH"))
    }

    /// Program this strategy runs
    pub fn program(self) -> &'static str {
        match self {
            Self::Tailscale => "tailscale",
            Self::IpRoute2 => "ip",
            Self::Ifconfig => "ifconfig",
        }
    }

    /// Arguments for querying `interface` for `family`
    pub fn args(self, interface: &str, family: AddressFamily) -> Vec<&str> {
        let flag = match family {
            AddressFamily::V4 => "-4",
            AddressFamily::V6 => "-6",
        };
        match self {
            Self::Tailscale => vec!["ip", flag],
            Self::IpRoute2 => vec![flag, "addr", "show", "dev", interface],
            // ifconfig has no family flag; the parser filters
            Self::Ifconfig => vec![interface],
        }
    }

    /// Extract the address from this strategy's command output
    pub fn parse(self, output: &str, family: AddressFamily) -> Option<String> {
        match self {
            Self::Tailscale => parse::parse_tailscale(output),
            Self::IpRoute2 => parse::parse_iproute2(output, family),
            Self::Ifconfig => parse::parse_ifconfig(output, family),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Tailscale => "tailscale",
            Self::IpRoute2 => "iproute2",
            Self::Ifconfig => "ifconfig",
        };
        f.write_str(name)
    }
}

/// Locate `program` in the directories of `search_path` (a PATH-style list)
///
/// Only runnable files count, so a non-executable `ip` does not hide a
/// working `ifconfig`.
pub fn find_program(program: &str, search_path: Option<&OsString>) -> Option<PathBuf> {
    let search_path = search_path.cloned().or_else(|| std::env::var_os("PATH"))?;
    std::env::split_paths(&search_path)
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

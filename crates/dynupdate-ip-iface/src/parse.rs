//! Parsers for address-reporting command output
//!
//! Pure functions over captured stdout so they can be tested without the
//! commands installed.

use dynupdate_core::AddressFamily;
use once_cell::sync::Lazy;
use regex::Regex;

static INET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"inet\s+([0-9.]+)").expect("Invalid regex pattern"));

static INET6_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"inet6\s+([0-9a-f:]+)").expect("Invalid regex pattern"));

/// Extract the first address from `ip -4|-6 addr show dev IF` output
///
/// IPv6 lines tagged `scope link` are skipped.
pub fn parse_iproute2(output: &str, family: AddressFamily) -> Option<String> {
    let pattern = match family {
        AddressFamily::V4 => &*INET_RE,
        AddressFamily::V6 => &*INET6_RE,
    };

    output
        .lines()
        .filter(|line| !(family.is_ipv6() && line.contains("scope link")))
        .find_map(|line| pattern.captures(line).map(|caps| caps[1].to_string()))
}

/// Extract the first address from `ifconfig IF` output
///
/// ifconfig prints both families. IPv6 addresses starting with `fe80` are
/// skipped and any `%zone` suffix is removed.
pub fn parse_ifconfig(output: &str, family: AddressFamily) -> Option<String> {
    let keyword = match family {
        AddressFamily::V4 => "inet",
        AddressFamily::V6 => "inet6",
    };

    for line in output.lines() {
        let mut tokens = line.split_whitespace();
        if !tokens.any(|t| t == keyword) {
            continue;
        }
        let Some(addr) = tokens.next() else {
            continue;
        };

        if family.is_ipv6() {
            if addr.to_ascii_lowercase().starts_with("fe80") {
                continue;
            }
            let addr = addr.split('%').next().unwrap_or(addr);
            return Some(addr.to_string());
        }
        return Some(addr.to_string());
    }
    None
}

/// Extract the address from `tailscale ip -4|-6` output (first line)
pub fn parse_tailscale(output: &str) -> Option<String> {
    output
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
}

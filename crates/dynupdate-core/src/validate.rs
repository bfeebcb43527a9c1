//! Address validation
//!
//! Confirms that a candidate string reported by the host is a syntactically
//! valid address of the requested family. Pure, no I/O.

use crate::config::AddressFamily;
use std::net::IpAddr;

/// Check that `candidate` parses as an IP address of `family`
pub fn is_valid(candidate: &str, family: AddressFamily) -> bool {
    match candidate.parse::<IpAddr>() {
        Ok(IpAddr::V4(_)) => family == AddressFamily::V4,
        Ok(IpAddr::V6(_)) => family == AddressFamily::V6,
        Err(_) => false,
    }
}

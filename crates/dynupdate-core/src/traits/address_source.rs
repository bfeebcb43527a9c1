// # Address Source Trait
//
// Defines the interface for reading the address currently bound to a
// network interface.
//
// ## Implementations
//
// - Interface commands (`ip`, `ifconfig`, `tailscale`): `dynupdate-ip-iface` crate
//
// ## Usage
//
// ```rust,ignore
// use dynupdate_core::AddressSource;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* AddressSource implementation */;
//
//     match source.current().await {
//         Ok(addr) => println!("{} has {}", source.describe(), addr),
//         Err(e) => eprintln!("no address: {}", e),
//     }
//
//     Ok(())
// }
// ```

use crate::config::AddressFamily;
use async_trait::async_trait;

/// Trait for address source implementations
///
/// An address source is asked once per poll for the address of a single
/// interface and a single family. It is an **observer**: it never decides
/// whether DNS should change.
///
/// # Error Contract
///
/// `Err` is the "absent" outcome. Its variant tells the loop how loud to be:
/// - [`Error::Environment`](crate::Error::Environment): a required tool is missing
///   (logged at ERROR)
/// - anything else: a transient condition such as a failed command, empty
///   output or missing interface (logged at WARN)
///
/// A returned `Ok` value is the raw string the host reported. It is NOT yet
/// validated; the loop runs it through [`is_valid`](crate::validate::is_valid)
/// before it can reach DNS.
///
/// # Forbidden
/// - ❌ Panicking on unexpected command output
/// - ❌ Retrying internally (the next poll is the retry)
/// - ❌ Caching results between polls
#[async_trait]
pub trait AddressSource: Send + Sync {
    /// Get the current address of the watched interface
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The address as reported by the host
    /// - `Err(Error)`: No address could be determined this time
    async fn current(&self) -> Result<String, crate::Error>;

    /// The address family this source reports
    fn family(&self) -> AddressFamily;

    /// Human-readable description for logs (e.g. "iproute2")
    fn describe(&self) -> String;
}

// # dynupdate-core
//
// Core library for the dynupdate interface watcher.
//
// ## Architecture Overview
//
// This library provides the core functionality for keeping one DNS record in
// sync with the address bound to one network interface:
// - **AddressSource**: Trait for reading the current address of an interface
// - **RecordClient**: Trait for pushing a record upsert to the remote API
// - **Watcher**: Fixed-interval poll loop that owns the last accepted value
// - **WatchConfig**: Validated, immutable invocation parameters
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Resolution and HTTP live in their own crates
// 2. **Sequential**: One poll, one optional upsert, one sleep; never overlapping
// 3. **Self-Healing**: Every per-iteration failure degrades to "log and continue"
// 4. **Library-First**: The loop is usable (and testable) without the binary

pub mod config;
pub mod error;
pub mod traits;
pub mod validate;
pub mod watcher;

// Re-export core types for convenience
pub use config::{AddressFamily, RecordType, WatchConfig};
pub use error::{Error, Result};
pub use traits::{AddressSource, RecordClient, RecordUpdate, UpdateOutcome};
pub use watcher::{WatchEvent, Watcher};

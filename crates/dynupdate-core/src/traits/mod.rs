//! Core traits for the interface watcher
//!
//! This module defines the abstract interfaces the poll loop drives.
//!
//! - [`AddressSource`]: Read the current address bound to an interface
//! - [`RecordClient`]: Push a record upsert to the remote API

pub mod address_source;
pub mod record_client;

pub use address_source::AddressSource;
pub use record_client::{RecordClient, RecordUpdate, UpdateOutcome};

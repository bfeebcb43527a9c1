//! Interface watch loop
//!
//! The Watcher is responsible for:
//! - Polling the AddressSource on a fixed interval
//! - Validating what the host reports
//! - Pushing an upsert via RecordClient when the address changed
//! - Remembering the last value the API confirmed
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────┐
//! │ AddressSource │─── raw address ───┐
//! └───────────────┘                   │
//!                                     ▼
//!                             ┌──────────────┐
//!                             │   Watcher    │ last_accepted
//!                             └──────────────┘
//!                                     │
//!               ┌─────────────────────┼─────────────────────┐
//!               │                     │                     │
//!               ▼                     ▼                     ▼
//!       ┌──────────────┐     ┌──────────────┐      ┌──────────────┐
//!       │  is_valid    │     │ RecordClient │      │    Events    │
//!       │  (check)     │     │  (upsert)    │      │   (notify)   │
//!       └──────────────┘     └──────────────┘      └──────────────┘
//! ```
//!
//! ## Poll Flow
//!
//! 1. Ask the source for the current address
//! 2. Absent → warn, keep state
//! 3. Wrong family or malformed → warn, keep state
//! 4. Different from `last_accepted` → upsert; on success remember it
//! 5. Same as `last_accepted` → nothing
//! 6. Sleep for the interval (interruptible), repeat

use crate::config::{AddressFamily, RecordType, WatchConfig};
use crate::error::{Error, Result};
use crate::traits::{AddressSource, RecordClient, RecordUpdate};
use crate::validate::is_valid;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Capacity of the event channel handed out by [`Watcher::new`]
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Events emitted by the Watcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// Loop started
    Started {
        interface: String,
        record_name: String,
        record_type: RecordType,
    },

    /// The source could not produce an address this poll
    AddressMissing {
        reason: String,
        environment: bool,
    },

    /// The source produced something that is not an address of the family
    AddressRejected {
        value: String,
    },

    /// Address equals the last accepted value
    Unchanged {
        value: String,
    },

    /// Upsert confirmed by the API
    UpdateSucceeded {
        /// Empty when no value was ever accepted
        previous: String,
        current: String,
    },

    /// Upsert attempted and failed; state kept
    UpdateFailed {
        value: String,
        detail: String,
    },

    /// Loop stopped
    Stopped {
        reason: String,
    },
}

/// Fixed-interval watch loop
///
/// Owns the only mutable state of the agent, the last value the API
/// confirmed. Nothing else reads or writes it.
///
/// ## Lifecycle
///
/// 1. Create with [`Watcher::new()`]
/// 2. Start with [`Watcher::run()`]
/// 3. Loop runs until the cancellation token fires
///
/// ## Threading
///
/// Everything runs sequentially on the caller's task. Resolution, validation
/// and upsert never overlap, within one poll or across polls.
pub struct Watcher {
    /// Address source for the watched interface
    source: Box<dyn AddressSource>,

    /// Client for the record API
    client: Box<dyn RecordClient>,

    interface: String,
    record_name: String,
    record_type: RecordType,
    family: AddressFamily,
    ttl: u32,
    interval: Duration,
    api_url: String,

    /// Last value confirmed by the API; empty means never set
    last_accepted: String,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<WatchEvent>,
}

impl Watcher {
    /// Create a new watcher
    ///
    /// # Parameters
    ///
    /// - `source`: Address source for the configured interface
    /// - `client`: Record API client
    /// - `config`: Watch configuration
    ///
    /// # Returns
    ///
    /// A tuple of (watcher, event_receiver) where event_receiver yields watch events
    pub fn new(
        source: Box<dyn AddressSource>,
        client: Box<dyn RecordClient>,
        config: &WatchConfig,
    ) -> Result<(Self, mpsc::Receiver<WatchEvent>)> {
        config.validate()?;

        if source.family() != config.family {
            return Err(Error::config(format!(
                "Address source reports {} but {} is configured",
                source.family(),
                config.family
            )));
        }

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let watcher = Self {
            source,
            client,
            interface: config.interface.clone(),
            record_name: config.record_name.clone(),
            record_type: config.record_type(),
            family: config.family,
            ttl: config.ttl,
            interval: config.interval(),
            api_url: config.api_url.clone(),
            last_accepted: String::new(),
            event_tx: tx,
        };

        Ok((watcher, rx))
    }

    /// Last value confirmed by the API (empty before the first success)
    pub fn last_accepted(&self) -> &str {
        &self.last_accepted
    }

    /// Run the loop until `shutdown` is cancelled
    ///
    /// The token is checked before every poll and raced against both the
    /// in-flight poll and the sleep, so shutdown does not wait for the
    /// interval to elapse.
    pub async fn run(&mut self, shutdown: CancellationToken) {
        info!(
            "Watching interface={} ({}) record={} type={} interval={}s",
            self.interface,
            self.source.describe(),
            self.record_name,
            self.record_type,
            self.interval.as_secs()
        );
        info!("API={} ttl={}s", self.api_url, self.ttl);

        self.emit_event(WatchEvent::Started {
            interface: self.interface.clone(),
            record_name: self.record_name.clone(),
            record_type: self.record_type,
        });

        while !shutdown.is_cancelled() {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = self.poll_once() => {}
            }

            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        info!("Shutting down");
        self.emit_event(WatchEvent::Stopped {
            reason: "Shutdown signal".to_string(),
        });
    }

    /// Run a single poll: resolve, validate, compare, maybe upsert
    ///
    /// Never fails; every problem is logged and reported as an event.
    pub async fn poll_once(&mut self) -> WatchEvent {
        let event = match self.source.current().await {
            Err(e) => {
                if e.is_environment() {
                    error!("Cannot resolve {} address on {}: {}", self.family, self.interface, e);
                } else {
                    warn!(
                        "No {} address found on {}: {}",
                        self.record_type, self.interface, e
                    );
                }
                WatchEvent::AddressMissing {
                    reason: e.to_string(),
                    environment: e.is_environment(),
                }
            }
            Ok(candidate) if !is_valid(&candidate, self.family) => {
                warn!("Invalid IP detected on {}: {:?}", self.interface, candidate);
                WatchEvent::AddressRejected { value: candidate }
            }
            Ok(candidate) if candidate == self.last_accepted => {
                debug!("No change: {}", candidate);
                WatchEvent::Unchanged { value: candidate }
            }
            Ok(candidate) => self.push_update(candidate).await,
        };

        self.emit_event(event.clone());
        event
    }

    /// Upsert `current`; remember it only if the API confirmed
    async fn push_update(&mut self, current: String) -> WatchEvent {
        info!("IP changed: '{}' -> '{}'", self.last_accepted, current);

        let update = RecordUpdate::new(&self.record_name, self.record_type, self.ttl, &current);
        let outcome = self.client.upsert(&update).await;

        if outcome.is_success() {
            let previous = std::mem::replace(&mut self.last_accepted, current.clone());
            debug!(
                "Record {} {} now {} ({})",
                self.record_name,
                self.record_type,
                current,
                outcome.detail()
            );
            WatchEvent::UpdateSucceeded { previous, current }
        } else {
            warn!(
                "Update of {} {} to {} via {} not applied, retrying next poll: {}",
                self.record_name,
                self.record_type,
                current,
                self.client.client_name(),
                outcome.detail()
            );
            WatchEvent::UpdateFailed {
                value: current,
                detail: outcome.detail(),
            }
        }
    }

    /// Emit a watch event without blocking
    fn emit_event(&self, event: WatchEvent) {
        match self.event_tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!("Event channel full, dropping event");
            }
            // Nobody listening
            Err(TrySendError::Closed(_)) => {}
        }
    }
}

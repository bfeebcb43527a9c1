//! Test doubles and common utilities for watcher contract tests
//!
//! The doubles are cheap to clone; clones share their script and their
//! call log, so a test keeps one handle while the watcher owns the other.

#![allow(dead_code)]

use async_trait::async_trait;
use dynupdate_core::config::{AddressFamily, WatchConfig};
use dynupdate_core::error::{Error, Result};
use dynupdate_core::traits::{AddressSource, RecordClient, RecordUpdate, UpdateOutcome};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One scripted answer from the address source
#[derive(Debug, Clone)]
pub enum Step {
    Address(&'static str),
    Missing,
    MissingTool,
}

/// An AddressSource that replays a script, repeating the last step forever
#[derive(Clone)]
pub struct ScriptedAddressSource {
    family: AddressFamily,
    script: Arc<Mutex<VecDeque<Step>>>,
    last: Arc<Mutex<Step>>,
    call_count: Arc<AtomicUsize>,
}

impl ScriptedAddressSource {
    pub fn new(family: AddressFamily, steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            family,
            script: Arc::new(Mutex::new(steps.into_iter().collect())),
            last: Arc::new(Mutex::new(Step::Missing)),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Source that always reports the same address
    pub fn fixed(family: AddressFamily, addr: &'static str) -> Self {
        Self::new(family, [Step::Address(addr)])
    }

    /// Source reporting each address in turn
    pub fn sequence(family: AddressFamily, addrs: &[&'static str]) -> Self {
        Self::new(family, addrs.iter().copied().map(Step::Address))
    }

    /// Number of times current() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AddressSource for ScriptedAddressSource {
    async fn current(&self) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        let step = {
            let mut script = self.script.lock().unwrap();
            let mut last = self.last.lock().unwrap();
            if let Some(step) = script.pop_front() {
                *last = step;
            }
            last.clone()
        };

        match step {
            Step::Address(addr) => Ok(addr.to_string()),
            Step::Missing => Err(Error::no_address("scripted: interface has no address")),
            Step::MissingTool => Err(Error::environment("scripted: no supported command")),
        }
    }

    fn family(&self) -> AddressFamily {
        self.family
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

/// A RecordClient that records every upsert and replays scripted outcomes
///
/// Once the scripted outcomes run out every upsert succeeds with HTTP 200.
#[derive(Clone)]
pub struct RecordingClient {
    updates: Arc<Mutex<Vec<RecordUpdate>>>,
    outcomes: Arc<Mutex<VecDeque<UpdateOutcome>>>,
    delay: Option<Duration>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self {
            updates: Arc::new(Mutex::new(Vec::new())),
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
            delay: None,
        }
    }

    /// Client whose next upserts return `outcomes` in order
    pub fn with_outcomes(outcomes: impl IntoIterator<Item = UpdateOutcome>) -> Self {
        let client = Self::new();
        client.outcomes.lock().unwrap().extend(outcomes);
        client
    }

    /// Client that takes `delay` to answer each upsert
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new()
        }
    }

    /// All upserts received so far
    pub fn updates(&self) -> Vec<RecordUpdate> {
        self.updates.lock().unwrap().clone()
    }

    /// Values of all upserts received so far
    pub fn values(&self) -> Vec<String> {
        self.updates().into_iter().map(|u| u.value).collect()
    }

    pub fn call_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }
}

#[async_trait]
impl RecordClient for RecordingClient {
    async fn upsert(&self, update: &RecordUpdate) -> UpdateOutcome {
        self.updates.lock().unwrap().push(update.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(UpdateOutcome::Applied { status: 200 })
    }

    fn client_name(&self) -> &'static str {
        "recording"
    }
}

/// Failed upsert as the HTTP client would report a server error
pub fn server_error() -> UpdateOutcome {
    UpdateOutcome::Rejected {
        status: 500,
        body: "internal error".to_string(),
    }
}

/// Helper to create a minimal valid WatchConfig for testing
pub fn minimal_config(family: AddressFamily) -> WatchConfig {
    WatchConfig::new("eth0", "myhost.example.org.", "test-token")
        .with_family(family)
        .with_interval_secs(30)
        .with_ttl(300)
}

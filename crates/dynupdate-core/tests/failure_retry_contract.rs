//! Contract Test: Failure Tolerance and Retry-by-Polling
//!
//! Constraints verified:
//! - A failed upsert leaves the last accepted value untouched
//! - The next poll resolving the same address retries the upsert
//! - Absent and malformed addresses never reach the record API
//! - None of these failures stop the loop
//!
//! If this test fails, a transient failure can wedge the watcher or push
//! garbage to DNS.

mod common;

use common::*;
use dynupdate_core::config::AddressFamily;
use dynupdate_core::traits::UpdateOutcome;
use dynupdate_core::{WatchEvent, Watcher};

#[tokio::test]
async fn failed_update_is_retried_on_next_poll() {
    let source = ScriptedAddressSource::sequence(
        AddressFamily::V4,
        &["192.0.2.1", "192.0.2.2", "192.0.2.2"],
    );
    // First upsert (A) succeeds, second (B) fails, third (B again) succeeds
    let client = RecordingClient::with_outcomes([
        UpdateOutcome::Applied { status: 201 },
        server_error(),
    ]);

    let (mut watcher, _events) = Watcher::new(
        Box::new(source),
        Box::new(client.clone()),
        &minimal_config(AddressFamily::V4),
    )
    .expect("watcher construction succeeds");

    watcher.poll_once().await;
    assert_eq!(watcher.last_accepted(), "192.0.2.1");

    let failed = watcher.poll_once().await;
    assert!(matches!(failed, WatchEvent::UpdateFailed { ref value, .. } if value == "192.0.2.2"));
    assert_eq!(
        watcher.last_accepted(),
        "192.0.2.1",
        "failed upsert must not change state"
    );

    watcher.poll_once().await;
    assert_eq!(watcher.last_accepted(), "192.0.2.2");
    assert_eq!(client.values(), vec!["192.0.2.1", "192.0.2.2", "192.0.2.2"]);
}

#[tokio::test]
async fn unreachable_api_keeps_retrying_first_value() {
    let source = ScriptedAddressSource::fixed(AddressFamily::V4, "192.0.2.9");
    let client = RecordingClient::with_outcomes([
        UpdateOutcome::Unreachable {
            reason: "connection refused".to_string(),
        },
        UpdateOutcome::Unreachable {
            reason: "connection refused".to_string(),
        },
    ]);

    let (mut watcher, _events) = Watcher::new(
        Box::new(source),
        Box::new(client.clone()),
        &minimal_config(AddressFamily::V4),
    )
    .expect("watcher construction succeeds");

    for _ in 0..4 {
        watcher.poll_once().await;
    }

    // Two failures, one success, then steady
    assert_eq!(client.call_count(), 3);
    assert_eq!(watcher.last_accepted(), "192.0.2.9");
}

#[tokio::test]
async fn missing_and_malformed_addresses_never_reach_api() {
    let source = ScriptedAddressSource::new(
        AddressFamily::V4,
        [
            Step::Missing,
            Step::Address("192.0.2.300"),
            Step::Address("2001:db8::1"),
            Step::MissingTool,
            Step::Address("192.0.2.5"),
        ],
    );
    let client = RecordingClient::new();

    let (mut watcher, _events) = Watcher::new(
        Box::new(source),
        Box::new(client.clone()),
        &minimal_config(AddressFamily::V4),
    )
    .expect("watcher construction succeeds");

    assert!(matches!(
        watcher.poll_once().await,
        WatchEvent::AddressMissing { environment: false, .. }
    ));
    assert_eq!(
        watcher.poll_once().await,
        WatchEvent::AddressRejected {
            value: "192.0.2.300".to_string()
        }
    );
    // Wrong family is rejected like a malformed value
    assert_eq!(
        watcher.poll_once().await,
        WatchEvent::AddressRejected {
            value: "2001:db8::1".to_string()
        }
    );
    assert!(matches!(
        watcher.poll_once().await,
        WatchEvent::AddressMissing { environment: true, .. }
    ));
    assert_eq!(client.call_count(), 0);
    assert_eq!(watcher.last_accepted(), "");

    watcher.poll_once().await;
    assert_eq!(client.values(), vec!["192.0.2.5"]);
}

#[tokio::test]
async fn absent_address_keeps_previous_state() {
    let source = ScriptedAddressSource::new(
        AddressFamily::V4,
        [Step::Address("192.0.2.5"), Step::Missing, Step::Address("192.0.2.5")],
    );
    let client = RecordingClient::new();

    let (mut watcher, _events) = Watcher::new(
        Box::new(source),
        Box::new(client.clone()),
        &minimal_config(AddressFamily::V4),
    )
    .expect("watcher construction succeeds");

    for _ in 0..3 {
        watcher.poll_once().await;
    }

    // The interface dropping its address for a poll is not a change
    assert_eq!(client.call_count(), 1);
    assert_eq!(watcher.last_accepted(), "192.0.2.5");
}

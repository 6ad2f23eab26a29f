//! Failures crossing bridge and raise boundaries through the public API

use gnomestack_core::prelude::*;
use gnomestack_core::{option, raise, CancellationToken, ExceptionError};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn read_port(raw: &str) -> Result<u16> {
    raw.trim()
        .parse::<u16>()
        .map_err(|e| Error::message(format!("invalid port '{raw}': {e}")).entry("input", raw))
}

#[test]
fn typed_errors_flow_through_chains_without_raising() {
    let doubled = read_port("8080").map(|p| u32::from(p) * 2);
    assert_eq!(doubled, Ok(16160));

    let calls = AtomicUsize::new(0);
    let failed = read_port("eighty").and_then(|p| {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(p)
    });
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let error = failed.unwrap_err();
    assert!(error.text().starts_with("invalid port 'eighty'"));
    assert_eq!(error.metadata().and_then(|m| m.get("input")), Some(&"eighty".into()));
}

#[test]
fn raised_failure_is_captured_and_re_raised_losslessly() {
    let error = Attempt::value(|| read_port("-1").expect_or_raise("loading listener")).unwrap_err();
    let failure = error.to_failure();
    assert_eq!(failure.kind(), FailureKind::Result);
    assert_eq!(failure.message(), "loading listener");
    assert!(failure.report().contains("caused by: invalid port '-1'"));

    let again = Attempt::run(move || raise(failure.clone())).unwrap_err();
    assert_eq!(again.text(), "loading listener");
}

#[test]
fn exception_round_trip_keeps_message() {
    let source = io::Error::new(io::ErrorKind::NotFound, "config.toml missing");
    let wrapped = ExceptionError::new(source);
    assert_eq!(wrapped.to_exception().message(), "config.toml missing");

    let error = Attempt::fallible(|| -> std::result::Result<(), io::Error> {
        Err(io::Error::new(io::ErrorKind::NotFound, "config.toml missing"))
    })
    .unwrap_err();
    assert_eq!(error.as_exception().unwrap().to_exception().message(), "config.toml missing");
}

#[test]
fn none_to_result_conversion_asserts() {
    assert_eq!(option::some(3).into_ok::<Error>(), Ok(3));

    let error = Attempt::value(|| option::none::<u8>().into_ok::<Error>()).unwrap_err();
    assert_eq!(error.kind(), FailureKind::OptionNone);
}

#[tokio::test]
async fn cancelled_before_start_is_an_error_not_a_panic() {
    let token = CancellationToken::new();
    token.cancel();

    let started = Arc::new(AtomicUsize::new(0));
    let counter = started.clone();
    let result = Attempt::cancellable(&token, |_| async move {
        counter.fetch_add(1, Ordering::SeqCst);
        42
    })
    .await;

    assert!(result.unwrap_err().is_cancelled());
    assert_eq!(started.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn cancellation_observed_mid_flight_becomes_err() {
    let token = CancellationToken::new();
    let trigger = token.clone();

    let result = Attempt::cancellable(&token, |token| async move {
        tokio::task::yield_now().await;
        trigger.cancel();
        token.raise_if_cancelled();
        "finished"
    })
    .await;

    assert!(result.unwrap_err().is_cancelled());
}

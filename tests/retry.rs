use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use caprover_preview::error::{PreviewError, PreviewResult};
use caprover_preview::retry::with_retry;
use tokio::time::Instant;

fn transient_error() -> PreviewError {
    PreviewError::Api {
        status: 1106,
        message: "temporarily unavailable".into(),
    }
}

#[tokio::test(start_paused = true)]
async fn first_attempt_success_short_circuits() {
    let calls = AtomicU32::new(0);
    let start = Instant::now();

    let result = with_retry(
        || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(42) }
        },
        3,
        Duration::from_millis(500),
    )
    .await
    .unwrap();

    assert_eq!(result, 42);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn success_after_failures_returns_that_attempt() {
    let calls = AtomicU32::new(0);

    let result = with_retry(
        || {
            let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if call < 3 {
                    Err(transient_error())
                } else {
                    Ok(call)
                }
            }
        },
        3,
        Duration::from_millis(500),
    )
    .await
    .unwrap();

    assert_eq!(result, 3);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn backoff_doubles_per_attempt() {
    let start = Instant::now();
    let observed: Mutex<Vec<Duration>> = Mutex::new(Vec::new());

    let result: PreviewResult<()> = with_retry(
        || {
            observed.lock().unwrap().push(start.elapsed());
            async { Err(transient_error()) }
        },
        4,
        Duration::from_millis(500),
    )
    .await;

    assert!(result.is_err());
    // Attempt n happens after base * (2^(n-1) - 1) total elapsed:
    // delays of 500, 1000, 2000 between the four attempts.
    assert_eq!(
        *observed.lock().unwrap(),
        vec![
            Duration::ZERO,
            Duration::from_millis(500),
            Duration::from_millis(1500),
            Duration::from_millis(3500),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn exhaustion_wraps_last_error_and_attempt_count() {
    let calls = AtomicU32::new(0);

    let result: PreviewResult<()> = with_retry(
        || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(transient_error()) }
        },
        3,
        Duration::from_millis(10),
    )
    .await;

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "failed after 3 attempts");
    match err {
        PreviewError::RetriesExhausted { attempts, source } => {
            assert_eq!(attempts, 3);
            assert!(matches!(*source, PreviewError::Api { status: 1106, .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test(start_paused = true)]
async fn zero_attempts_still_runs_once() {
    let calls = AtomicU32::new(0);

    let result: PreviewResult<()> = with_retry(
        || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(transient_error()) }
        },
        0,
        Duration::from_millis(10),
    )
    .await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(matches!(
        result.unwrap_err(),
        PreviewError::RetriesExhausted { attempts: 1, .. }
    ));
}

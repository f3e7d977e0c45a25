//! Linear retry with exponential backoff.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::{PreviewError, PreviewResult};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(500);

/// Run `operation`, retrying on failure with exponential backoff.
///
/// The wait before retry `n` is `base_delay * 2^(n-1)`; no jitter.
/// Success on any attempt short-circuits. Exhausting all attempts
/// yields [`PreviewError::RetriesExhausted`] wrapping the last cause.
/// A `max_attempts` of zero is treated as one attempt.
pub async fn with_retry<T, F, Fut>(
    mut operation: F,
    max_attempts: u32,
    base_delay: Duration,
) -> PreviewResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = PreviewResult<T>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if attempt >= max_attempts {
                    return Err(PreviewError::RetriesExhausted {
                        attempts: max_attempts,
                        source: Box::new(error),
                    });
                }
                let delay = base_delay * 2u32.pow(attempt - 1);
                warn!(
                    "attempt {attempt}/{max_attempts} failed: {error}; retrying in {}ms",
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// [`with_retry`] with the default attempt count and base delay.
pub async fn with_default_retry<T, F, Fut>(operation: F) -> PreviewResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = PreviewResult<T>>,
{
    with_retry(operation, DEFAULT_MAX_ATTEMPTS, DEFAULT_BASE_DELAY).await
}

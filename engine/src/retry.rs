//! Bounded retry with linear backoff.
//!
//! Every transient read in the engine goes through this one combinator:
//! chain head, log queries, status reads, profile storage reads, and the
//! session probe. Writes never do.

use std::future::Future;
use std::time::Duration;

/// Run `op` up to `attempts` times, sleeping `base_delay × n` after the
/// n-th failure (1x, 2x, ... linear). Returns the last error once the
/// bound is exhausted.
pub async fn with_retry<T, E, F, Fut>(attempts: u32, base_delay: Duration, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let attempts = attempts.max(1);
    let mut attempt = 1u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= attempts => return Err(e),
            Err(e) => {
                tracing::debug!(attempt, error = %e, "read failed, retrying");
                tokio::time::sleep(base_delay * attempt).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn returns_first_success() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, String> = with_retry(3, Duration::from_millis(1), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(7) }
        })
        .await;
        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_then_succeeds() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, String> = with_retry(3, Duration::from_millis(1), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err("transient".to_string())
                } else {
                    Ok(n)
                }
            }
        })
        .await;
        assert_eq!(result, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhaustion_returns_last_error() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, String> = with_retry(3, Duration::from_millis(1), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("down".to_string()) }
        })
        .await;
        assert_eq!(result, Err("down".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn zero_attempts_still_runs_once() {
        let calls = AtomicU32::new(0);
        let _: Result<(), String> = with_retry(0, Duration::from_millis(1), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("x".to_string()) }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

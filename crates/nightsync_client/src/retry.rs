//! Bounded retry.

use crate::config::RetryConfig;
use crate::error::{SyncError, SyncResult};
use std::future::Future;
use tracing::debug;

/// Runs `attempt` until it succeeds or the retry budget is spent.
///
/// At most `retry.max_attempts` attempts are made (at least one). Only
/// errors for which [`SyncError::is_retryable`] holds are retried; the last
/// error is returned. Dropping the returned future stops any pending retry.
pub async fn with_retry<T, F, Fut>(
    retry: &RetryConfig,
    operation: &str,
    mut attempt: F,
) -> SyncResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = SyncResult<T>>,
{
    let max_attempts = retry.max_attempts.max(1);
    let mut last_error: Option<SyncError> = None;

    for n in 0..max_attempts {
        if n > 0 {
            let delay = retry.delay_for_attempt(n);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if e.is_retryable() && n + 1 < max_attempts {
                    debug!(operation, attempt = n + 1, error = %e, "retrying");
                    last_error = Some(e);
                    continue;
                }
                return Err(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| SyncError::transport_fatal("no attempts made")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn retries_once_then_succeeds() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result = with_retry(&RetryConfig::default(), "test", move || async move {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(SyncError::BadStatus(500))
            } else {
                Ok(7)
            }
        })
        .await;

        assert_eq!(result, Ok(7));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn stops_after_budget() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: SyncResult<()> =
            with_retry(&RetryConfig::default(), "test", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(SyncError::Timeout)
            })
            .await;

        assert_eq!(result, Err(SyncError::Timeout));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn does_not_retry_permanent_errors() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: SyncResult<()> = with_retry(&RetryConfig::new(5), "test", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(SyncError::Encode("bad".into()))
        })
        .await;

        assert!(matches!(result, Err(SyncError::Encode(_))));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_attempts_still_runs_once() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result = with_retry(&RetryConfig::new(0), "test", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_between_attempts() {
        let retry = RetryConfig::new(3).with_initial_delay(Duration::from_secs(2));
        let start = tokio::time::Instant::now();

        let result: SyncResult<()> = with_retry(&retry, "test", || async {
            Err(SyncError::transport_retryable("down"))
        })
        .await;

        assert!(result.is_err());
        // 2s before the second attempt, 4s before the third.
        assert!(start.elapsed() >= Duration::from_secs(6));
    }
}

use tokio_retry::{strategy::{ExponentialBackoff, jitter}, RetryIf};
use std::time::Duration;
use super::{DataError, DataResult};

/// Retry an operation with jittered exponential backoff.
///
/// `max_attempts` counts retries after the first call. Only errors for which
/// [`DataError::is_retryable`] holds are retried.
pub async fn retry_with_backoff<F, Fut, T>(
    operation: F,
    max_attempts: usize,
) -> DataResult<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = DataResult<T>>,
{
    let retry_strategy = ExponentialBackoff::from_millis(100)
        .max_delay(Duration::from_secs(5))
        .map(jitter)
        .take(max_attempts);

    RetryIf::spawn(
        retry_strategy,
        || operation(),
        |e: &DataError| {
            if e.is_retryable() {
                tracing::warn!("Retryable feed error: {}", e);
                true
            } else {
                tracing::debug!("Non-retryable feed error: {}", e);
                false
            }
        },
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_retries_transient_errors_until_success() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let result = retry_with_backoff(
            move || async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(DataError::api_error(503, "busy"))
                } else {
                    Ok(n)
                }
            },
            3,
        )
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_on_permanent_errors() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let result: DataResult<()> = retry_with_backoff(
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(DataError::parse_error("not a feed"))
            },
            3,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

//! Timeout wrapping for awaitables.

// Layer 1: Standard library imports
use std::future::Future;
use std::time::Duration;

// Layer 2: Third-party crate imports
use thiserror::Error;

// Re-exported for symmetry with `with_timeout`.
pub use tokio::time::sleep;

/// The wrapped awaitable did not complete in time and has been cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation timed out after {timeout:?}")]
pub struct TimeoutError {
    pub timeout: Duration,
}

/// Await `fut` for at most `timeout`.
///
/// On expiry the wrapped future is cancelled (dropped) and
/// [`TimeoutError`] is returned; on success the timer is dropped.
/// Cancelling the returned future cancels both.
pub async fn with_timeout<F: Future>(timeout: Duration, fut: F) -> Result<F::Output, TimeoutError> {
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| TimeoutError { timeout })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_timeout_fires() {
        let result = with_timeout(Duration::from_secs(1), std::future::pending::<()>()).await;
        assert_eq!(
            result,
            Err(TimeoutError {
                timeout: Duration::from_secs(1)
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_passes_value_through() {
        let result = with_timeout(Duration::from_secs(1), async { 7 }).await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleeping_inside_the_window() {
        let result = with_timeout(Duration::from_secs(2), sleep(Duration::from_secs(1))).await;
        assert!(result.is_ok());
    }
}

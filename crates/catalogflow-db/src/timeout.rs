//! Upper bound on how long a single store call may take.

use std::future::Future;
use std::time::Duration;

use crate::error::StoreError;

/// Runs `fut`, failing with [`StoreError::Timeout`] once `limit` elapses.
///
/// The inner future is dropped on timeout; an in-flight transaction is rolled
/// back when its connection is returned to the pool.
pub async fn with_timeout<T, F>(limit: Duration, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(limit_ms = limit.as_millis() as u64, "Store call timed out");
            Err(StoreError::Timeout)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fast_call_passes_through() {
        let result = with_timeout(Duration::from_millis(100), async { Ok::<_, StoreError>(7) })
            .await
            .unwrap();
        assert_eq!(result, 7);
    }

    #[tokio::test]
    async fn test_inner_error_passes_through() {
        let result = with_timeout(Duration::from_millis(100), async {
            Err::<(), _>(StoreError::Conflict("x".into()))
        })
        .await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_slow_call_times_out() {
        let result = with_timeout(Duration::from_millis(50), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, StoreError>(())
        })
        .await;
        assert!(matches!(result, Err(StoreError::Timeout)));
    }
}

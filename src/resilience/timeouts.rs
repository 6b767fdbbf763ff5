//! Timeout enforcement.
//!
//! Races an operation against a deadline using Tokio's timer. If the deadline
//! wins the operation future is dropped, which cancels it at its next
//! suspension point. An operation that fails before the deadline keeps its
//! own error.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// The deadline elapsed before the operation settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Operation timed out after {}ms", .after.as_millis())]
pub struct TimeoutError {
    pub after: Duration,
}

/// Bound the wall-clock duration of `operation`.
pub async fn with_timeout<F, T, E>(operation: F, duration: Duration) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: From<TimeoutError>,
{
    match tokio::time::timeout(duration, operation).await {
        Ok(result) => result,
        Err(_) => Err(TimeoutError { after: duration }.into()),
    }
}

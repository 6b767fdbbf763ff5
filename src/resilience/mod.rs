//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Handler → guarded(breaker, budget, op)
//!     → circuit_breaker.rs (fail fast if open, track outcome)
//!     → timeouts.rs (race op against the budget)
//!     → chain adapter / feed
//! ```
//!
//! # Design Decisions
//! - Every external call has a deadline
//! - Timeouts count as breaker failures like any other error
//! - No retries: a single failure is surfaced to the client

pub mod circuit_breaker;
pub mod timeouts;

pub use circuit_breaker::{BreakerSnapshot, CircuitBreaker, CircuitOpenError, CircuitState};
pub use timeouts::{with_timeout, TimeoutError};

use std::future::Future;
use std::time::Duration;

use crate::error::ServiceError;
use crate::observability::metrics;

/// Run `operation` under `breaker` with a `budget` deadline.
pub async fn guarded<F, Fut, T>(
    breaker: &CircuitBreaker,
    budget: Duration,
    operation: F,
) -> Result<T, ServiceError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, ServiceError>>,
{
    let result = breaker
        .execute(|| with_timeout(operation(), budget))
        .await;

    let outcome = match &result {
        Ok(_) => "success",
        Err(ServiceError::Timeout(_)) => "timeout",
        Err(ServiceError::CircuitOpen(_)) => "rejected",
        Err(_) => "failure",
    };
    metrics::record_guarded_call(breaker.name(), outcome);

    if let Err(e) = &result {
        tracing::warn!(dependency = %breaker.name(), outcome, error = %e, "Guarded call failed");
    }
    result
}

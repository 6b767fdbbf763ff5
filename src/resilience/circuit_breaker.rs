//! Circuit breaker for chain and feed dependencies.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: dependency assumed down, calls fail fast
//! - Half-Open: cooldown elapsed, next call probes the dependency
//!
//! # State Transitions
//! ```text
//! Closed → Open: failure_count >= threshold
//! Open → Half-Open: more than recovery period since the last failure
//! Half-Open → Closed: probe succeeds (failure_count reset to 0)
//! Half-Open → Open: probe fails (count is already past the threshold)
//! ```
//!
//! # Design Decisions
//! - One breaker per dependency, constructed by the composition root
//! - Fail fast in Open state (the operation is never invoked)
//! - A single success fully closes the circuit
//! - The lock is never held across an await; two concurrent calls may both
//!   pass a Closed breaker before either records its outcome

use serde::Serialize;
use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

use crate::config::CircuitBreakerConfig;
use crate::observability::metrics;

/// Circuit state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

impl CircuitState {
    fn as_gauge(self) -> u8 {
        match self {
            CircuitState::Closed => 0,
            CircuitState::HalfOpen => 1,
            CircuitState::Open => 2,
        }
    }
}

/// Returned without invoking the operation while the circuit is open.
#[derive(Debug, Clone, Error)]
#[error("Circuit breaker {name} is OPEN")]
pub struct CircuitOpenError {
    pub name: String,
}

/// Point-in-time view of a breaker, for health endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakerSnapshot {
    pub name: String,
    pub state: CircuitState,
    pub failures: u32,
    pub ms_since_last_failure: Option<u64>,
}

#[derive(Debug)]
struct BreakerInner {
    state: CircuitState,
    failures: u32,
    last_failure: Option<Instant>,
}

/// Failure-tracking state machine guarding one dependency.
#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    failure_threshold: u32,
    recovery_period: Duration,
    inner: Mutex<BreakerInner>,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, config: &CircuitBreakerConfig) -> Self {
        let breaker = Self {
            name: name.into(),
            failure_threshold: config.failure_threshold.max(1),
            recovery_period: config.recovery_period(),
            inner: Mutex::new(BreakerInner {
                state: CircuitState::Closed,
                failures: 0,
                last_failure: None,
            }),
        };
        metrics::record_circuit_state(&breaker.name, CircuitState::Closed.as_gauge());
        breaker
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> CircuitState {
        self.lock().state
    }

    pub fn failures(&self) -> u32 {
        self.lock().failures
    }

    pub fn snapshot(&self) -> BreakerSnapshot {
        let inner = self.lock();
        BreakerSnapshot {
            name: self.name.clone(),
            state: inner.state,
            failures: inner.failures,
            ms_since_last_failure: inner
                .last_failure
                .map(|t| t.elapsed().as_millis() as u64),
        }
    }

    /// Run `operation` through the breaker.
    ///
    /// The original error is returned unchanged after bookkeeping. While the
    /// circuit is open and the cooldown has not elapsed, `CircuitOpenError`
    /// is returned and `operation` is not called.
    pub async fn execute<F, Fut, T, E>(&self, operation: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<CircuitOpenError>,
    {
        self.before_call()?;

        match operation().await {
            Ok(value) => {
                self.on_success();
                Ok(value)
            }
            Err(e) => {
                self.on_failure();
                Err(e)
            }
        }
    }

    fn before_call(&self) -> Result<(), CircuitOpenError> {
        let mut inner = self.lock();
        if inner.state != CircuitState::Open {
            return Ok(());
        }

        let cooled_down = inner
            .last_failure
            .map(|t| t.elapsed() > self.recovery_period)
            .unwrap_or(true);

        if cooled_down {
            self.transition(&mut inner, CircuitState::HalfOpen);
            Ok(())
        } else {
            tracing::debug!(breaker = %self.name, "Circuit open, failing fast");
            Err(CircuitOpenError { name: self.name.clone() })
        }
    }

    fn on_success(&self) {
        let mut inner = self.lock();
        inner.failures = 0;
        if inner.state != CircuitState::Closed {
            self.transition(&mut inner, CircuitState::Closed);
        }
    }

    fn on_failure(&self) {
        let mut inner = self.lock();
        inner.failures = inner.failures.saturating_add(1);
        inner.last_failure = Some(Instant::now());

        tracing::debug!(
            breaker = %self.name,
            failures = inner.failures,
            threshold = self.failure_threshold,
            "Guarded call failed"
        );

        if inner.failures >= self.failure_threshold {
            // Re-entering Open from HalfOpen restarts the cooldown through last_failure.
            if inner.state != CircuitState::Open {
                self.transition(&mut inner, CircuitState::Open);
            }
        }
    }

    fn transition(&self, inner: &mut BreakerInner, next: CircuitState) {
        let previous = inner.state;
        inner.state = next;

        match next {
            CircuitState::Open => tracing::warn!(
                breaker = %self.name,
                from = ?previous,
                failures = inner.failures,
                recovery_ms = self.recovery_period.as_millis() as u64,
                "Circuit opened"
            ),
            _ => tracing::info!(
                breaker = %self.name,
                from = ?previous,
                to = ?next,
                "Circuit state changed"
            ),
        }
        metrics::record_circuit_state(&self.name, next.as_gauge());
    }

    fn lock(&self) -> MutexGuard<'_, BreakerInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug, PartialEq)]
    enum TestError {
        Boom,
        Open(String),
    }

    impl From<CircuitOpenError> for TestError {
        fn from(e: CircuitOpenError) -> Self {
            TestError::Open(e.name)
        }
    }

    fn breaker(threshold: u32, recovery_ms: u64) -> CircuitBreaker {
        CircuitBreaker::new(
            "test",
            &CircuitBreakerConfig {
                failure_threshold: threshold,
                recovery_ms,
            },
        )
    }

    async fn fail(cb: &CircuitBreaker, calls: &AtomicU32) -> Result<(), TestError> {
        cb.execute(move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(TestError::Boom)
        })
        .await
    }

    async fn succeed(cb: &CircuitBreaker, calls: &AtomicU32) -> Result<u32, TestError> {
        cb.execute(move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, TestError>(7)
        })
        .await
    }

    #[tokio::test(start_paused = true)]
    async fn test_opens_at_threshold() {
        let cb = breaker(3, 60_000);
        let calls = AtomicU32::new(0);

        assert_eq!(fail(&cb, &calls).await, Err(TestError::Boom));
        assert_eq!(cb.state(), CircuitState::Closed);
        assert_eq!(fail(&cb, &calls).await, Err(TestError::Boom));
        assert_eq!(cb.state(), CircuitState::Closed);
        assert_eq!(fail(&cb, &calls).await, Err(TestError::Boom));
        assert_eq!(cb.state(), CircuitState::Open);
        assert_eq!(cb.failures(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_fails_fast_without_invoking() {
        let cb = breaker(3, 60_000);
        let calls = AtomicU32::new(0);
        for _ in 0..3 {
            let _ = fail(&cb, &calls).await;
        }

        let result = succeed(&cb, &calls).await;
        assert_eq!(result, Err(TestError::Open("test".to_string())));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_still_open_at_exact_recovery_period() {
        let cb = breaker(1, 1_000);
        let calls = AtomicU32::new(0);
        let _ = fail(&cb, &calls).await;

        tokio::time::advance(Duration::from_millis(1_000)).await;
        assert!(matches!(succeed(&cb, &calls).await, Err(TestError::Open(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_half_open_probe_success_closes() {
        let cb = breaker(3, 1_000);
        let calls = AtomicU32::new(0);
        for _ in 0..3 {
            let _ = fail(&cb, &calls).await;
        }

        tokio::time::advance(Duration::from_millis(1_001)).await;
        assert_eq!(succeed(&cb, &calls).await, Ok(7));
        assert_eq!(cb.state(), CircuitState::Closed);
        assert_eq!(cb.failures(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_half_open_probe_failure_reopens_and_restarts_cooldown() {
        let cb = breaker(2, 1_000);
        let calls = AtomicU32::new(0);
        let _ = fail(&cb, &calls).await;
        let _ = fail(&cb, &calls).await;
        assert_eq!(cb.state(), CircuitState::Open);

        tokio::time::advance(Duration::from_millis(1_500)).await;
        assert_eq!(fail(&cb, &calls).await, Err(TestError::Boom));
        assert_eq!(cb.state(), CircuitState::Open);
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        // Cooldown counts from the failed probe, not the original trip.
        tokio::time::advance(Duration::from_millis(600)).await;
        assert!(matches!(succeed(&cb, &calls).await, Err(TestError::Open(_))));

        tokio::time::advance(Duration::from_millis(500)).await;
        assert_eq!(succeed(&cb, &calls).await, Ok(7));
        assert_eq!(cb.state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_resets_failure_count() {
        let cb = breaker(3, 60_000);
        let calls = AtomicU32::new(0);
        let _ = fail(&cb, &calls).await;
        let _ = fail(&cb, &calls).await;
        assert_eq!(cb.failures(), 2);

        let _ = succeed(&cb, &calls).await;
        assert_eq!(cb.failures(), 0);

        let _ = fail(&cb, &calls).await;
        let _ = fail(&cb, &calls).await;
        assert_eq!(cb.state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot() {
        let cb = breaker(3, 60_000);
        let calls = AtomicU32::new(0);
        assert!(cb.snapshot().ms_since_last_failure.is_none());

        let _ = fail(&cb, &calls).await;
        tokio::time::advance(Duration::from_millis(250)).await;

        let snap = cb.snapshot();
        assert_eq!(snap.name, "test");
        assert_eq!(snap.state, CircuitState::Closed);
        assert_eq!(snap.failures, 1);
        assert_eq!(snap.ms_since_last_failure, Some(250));

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["state"], "CLOSED");
        assert_eq!(json["msSinceLastFailure"], 250);
    }
}

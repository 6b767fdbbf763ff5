//! Shutdown coordination.

use tokio::sync::broadcast;

use crate::error::ServiceError;
use crate::http::server::AppState;
use crate::resilience::with_timeout;

/// Coordinator for graceful shutdown.
///
/// Provides a broadcast channel that all long-running tasks can subscribe to.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Number of tasks still listening.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Release resources after the server stopped: persist the catalog
/// snapshot. Bounded by the graceful-shutdown timeout.
pub async fn cleanup(state: &AppState) -> Result<(), ServiceError> {
    tracing::info!("Performing cleanup operations");
    let budget = state.config.timeouts.graceful_shutdown();
    let state = state.clone();

    let result = with_timeout(
        async move {
            tokio::task::spawn_blocking(move || state.catalog.save())
                .await
                .map_err(|e| ServiceError::Adapter(format!("Cleanup task failed: {}", e)))?
                .map_err(ServiceError::from)
        },
        budget,
    )
    .await;

    match &result {
        Ok(true) => tracing::info!("Cleanup completed, catalog snapshot written"),
        Ok(false) => tracing::info!("Cleanup completed"),
        Err(e) => tracing::error!(error = %e, "Cleanup failed"),
    }
    result.map(|_| ())
}

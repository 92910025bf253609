//! Background cache population.
//!
//! Every read of the setup cache asks the [`CacheCoordinator`] to refresh
//! the matching rows from the provider. The refresh runs on the
//! coordinator's own task tracker, so it keeps going when the reader that
//! triggered it goes away, and its failures are logged instead of reaching
//! the reader.

use std::sync::Arc;
use std::time::Duration;

use pitlane_core::SetupQuery;
use pitlane_db::SetupStore;
use pitlane_research::SetupSource;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// How one background refresh ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The provider returned rows and they were upserted.
    Stored(usize),
    /// The provider found nothing; the store is untouched.
    Empty,
    /// The provider or the store failed; the failure was logged.
    Failed,
    /// The provider did not answer within the fetch timeout.
    TimedOut,
    /// The coordinator shut down first.
    Cancelled,
}

/// Owns the application-lifetime scope that provider fetches run in.
pub struct CacheCoordinator {
    source: Arc<dyn SetupSource>,
    store: SetupStore,
    fetch_timeout: Duration,
    tracker: TaskTracker,
    cancel: CancellationToken,
}

impl CacheCoordinator {
    pub fn new(source: Arc<dyn SetupSource>, store: SetupStore, fetch_timeout: Duration) -> Self {
        Self {
            source,
            store,
            fetch_timeout,
            tracker: TaskTracker::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Start a fetch-and-upsert for `query` and return immediately.
    ///
    /// Identical in-flight queries are not coalesced. Returns `None` once
    /// the coordinator has been shut down.
    pub fn spawn_refresh(&self, query: SetupQuery) -> Option<JoinHandle<RefreshOutcome>> {
        if self.cancel.is_cancelled() {
            tracing::debug!(circuit = %query.circuit, "Coordinator stopped, refresh skipped");
            return None;
        }

        let source = Arc::clone(&self.source);
        let store = self.store.clone();
        let cancel = self.cancel.child_token();
        let fetch_timeout = self.fetch_timeout;

        Some(self.tracker.spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!(circuit = %query.circuit, "Refresh cancelled");
                    RefreshOutcome::Cancelled
                }
                outcome = refresh(source.as_ref(), &store, &query, fetch_timeout) => outcome,
            }
        }))
    }

    /// Number of refreshes still running.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Stop accepting work, cancel in-flight fetches and wait for them.
    pub async fn shutdown(&self) {
        tracing::info!(in_flight = self.tracker.len(), "Shutting down cache coordinator");
        self.tracker.close();
        self.cancel.cancel();
        self.tracker.wait().await;
        tracing::info!("Cache coordinator shut down complete");
    }
}

/// Fetch `query` from `source` and upsert whatever comes back.
async fn refresh(
    source: &dyn SetupSource,
    store: &SetupStore,
    query: &SetupQuery,
    fetch_timeout: Duration,
) -> RefreshOutcome {
    let records = match tokio::time::timeout(fetch_timeout, source.fetch(query)).await {
        Err(_) => {
            tracing::warn!(
                circuit = %query.circuit,
                weather_qualifying = %query.weather_qualifying,
                weather_race = %query.weather_race,
                timeout_secs = fetch_timeout.as_secs(),
                "Setup fetch timed out"
            );
            return RefreshOutcome::TimedOut;
        }
        Ok(Err(e)) => {
            tracing::warn!(circuit = %query.circuit, error = %e, "Setup fetch failed");
            return RefreshOutcome::Failed;
        }
        Ok(Ok(records)) => records,
    };

    if records.is_empty() {
        tracing::debug!(circuit = %query.circuit, "Provider returned no setups");
        return RefreshOutcome::Empty;
    }

    match store.upsert_many(&records).await {
        Ok(()) => {
            tracing::info!(
                circuit = %query.circuit,
                count = records.len(),
                "Cached setups refreshed"
            );
            RefreshOutcome::Stored(records.len())
        }
        Err(e) => {
            tracing::error!(circuit = %query.circuit, error = %e, "Failed to cache fetched setups");
            RefreshOutcome::Failed
        }
    }
}

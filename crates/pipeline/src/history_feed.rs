//! Live history listing.

use futures::stream::{self, BoxStream, StreamExt};
use pitlane_core::HistoryRecord;
use pitlane_db::{HistoryStore, StoreError};

/// Stream of the full history list, newest first.
///
/// Yields the current list immediately, then again after every history
/// write. Bursts of writes between two polls collapse into one item.
pub fn history_feed(
    store: HistoryStore,
) -> BoxStream<'static, Result<Vec<HistoryRecord>, StoreError>> {
    let watch = store.watch();
    stream::unfold((store, watch, true), |(store, mut watch, first)| async move {
        if !first && watch.changed().await.is_err() {
            return None;
        }
        watch.take_pending();
        let listing = store.list_all().await;
        if let Err(e) = &listing {
            tracing::warn!(error = %e, "Failed to list history");
        }
        Some((listing, (store, watch, false)))
    })
    .boxed()
}

//! Filtered subscriptions over the store change bus.

use pitlane_core::query::QueryShape;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

use crate::bus::StoreEvent;

/// Which slice of the store a [`Watch`] cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchFilter {
    Setups(QueryShape),
    History,
}

/// The bus was dropped; no further changes will ever be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("store change bus closed")]
pub struct WatchClosed;

/// A receiver that only reports events relevant to its filter.
///
/// A lagged receiver has lost events it cannot inspect, so a lag is
/// reported as a change. Views may therefore reload more often than
/// strictly necessary but never miss a relevant write.
pub struct Watch {
    receiver: broadcast::Receiver<StoreEvent>,
    filter: WatchFilter,
}

impl Watch {
    pub fn new(receiver: broadcast::Receiver<StoreEvent>, filter: WatchFilter) -> Self {
        Self { receiver, filter }
    }

    /// Wait for the next relevant change.
    pub async fn changed(&mut self) -> Result<(), WatchClosed> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if event.affects(&self.filter) => return Ok(()),
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, filter = ?self.filter, "Store watch lagged");
                    return Ok(());
                }
                Err(RecvError::Closed) => return Err(WatchClosed),
            }
        }
    }

    /// Drain everything already queued without waiting.
    ///
    /// Returns `true` if any drained event was relevant.
    pub fn take_pending(&mut self) -> bool {
        let mut relevant = false;
        loop {
            match self.receiver.try_recv() {
                Ok(event) => relevant |= event.affects(&self.filter),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, filter = ?self.filter, "Store watch lagged");
                    relevant = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return relevant,
            }
        }
    }
}

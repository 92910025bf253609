//! In-process store change bus backed by a `tokio::sync::broadcast` channel.
//!
//! The setup and history stores publish a [`StoreEvent`] after every
//! committed write. Readers that present live views (the setup pager, the
//! history feed) subscribe through a [`Watch`](crate::watch::Watch) that
//! filters the stream down to the query shape they display.

use pitlane_core::query::QueryShape;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::watch::{Watch, WatchFilter};

// ---------------------------------------------------------------------------
// StoreEvent
// ---------------------------------------------------------------------------

/// A committed change to the local store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreEvent {
    /// Rows filed under this shape were inserted or replaced.
    SetupsChanged(QueryShape),

    /// Setups were bulk-deleted; `None` means every circuit.
    SetupsCleared { circuit: Option<String> },

    /// The history table changed.
    HistoryChanged,
}

impl StoreEvent {
    /// Whether a view filtered by `filter` must reload after this event.
    pub fn affects(&self, filter: &WatchFilter) -> bool {
        match (self, filter) {
            (Self::SetupsChanged(changed), WatchFilter::Setups(shape)) => changed == shape,
            (Self::SetupsCleared { circuit: None }, WatchFilter::Setups(_)) => true,
            (Self::SetupsCleared { circuit: Some(c) }, WatchFilter::Setups(shape)) => {
                *c == shape.circuit
            }
            (Self::HistoryChanged, WatchFilter::History) => true,
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
pub const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out bus for store changes.
///
/// Designed to be shared via `Arc<EventBus>` between the stores that
/// publish and the views that watch.
pub struct EventBus {
    sender: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed events are dropped and
    /// slow watchers observe a lag, which they treat as a change.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With no subscribers the event is dropped; nobody has a view to
    /// invalidate.
    pub fn publish(&self, event: StoreEvent) {
        let _ = self.sender.send(event);
    }

    /// Subscribe to every event on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    /// Watch setup changes for one query shape.
    pub fn watch_setups(&self, shape: QueryShape) -> Watch {
        Watch::new(self.subscribe(), WatchFilter::Setups(shape))
    }

    /// Watch history changes.
    pub fn watch_history(&self) -> Watch {
        Watch::new(self.subscribe(), WatchFilter::History)
    }

    /// Number of live receivers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(circuit: &str) -> QueryShape {
        QueryShape {
            circuit: circuit.to_string(),
            weather_qualifying: "Dry".to_string(),
            weather_race: "Dry".to_string(),
        }
    }

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(StoreEvent::SetupsChanged(shape("Monza")));

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received, StoreEvent::SetupsChanged(shape("Monza")));
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(StoreEvent::HistoryChanged);

        assert_eq!(rx1.recv().await.unwrap(), StoreEvent::HistoryChanged);
        assert_eq!(rx2.recv().await.unwrap(), StoreEvent::HistoryChanged);
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(StoreEvent::SetupsCleared { circuit: None });
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn setup_change_affects_only_its_shape() {
        let event = StoreEvent::SetupsChanged(shape("Monza"));
        assert!(event.affects(&WatchFilter::Setups(shape("Monza"))));
        assert!(!event.affects(&WatchFilter::Setups(shape("Spa"))));
        assert!(!event.affects(&WatchFilter::History));
    }

    #[test]
    fn clear_by_circuit_affects_every_weather_of_that_circuit() {
        let event = StoreEvent::SetupsCleared {
            circuit: Some("Monza".to_string()),
        };
        let mut wet = shape("Monza");
        wet.weather_race = "Wet".to_string();
        assert!(event.affects(&WatchFilter::Setups(wet)));
        assert!(!event.affects(&WatchFilter::Setups(shape("Spa"))));
    }

    #[test]
    fn clear_all_affects_every_setup_view() {
        let event = StoreEvent::SetupsCleared { circuit: None };
        assert!(event.affects(&WatchFilter::Setups(shape("Spa"))));
        assert!(!event.affects(&WatchFilter::History));
    }

    #[test]
    fn events_serialize_with_kind_tag() {
        let json = serde_json::to_value(StoreEvent::HistoryChanged).unwrap();
        assert_eq!(json["kind"], "history_changed");
    }
}

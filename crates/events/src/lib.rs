//! Store change notifications for the pitlane setup cache.
//!
//! - [`EventBus`] - in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`StoreEvent`] - what changed, keyed by query shape.
//! - [`Watch`] - a subscription filtered to one view's slice of the store.

pub mod bus;
pub mod watch;

pub use bus::{EventBus, StoreEvent};
pub use watch::{Watch, WatchClosed, WatchFilter};

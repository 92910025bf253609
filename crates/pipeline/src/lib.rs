//! Setup caching and retrieval pipeline.
//!
//! Reads go straight to the SQLite cache through a [`SetupPager`], while
//! the [`CacheCoordinator`] refreshes the same rows from the provider in
//! the background. [`SetupService`] is the entry point that ties the two
//! together with the AI generator, the handoff slot and the history feed.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod handoff;
pub mod history_feed;
pub mod paging;
pub mod service;
pub mod telemetry;

pub use config::{ConfigError, PipelineConfig};
pub use coordinator::{CacheCoordinator, RefreshOutcome};
pub use error::ServiceError;
pub use handoff::HandoffSlot;
pub use paging::{Page, SetupPager};
pub use service::SetupService;

//! Domain types and pure logic for the pitlane setup cache.
//!
//! This crate has no I/O: persistence lives in `pitlane-db`, provider
//! calls in `pitlane-research`.

pub mod error;
pub mod extract;
pub mod generated;
pub mod history;
pub mod query;
pub mod setup;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::CoreError;
pub use generated::GeneratedSetup;
pub use history::HistoryRecord;
pub use query::{QueryShape, SetupQuery};
pub use setup::{SetupRecord, SetupStyle};

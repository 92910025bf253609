//! Row models.
//!
//! SQLite has no embedded structs, so each parameter group of a setup is
//! flattened into prefixed columns and reassembled on read.

pub mod history;
pub mod setup;

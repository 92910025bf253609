//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&SqlitePool` as the first argument.

pub mod history_repo;
pub mod setup_repo;

pub use history_repo::HistoryRepo;
pub use setup_repo::SetupRepo;

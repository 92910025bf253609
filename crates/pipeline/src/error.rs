use pitlane_core::CoreError;
use pitlane_db::StoreError;
use pitlane_research::ResearchError;

use crate::config::ConfigError;

/// Errors surfaced by [`SetupService`](crate::service::SetupService).
///
/// Provider errors keep their own variants, so a caller can still tell a
/// timeout from a malformed answer.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Provider(#[from] ResearchError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

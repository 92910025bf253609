/// Persistence failures. Fatal to the call that hit them; nothing here
/// retries.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A record was rejected before touching the database.
    #[error(transparent)]
    Invalid(#[from] pitlane_core::CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

//! The text-generation seam.

use async_trait::async_trait;

use crate::error::ResearchError;

/// A generative model that turns one prompt into one block of text.
///
/// Transport, authentication and retries live behind this trait; callers
/// only add their own deadline and response recovery.
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Short provider name, used in `ai://` pseudo-URLs and logs.
    fn provider(&self) -> &str;

    /// Run a single round trip.
    async fn generate(&self, prompt: &str) -> Result<String, ResearchError>;
}

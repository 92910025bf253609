//! Setup providers for the pitlane cache.
//!
//! The [`SetupSource`] trait is what the cache coordinator fetches from.
//! The production source is a [`SetupGenerator`] over a [`TextModel`]
//! (normally [`GeminiApi`]); [`StaticSetupSource`] serves a fixed list for
//! development and tests.

pub mod assistant;
pub mod error;
pub mod gemini;
pub mod generator;
pub mod model;
pub mod prompt;
pub mod source;

pub use assistant::SetupAssistant;
pub use error::ResearchError;
pub use gemini::GeminiApi;
pub use generator::{SetupGenerator, GENERATION_TIMEOUT};
pub use model::TextModel;
pub use source::{SetupSource, StaticSetupSource};

//! Free-form setup questions.

use crate::error::ResearchError;
use crate::generator::SetupGenerator;
use crate::prompt::chat_prompt;

/// Chat front-end over the same model and deadline as setup generation.
#[derive(Clone)]
pub struct SetupAssistant {
    generator: SetupGenerator,
}

impl SetupAssistant {
    pub fn new(generator: SetupGenerator) -> Self {
        Self { generator }
    }

    /// Answer one question. A blank answer is [`ResearchError::EmptyResponse`].
    pub async fn ask(&self, message: &str) -> Result<String, ResearchError> {
        let answer = self.generator.complete(&chat_prompt(message)).await?;
        let answer = answer.trim();
        if answer.is_empty() {
            tracing::warn!(
                provider = self.generator.provider(),
                "Assistant returned a blank answer"
            );
            return Err(ResearchError::EmptyResponse);
        }
        Ok(answer.to_string())
    }
}

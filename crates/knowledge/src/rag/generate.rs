//! Final answer generation.

use crate::rag::call::LlmCall;
use faqbot_core::{AppError, AppResult};
use faqbot_prompt::BuiltPrompt;

pub struct AnswerGenerator {
    call: LlmCall,
}

impl AnswerGenerator {
    pub fn new(call: LlmCall) -> Self {
        Self { call }
    }

    /// Produce the user-facing answer. The reply is returned verbatim.
    pub async fn generate(&self, prompt: &BuiltPrompt) -> AppResult<String> {
        self.call
            .complete(prompt)
            .await
            .map_err(|e| AppError::GenerationUnavailable(e.to_string()))
    }
}

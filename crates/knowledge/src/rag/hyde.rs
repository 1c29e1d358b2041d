//! Hypothetical-document retrieval.
//!
//! The model writes a plausible answer to the question and that answer,
//! rather than the question, is used as the search query.

use crate::passage::Passage;
use crate::rag::call::LlmCall;
use crate::rag::retriever::Retriever;
use faqbot_core::{AppError, AppResult};
use faqbot_prompt::PromptLibrary;
use std::sync::Arc;

pub struct HypotheticalDocRetriever {
    call: LlmCall,
    prompts: Arc<PromptLibrary>,
    retriever: Retriever,
}

impl HypotheticalDocRetriever {
    pub fn new(call: LlmCall, prompts: Arc<PromptLibrary>, retriever: Retriever) -> Self {
        Self {
            call,
            prompts,
            retriever,
        }
    }

    /// Ask the model for a plausible answer to `question`.
    pub async fn hypothetical_answer(&self, question: &str) -> AppResult<String> {
        let prompt = self.prompts.hyde(question)?;
        self.call
            .complete(&prompt)
            .await
            .map_err(|e| AppError::RetrievalUnavailable(format!("Hypothetical answer failed: {}", e)))
    }

    /// Retrieve with a hypothetical answer as the query.
    ///
    /// A blank hypothetical falls back to searching the question itself.
    pub async fn search_hyde(&self, question: &str) -> AppResult<Vec<Passage>> {
        let hypothetical = self.hypothetical_answer(question).await?;
        let query = hypothetical.trim();

        if query.is_empty() {
            tracing::warn!("Hypothetical answer was empty, searching with the question");
            return self.retriever.search(question).await;
        }

        tracing::debug!("Hypothetical answer: {} chars", query.chars().count());
        self.retriever.search(query).await
    }
}

//! Pipeline request and trace types.

use crate::passage::Passage;
use crate::rag::classifier::ClassificationLabel;
use chrono::{DateTime, Utc};
use faqbot_llm::ChatMessage;
use faqbot_prompt::PromptChoice;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered chat turns; the last turn is the question being answered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }

    /// A conversation of one user turn.
    pub fn single(question: impl Into<String>) -> Self {
        Self::new(vec![ChatMessage::user(question)])
    }

    /// Content of the last turn.
    pub fn current_question(&self) -> Option<&str> {
        self.messages.last().map(|m| m.content.as_str())
    }

    /// Turns before the current question. Carried but not consulted.
    pub fn history(&self) -> &[ChatMessage] {
        match self.messages.split_last() {
            Some((_, history)) => history,
            None => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl From<Vec<ChatMessage>> for Conversation {
    fn from(messages: Vec<ChatMessage>) -> Self {
        Self::new(messages)
    }
}

/// Stages one request passes through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineState {
    Received,
    Classified,
    SkippedRetrieval,
    Retrieved,
    ContextAssembled,
    Prompted,
    Answered,
}

impl PipelineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineState::Received => "RECEIVED",
            PipelineState::Classified => "CLASSIFIED",
            PipelineState::SkippedRetrieval => "SKIPPED_RETRIEVAL",
            PipelineState::Retrieved => "RETRIEVED",
            PipelineState::ContextAssembled => "CONTEXT_ASSEMBLED",
            PipelineState::Prompted => "PROMPTED",
            PipelineState::Answered => "ANSWERED",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answer plus the trace of how it was produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOutcome {
    pub request_id: String,

    pub answer: String,

    pub label: ClassificationLabel,

    /// Queries searched, original first; empty when retrieval was skipped
    pub queries: Vec<String>,

    /// Deduplicated passages that went into the prompt
    pub passages: Vec<Passage>,

    pub prompt_choice: PromptChoice,

    pub states: Vec<PipelineState>,

    pub answered_at: DateTime<Utc>,
}

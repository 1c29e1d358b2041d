//! General-versus-specific question classification.

use crate::rag::call::LlmCall;
use faqbot_core::AppResult;
use faqbot_prompt::PromptLibrary;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Whether a question needs school-specific context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClassificationLabel {
    /// Answerable from common knowledge; retrieval is skipped
    General,

    /// Needs the school's own material
    Specific,
}

impl ClassificationLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationLabel::General => "general",
            ClassificationLabel::Specific => "specific",
        }
    }
}

impl fmt::Display for ClassificationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The classifier replied with something other than a bare label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("ambiguous classification output: {raw:?}")]
pub struct ClassificationAmbiguous {
    pub raw: String,
}

/// Parse a classifier reply.
///
/// Only the words `general` and `specific` are labels, ignoring case and
/// surrounding whitespace.
pub fn parse_label(raw: &str) -> Result<ClassificationLabel, ClassificationAmbiguous> {
    match raw.trim().to_lowercase().as_str() {
        "general" => Ok(ClassificationLabel::General),
        "specific" => Ok(ClassificationLabel::Specific),
        _ => Err(ClassificationAmbiguous {
            raw: raw.to_string(),
        }),
    }
}

pub struct Classifier {
    call: LlmCall,
    prompts: Arc<PromptLibrary>,
}

impl Classifier {
    pub fn new(call: LlmCall, prompts: Arc<PromptLibrary>) -> Self {
        Self { call, prompts }
    }

    /// Label `question`.
    ///
    /// An ambiguous reply resolves to `Specific` so the answer stays
    /// grounded. A failed model call is returned as an error.
    pub async fn classify(&self, question: &str) -> AppResult<ClassificationLabel> {
        let prompt = self.prompts.classification(question)?;
        let raw = self.call.complete(&prompt).await?;

        let label = parse_label(&raw).unwrap_or_else(|ambiguous| {
            tracing::warn!("{}; treating question as specific", ambiguous);
            ClassificationLabel::Specific
        });

        tracing::info!("Question classified as {}", label);
        Ok(label)
    }
}

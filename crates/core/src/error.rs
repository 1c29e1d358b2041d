//! Error types for the FAQ bot.
//!
//! This module defines a unified error enum covering configuration, I/O,
//! language-model, retrieval, prompt, and generation failures.

use thiserror::Error;

/// Unified error type for the FAQ bot.
///
/// All fallible functions return `Result<T, AppError>`. Conditions the
/// pipeline recovers from locally (an ambiguous classification, an
/// unparseable rewrite) never surface here.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Language-model collaborator errors outside the final answer call
    #[error("LLM error: {0}")]
    Llm(String),

    /// Knowledge base errors that are not retrieval failures
    #[error("Knowledge error: {0}")]
    Knowledge(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// The vector index failed, timed out, or broke its contract.
    /// Never masked: answering without the intended context is not allowed.
    #[error("Retrieval unavailable: {0}")]
    RetrievalUnavailable(String),

    /// The final answer call failed or timed out.
    #[error("Generation unavailable: {0}")]
    GenerationUnavailable(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Whether this error came from the vector index.
    pub fn is_retrieval(&self) -> bool {
        matches!(self, AppError::RetrievalUnavailable(_))
    }

    /// Whether this error came from the final answer call.
    pub fn is_generation(&self) -> bool {
        matches!(self, AppError::GenerationUnavailable(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(AppError::RetrievalUnavailable("down".into()).is_retrieval());
        assert!(!AppError::RetrievalUnavailable("down".into()).is_generation());
        assert!(AppError::GenerationUnavailable("down".into()).is_generation());
        assert!(!AppError::Llm("x".into()).is_retrieval());
    }

    #[test]
    fn test_error_display() {
        let err = AppError::RetrievalUnavailable("index offline".to_string());
        assert_eq!(err.to_string(), "Retrieval unavailable: index offline");
    }

    #[test]
    fn test_from_serde_json() {
        let err: AppError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}

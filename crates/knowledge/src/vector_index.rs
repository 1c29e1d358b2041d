//! Vector index abstraction for school passages.
//!
//! The index is owned and populated elsewhere; the bot only queries it.

use crate::passage::Passage;
use async_trait::async_trait;
use faqbot_core::config::RetrievalConfig;
use faqbot_core::{AppResult, QueryMode};
use serde::{Deserialize, Serialize};

/// Parameters of one similarity search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Maximum number of hits
    pub k: u32,

    /// Hits scoring below this are dropped by the index
    pub score_threshold: f32,

    pub mode: QueryMode,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self::from(&RetrievalConfig::default())
    }
}

impl From<&RetrievalConfig> for SearchParams {
    fn from(config: &RetrievalConfig) -> Self {
        Self {
            k: config.k,
            score_threshold: config.score_threshold,
            mode: config.mode,
        }
    }
}

/// Trait for vector index backends.
///
/// Implementations return at most `k` passages, each scored at or above the
/// threshold, ordered by descending score. Any failure, including a hit
/// without a score, is reported as `AppError::RetrievalUnavailable`.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Search for passages similar to `query`.
    async fn similarity_search(&self, query: &str, params: &SearchParams)
        -> AppResult<Vec<Passage>>;
}

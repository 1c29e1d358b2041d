//! Similarity search over one or many queries.

use crate::passage::Passage;
use crate::rag::call::bounded;
use crate::vector_index::{SearchParams, VectorIndex};
use faqbot_core::{AppError, AppResult};
use futures::future::try_join_all;
use std::sync::Arc;
use std::time::Duration;

/// Searches the vector index with fixed parameters.
#[derive(Clone)]
pub struct Retriever {
    index: Arc<dyn VectorIndex>,
    params: SearchParams,
    timeout: Option<Duration>,
}

impl Retriever {
    pub fn new(index: Arc<dyn VectorIndex>, params: SearchParams, timeout: Option<Duration>) -> Self {
        Self {
            index,
            params,
            timeout,
        }
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Top-k passages for `query`, at or above the score threshold.
    ///
    /// Every failure comes back as `AppError::RetrievalUnavailable`.
    pub async fn search(&self, query: &str) -> AppResult<Vec<Passage>> {
        let index_name = self.index.name().to_string();
        let search = async {
            self.index
                .similarity_search(query, &self.params)
                .await
                .map_err(|e| match e {
                    AppError::RetrievalUnavailable(_) => e,
                    other => AppError::RetrievalUnavailable(other.to_string()),
                })
        };

        let passages = bounded(self.timeout, search, |limit| {
            AppError::RetrievalUnavailable(format!(
                "Search on '{}' timed out after {:?}",
                index_name, limit
            ))
        })
        .await?;

        tracing::debug!("Query {:?} matched {} passages", query, passages.len());
        Ok(passages)
    }

    /// Search every query concurrently; results keep the order of `queries`.
    ///
    /// The first failure fails the whole batch.
    pub async fn search_all<S: AsRef<str>>(&self, queries: &[S]) -> AppResult<Vec<Vec<Passage>>> {
        try_join_all(queries.iter().map(|q| self.search(q.as_ref()))).await
    }
}

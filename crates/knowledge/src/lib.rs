//! Retrieval and answering for the FAQ bot.
//!
//! Queries an externally maintained vector index of school passages and
//! drives the classify, rewrite, retrieve and answer pipeline.

pub mod context;
pub mod databricks_index;
pub mod passage;
pub mod rag;
pub mod vector_index;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use databricks_index::{ColumnMapping, DatabricksVectorIndex};
pub use passage::{Passage, PassageSet};
pub use rag::{
    ClassificationLabel, Conversation, Pipeline, PipelineConfig, PipelineOutcome, PipelineState,
    Retriever, RewrittenQuerySet,
};
pub use vector_index::{SearchParams, VectorIndex};

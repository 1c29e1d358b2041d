//! Retrieval-augmented answering.
//!
//! Classification, query rewriting, hypothetical-document retrieval and
//! answer generation, wired together by [`Pipeline`].

pub mod call;
pub mod classifier;
pub mod generate;
pub mod hyde;
pub mod pipeline;
pub mod retriever;
pub mod rewrite;
pub mod types;

pub use call::LlmCall;
pub use classifier::{parse_label, ClassificationAmbiguous, ClassificationLabel, Classifier};
pub use generate::AnswerGenerator;
pub use hyde::HypotheticalDocRetriever;
pub use pipeline::{Pipeline, PipelineConfig};
pub use retriever::Retriever;
pub use rewrite::{parse_rewrites, QueryRewriter, RewriteParseFailure, RewrittenQuerySet};
pub use types::{Conversation, PipelineOutcome, PipelineState};

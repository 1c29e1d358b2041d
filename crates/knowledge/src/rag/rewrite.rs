//! Query expansion into search variants.

use crate::rag::call::LlmCall;
use faqbot_prompt::PromptLibrary;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// Delimiters between variants in the model's reply.
const VARIANT_DELIMITERS: [char; 3] = [',', '，', '\n'];

/// Search queries for one question, original first.
///
/// Never empty, free of blank and duplicate entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RewrittenQuerySet(Vec<String>);

impl RewrittenQuerySet {
    /// A set holding only the original question.
    pub fn original_only(question: impl Into<String>) -> Self {
        Self(vec![question.into()])
    }

    pub fn original(&self) -> &str {
        &self.0[0]
    }

    /// Variants after the original.
    pub fn variants(&self) -> &[String] {
        &self.0[1..]
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

/// The rewrite reply could not be turned into variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteParseFailure {
    #[error("rewrite reply was empty")]
    Empty,

    #[error("rewrite reply held no new variants")]
    NoVariants,
}

/// Split a comma-separated rewrite reply into a query set for `original`.
///
/// Variants are trimmed; blanks, repeats and copies of the original are
/// dropped, and at most `max_variants` are kept.
pub fn parse_rewrites(
    original: &str,
    raw: &str,
    max_variants: usize,
) -> Result<RewrittenQuerySet, RewriteParseFailure> {
    if raw.trim().is_empty() {
        return Err(RewriteParseFailure::Empty);
    }

    let mut seen: HashSet<&str> = HashSet::new();
    seen.insert(original);

    let variants: Vec<String> = raw
        .split(&VARIANT_DELIMITERS[..])
        .map(str::trim)
        .filter(|v| !v.is_empty() && seen.insert(*v))
        .take(max_variants)
        .map(str::to_string)
        .collect();

    if variants.is_empty() {
        return Err(RewriteParseFailure::NoVariants);
    }

    let mut queries = Vec::with_capacity(variants.len() + 1);
    queries.push(original.to_string());
    queries.extend(variants);
    Ok(RewrittenQuerySet(queries))
}

pub struct QueryRewriter {
    call: LlmCall,
    prompts: Arc<PromptLibrary>,
    max_variants: usize,
}

impl QueryRewriter {
    pub fn new(call: LlmCall, prompts: Arc<PromptLibrary>, max_variants: usize) -> Self {
        Self {
            call,
            prompts,
            max_variants,
        }
    }

    /// Expand `question` into search queries.
    ///
    /// Never fails: a model error or unusable reply leaves only the original.
    pub async fn rewrite(&self, question: &str) -> RewrittenQuerySet {
        let raw = match self.prompts.rewrite(question) {
            Ok(prompt) => self.call.complete(&prompt).await,
            Err(e) => Err(e),
        };

        let raw = match raw {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Query rewrite failed, using the question alone: {}", e);
                return RewrittenQuerySet::original_only(question);
            }
        };

        match parse_rewrites(question, &raw, self.max_variants) {
            Ok(queries) => {
                tracing::debug!("Rewrote question into {} queries", queries.len());
                queries
            }
            Err(failure) => {
                tracing::warn!("{}; using the question alone", failure);
                RewrittenQuerySet::original_only(question)
            }
        }
    }
}

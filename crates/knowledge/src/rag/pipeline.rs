//! Question answering orchestration.
//!
//! A request is classified once. General questions go straight to the plain
//! answer prompt. Specific ones are rewritten into search variants, each
//! variant and a hypothetical answer are searched concurrently, and the
//! merged passages ground the answer prompt.

use crate::context::{format_passages, merge_passages, not_required};
use crate::passage::{Passage, PassageSet};
use crate::rag::call::LlmCall;
use crate::rag::classifier::{ClassificationLabel, Classifier};
use crate::rag::generate::AnswerGenerator;
use crate::rag::hyde::HypotheticalDocRetriever;
use crate::rag::retriever::Retriever;
use crate::rag::rewrite::{QueryRewriter, RewrittenQuerySet};
use crate::rag::types::{Conversation, PipelineOutcome, PipelineState};
use crate::vector_index::{SearchParams, VectorIndex};
use chrono::Utc;
use faqbot_core::config::{RetrievalConfig, SamplingConfig, TimeoutConfig};
use faqbot_core::{AppConfig, AppError, AppResult};
use faqbot_llm::LlmClient;
use faqbot_prompt::{AssembledContext, PromptLibrary};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Settings the pipeline takes from `AppConfig`.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Model or serving endpoint every call-site uses
    pub model: String,
    pub retrieval: RetrievalConfig,
    pub sampling: SamplingConfig,
    pub timeouts: TimeoutConfig,
}

impl PipelineConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            model: config.model.clone(),
            retrieval: config.retrieval.clone(),
            sampling: config.sampling.clone(),
            timeouts: config.timeouts.clone(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from_app_config(&AppConfig::default())
    }
}

/// Records visited states and logs each transition.
struct StateTrail(Vec<PipelineState>);

impl StateTrail {
    fn start() -> Self {
        tracing::debug!("-> {}", PipelineState::Received);
        Self(vec![PipelineState::Received])
    }

    fn advance(&mut self, next: PipelineState) {
        if let Some(prev) = self.0.last() {
            tracing::debug!("{} -> {}", prev, next);
        }
        self.0.push(next);
    }
}

pub struct Pipeline {
    classifier: Classifier,
    rewriter: QueryRewriter,
    retriever: Retriever,
    hyde: HypotheticalDocRetriever,
    generator: AnswerGenerator,
    prompts: Arc<PromptLibrary>,
}

impl Pipeline {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        index: Arc<dyn VectorIndex>,
        prompts: PromptLibrary,
        config: PipelineConfig,
    ) -> Self {
        let prompts = Arc::new(prompts);
        let call = |label, sampling, timeout| {
            LlmCall::new(label, Arc::clone(&llm), config.model.clone(), sampling, timeout)
        };

        let retriever = Retriever::new(
            index,
            SearchParams::from(&config.retrieval),
            config.timeouts.retrieval(),
        );

        Self {
            classifier: Classifier::new(
                call(
                    "classification",
                    config.sampling.classification,
                    config.timeouts.classification(),
                ),
                Arc::clone(&prompts),
            ),
            rewriter: QueryRewriter::new(
                call("rewrite", config.sampling.rewrite, config.timeouts.rewrite()),
                Arc::clone(&prompts),
                config.retrieval.max_query_variants,
            ),
            hyde: HypotheticalDocRetriever::new(
                call("hyde", config.sampling.hyde, config.timeouts.hyde()),
                Arc::clone(&prompts),
                retriever.clone(),
            ),
            generator: AnswerGenerator::new(call(
                "generation",
                config.sampling.generation,
                config.timeouts.generation(),
            )),
            retriever,
            prompts,
        }
    }

    /// Answer the last turn of `conversation`.
    pub async fn answer(&self, conversation: &Conversation) -> AppResult<String> {
        Ok(self.run(conversation).await?.answer)
    }

    /// Answer the last turn of `conversation` and report how.
    pub async fn run(&self, conversation: &Conversation) -> AppResult<PipelineOutcome> {
        let request_id = Uuid::new_v4().to_string();
        let span = tracing::info_span!("pipeline", request_id = %request_id);

        self.run_inner(conversation, request_id.clone())
            .instrument(span)
            .await
    }

    async fn run_inner(
        &self,
        conversation: &Conversation,
        request_id: String,
    ) -> AppResult<PipelineOutcome> {
        let question = conversation
            .current_question()
            .ok_or_else(|| AppError::Other("Conversation has no turns".to_string()))?;

        let mut states = StateTrail::start();
        if !conversation.history().is_empty() {
            tracing::debug!(
                "Ignoring {} earlier turns",
                conversation.history().len()
            );
        }

        let label = self.classifier.classify(question).await?;
        states.advance(PipelineState::Classified);

        let (queries, passages, context) = match label {
            ClassificationLabel::General => {
                states.advance(PipelineState::SkippedRetrieval);
                (Vec::new(), PassageSet::new(), not_required())
            }
            ClassificationLabel::Specific => {
                let queries = self.rewriter.rewrite(question).await;
                let passages = self.retrieve(&queries).await?;
                states.advance(PipelineState::Retrieved);

                let context = AssembledContext::Reference(format_passages(&passages));
                (queries.into_vec(), passages, context)
            }
        };
        states.advance(PipelineState::ContextAssembled);

        let (prompt_choice, prompt) = self.prompts.answer(&context, question)?;
        states.advance(PipelineState::Prompted);
        tracing::info!(
            "Answering with {:?} prompt over {} passages",
            prompt_choice,
            passages.len()
        );

        let answer = self.generator.generate(&prompt).await?;
        states.advance(PipelineState::Answered);

        Ok(PipelineOutcome {
            request_id,
            answer,
            label,
            queries,
            passages: passages.into_vec(),
            prompt_choice,
            states: states.0,
            answered_at: Utc::now(),
        })
    }

    /// Search every query and the hypothetical answer concurrently and merge
    /// the hits, query results first in order, then the hypothetical's.
    async fn retrieve(&self, queries: &RewrittenQuerySet) -> AppResult<PassageSet> {
        let (per_query, hyde) = tokio::try_join!(
            self.retriever.search_all(queries.as_slice()),
            self.hyde.search_hyde(queries.original())
        )?;

        let lists: Vec<Vec<Passage>> = per_query.into_iter().chain(std::iter::once(hyde)).collect();
        let raw_count: usize = lists.iter().map(Vec::len).sum();
        let merged = merge_passages(lists);

        tracing::info!(
            "Retrieved {} passages ({} before deduplication) for {} queries",
            merged.len(),
            raw_count,
            queries.len()
        );
        Ok(merged)
    }
}

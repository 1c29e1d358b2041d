//! Retriever and hypothetical-document search behaviour.

use super::support::{passage, RecordingIndex, Reply, ScriptedLlm, Site};
use crate::passage::Passage;
use crate::rag::{HypotheticalDocRetriever, LlmCall, Retriever};
use crate::vector_index::{SearchParams, VectorIndex};
use async_trait::async_trait;
use faqbot_core::config::SamplingParams;
use faqbot_core::{AppError, AppResult, QueryMode};
use faqbot_prompt::PromptLibrary;
use std::sync::Arc;
use std::time::Duration;

struct BrokenIndex;

#[async_trait]
impl VectorIndex for BrokenIndex {
    fn name(&self) -> &str {
        "broken"
    }

    async fn similarity_search(&self, _query: &str, _params: &SearchParams) -> AppResult<Vec<Passage>> {
        Err(AppError::Knowledge("schema mismatch".to_string()))
    }
}

struct SlowIndex;

#[async_trait]
impl VectorIndex for SlowIndex {
    fn name(&self) -> &str {
        "slow"
    }

    async fn similarity_search(&self, _query: &str, _params: &SearchParams) -> AppResult<Vec<Passage>> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(Vec::new())
    }
}

fn params(k: u32, score_threshold: f32) -> SearchParams {
    SearchParams {
        k,
        score_threshold,
        mode: QueryMode::Hybrid,
    }
}

#[tokio::test]
async fn test_search_applies_params() {
    let index = Arc::new(RecordingIndex::new().with_hits(
        "学費",
        vec![
            passage("1", "a", 0.95),
            passage("2", "b", 0.9),
            passage("3", "c", 0.6),
        ],
    ));
    let retriever = Retriever::new(index, params(10, 0.7), None);

    let hits = retriever.search("学費").await.unwrap();
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|p| p.relevance_score >= 0.7));

    let retriever = Retriever::new(
        Arc::new(RecordingIndex::new().with_hits("学費", vec![passage("1", "a", 0.95), passage("2", "b", 0.9)])),
        params(1, 0.7),
        None,
    );
    assert_eq!(retriever.search("学費").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_search_all_keeps_query_order() {
    let index = Arc::new(
        RecordingIndex::new()
            .with_hits("x", vec![passage("1", "from x", 0.9)])
            .with_hits("y", vec![passage("2", "from y", 0.9)]),
    );
    let retriever = Retriever::new(index, params(10, 0.7), None);

    let lists = retriever.search_all(&["y", "missing", "x"]).await.unwrap();
    assert_eq!(lists.len(), 3);
    assert_eq!(lists[0][0].text, "from y");
    assert!(lists[1].is_empty());
    assert_eq!(lists[2][0].text, "from x");
}

#[tokio::test]
async fn test_other_errors_become_retrieval_failures() {
    let retriever = Retriever::new(Arc::new(BrokenIndex), params(10, 0.7), None);

    let err = retriever.search("q").await.unwrap_err();
    assert!(err.is_retrieval());
    assert!(err.to_string().contains("schema mismatch"));
}

#[tokio::test]
async fn test_search_timeout() {
    let retriever = Retriever::new(
        Arc::new(SlowIndex),
        params(10, 0.7),
        Some(Duration::from_millis(20)),
    );

    let err = retriever.search("q").await.unwrap_err();
    assert!(err.is_retrieval());
    assert!(err.to_string().contains("timed out"));
}

fn hyde_with(llm: Arc<ScriptedLlm>, index: Arc<RecordingIndex>) -> HypotheticalDocRetriever {
    HypotheticalDocRetriever::new(
        LlmCall::new("hyde", llm, "test-model", SamplingParams::new(0.7, 1500), None),
        Arc::new(PromptLibrary::builtin()),
        Retriever::new(index, params(10, 0.7), None),
    )
}

#[tokio::test]
async fn test_hyde_searches_hypothetical_answer() {
    let llm = Arc::new(ScriptedLlm::new().with(Site::Hyde, Reply::text("  学費は年間120万円です。 ")));
    let index = Arc::new(
        RecordingIndex::new().with_hits("学費は年間120万円です。", vec![passage("9", "学費一覧", 0.8)]),
    );

    let hits = hyde_with(llm.clone(), index.clone())
        .search_hyde("学費は?")
        .await
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(index.queries(), vec!["学費は年間120万円です。"]);

    let request = &llm.requests(Site::Hyde)[0];
    assert!(request.messages[0].content.contains("質問: 学費は?"));
    assert_eq!(request.temperature, Some(0.7));
}

#[tokio::test]
async fn test_hyde_blank_answer_searches_question() {
    let llm = Arc::new(ScriptedLlm::new().with(Site::Hyde, Reply::text("   ")));
    let index = Arc::new(RecordingIndex::new());

    hyde_with(llm, index.clone()).search_hyde("学費は?").await.unwrap();

    assert_eq!(index.queries(), vec!["学費は?"]);
}

#[tokio::test]
async fn test_hyde_generation_failure() {
    let llm = Arc::new(ScriptedLlm::new().with(Site::Hyde, Reply::Fail));
    let index = Arc::new(RecordingIndex::new());

    let err = hyde_with(llm, index.clone()).search_hyde("q").await.unwrap_err();

    assert!(err.is_retrieval());
    assert!(index.queries().is_empty());
}

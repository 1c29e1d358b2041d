//! Scripted collaborators for pipeline tests.

use crate::passage::Passage;
use crate::vector_index::{SearchParams, VectorIndex};
use async_trait::async_trait;
use faqbot_core::{AppError, AppResult};
use faqbot_llm::{LlmClient, LlmRequest, LlmResponse, LlmUsage, Role};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// What a scripted call-site does when invoked.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Fail,
    Hang,
}

impl Reply {
    pub fn text(text: &str) -> Self {
        Reply::Text(text.to_string())
    }
}

/// Call-sites the scripted model tells apart by their prompt text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Site {
    Classify,
    Rewrite,
    Hyde,
    Answer,
}

/// Language model answering each call-site from a script and recording requests.
pub struct ScriptedLlm {
    replies: HashMap<Site, Reply>,
    requests: Mutex<Vec<(Site, LlmRequest)>>,
}

impl ScriptedLlm {
    pub fn new() -> Self {
        let replies = [
            (Site::Classify, Reply::text("specific")),
            (Site::Rewrite, Reply::text("")),
            (Site::Hyde, Reply::text("仮の回答です。")),
            (Site::Answer, Reply::text("回答です。")),
        ]
        .into_iter()
        .collect();

        Self {
            replies,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with(mut self, site: Site, reply: Reply) -> Self {
        self.replies.insert(site, reply);
        self
    }

    pub fn requests(&self, site: Site) -> Vec<LlmRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| *s == site)
            .map(|(_, r)| r.clone())
            .collect()
    }

    pub fn calls(&self, site: Site) -> usize {
        self.requests(site).len()
    }

    fn site_of(request: &LlmRequest) -> Site {
        let user = request
            .messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        if request
            .system()
            .is_some_and(|s| s.contains("'general' or 'specific'"))
        {
            Site::Classify
        } else if user.contains("バリエーション") {
            Site::Rewrite
        } else if user.starts_with("以下の質問の回答を書いてください") {
            Site::Hyde
        } else {
            Site::Answer
        }
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        let site = Self::site_of(request);
        self.requests.lock().unwrap().push((site, request.clone()));

        match self.replies.get(&site).cloned().unwrap_or(Reply::Fail) {
            Reply::Text(content) => Ok(LlmResponse {
                content,
                model: request.model.clone(),
                usage: LlmUsage::default(),
                done: true,
            }),
            Reply::Fail => Err(AppError::Llm(format!("scripted failure at {:?}", site))),
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(AppError::Llm("woke up".to_string()))
            }
        }
    }
}

/// Vector index serving canned hits per query and recording every search.
#[derive(Default)]
pub struct RecordingIndex {
    hits: HashMap<String, Vec<Passage>>,
    fail_on: Option<String>,
    fail_all: bool,
    queries: Mutex<Vec<String>>,
}

impl RecordingIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hits(mut self, query: &str, hits: Vec<Passage>) -> Self {
        self.hits.insert(query.to_string(), hits);
        self
    }

    pub fn failing_on(mut self, query: &str) -> Self {
        self.fail_on = Some(query.to_string());
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_all = true;
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl VectorIndex for RecordingIndex {
    fn name(&self) -> &str {
        "recording"
    }

    async fn similarity_search(
        &self,
        query: &str,
        params: &SearchParams,
    ) -> AppResult<Vec<Passage>> {
        self.queries.lock().unwrap().push(query.to_string());

        if self.fail_all || self.fail_on.as_deref() == Some(query) {
            return Err(AppError::RetrievalUnavailable(
                "index unreachable".to_string(),
            ));
        }

        let mut hits: Vec<Passage> = self
            .hits
            .get(query)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|p| p.relevance_score >= params.score_threshold)
            .collect();
        hits.truncate(params.k as usize);
        Ok(hits)
    }
}

pub fn passage(id: &str, text: &str, score: f32) -> Passage {
    Passage::new(
        id,
        text,
        Some(format!("https://example.jp/pages/{}", id)),
        Some(score),
    )
    .unwrap()
}

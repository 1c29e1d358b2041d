//! Bounded language-model calls shared by every call-site.

use faqbot_core::config::SamplingParams;
use faqbot_core::{AppError, AppResult};
use faqbot_llm::{ChatMessage, LlmClient, LlmRequest};
use faqbot_prompt::BuiltPrompt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Await `fut`, failing with `on_timeout` once `limit` elapses.
pub(crate) async fn bounded<T, F>(
    limit: Option<Duration>,
    fut: F,
    on_timeout: impl FnOnce(Duration) -> AppError,
) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match limit {
        Some(limit) => match tokio::time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => Err(on_timeout(limit)),
        },
        None => fut.await,
    }
}

/// One language-model call-site: client, model, sampling and time bound.
#[derive(Clone)]
pub struct LlmCall {
    client: Arc<dyn LlmClient>,
    model: String,
    sampling: SamplingParams,
    timeout: Option<Duration>,
    label: &'static str,
}

impl LlmCall {
    pub fn new(
        label: &'static str,
        client: Arc<dyn LlmClient>,
        model: impl Into<String>,
        sampling: SamplingParams,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            sampling,
            timeout,
            label,
        }
    }

    /// Send `prompt` as a fresh single-turn request and return the reply text.
    ///
    /// Failures and timeouts are `AppError::Llm`; call-sites remap as needed.
    pub async fn complete(&self, prompt: &BuiltPrompt) -> AppResult<String> {
        let mut request = LlmRequest::new(vec![ChatMessage::user(&prompt.user)], &self.model)
            .with_sampling(self.sampling);
        if let Some(system) = &prompt.system {
            request = request.with_system(system);
        }

        tracing::debug!(
            "{} call via {} ({}, temperature={}, max_tokens={})",
            self.label,
            self.client.provider_name(),
            prompt.metadata.source_prompt_id,
            self.sampling.temperature,
            self.sampling.max_tokens
        );

        let label = self.label;
        let response = bounded(self.timeout, self.client.complete(&request), |limit| {
            AppError::Llm(format!("{} call timed out after {:?}", label, limit))
        })
        .await?;

        Ok(response.content)
    }
}

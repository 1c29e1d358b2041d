//! Collaborator construction from configuration.

use faqbot_core::config::{AppConfig, ProviderConfig, SamplingParams};
use faqbot_core::{AppError, AppResult};
use faqbot_knowledge::rag::LlmCall;
use faqbot_knowledge::{DatabricksVectorIndex, Pipeline, PipelineConfig, Retriever, SearchParams};
use faqbot_llm::{create_client, LlmClient};
use faqbot_prompt::PromptLibrary;
use std::sync::Arc;
use std::time::Duration;

/// Language-model client for the active provider.
pub fn llm_client(config: &AppConfig) -> AppResult<Arc<dyn LlmClient>> {
    let (endpoint, token, timeout) = match config.get_provider_config(&config.provider) {
        Some(ProviderConfig::Databricks {
            host_env,
            token_env,
            ..
        }) => (
            Some(AppConfig::resolve_secret(&host_env)?),
            Some(AppConfig::resolve_secret(&token_env)?),
            None,
        ),
        Some(ProviderConfig::Ollama {
            endpoint, timeout, ..
        }) => (Some(endpoint), None, timeout.map(Duration::from_secs)),
        // No provider block: Databricks shares the vector search workspace
        None if config.provider == "databricks" => (
            Some(AppConfig::resolve_secret(&config.vector_search.host_env)?),
            Some(AppConfig::resolve_secret(&config.vector_search.token_env)?),
            None,
        ),
        None => (None, None, None),
    };

    create_client(&config.provider, endpoint.as_deref(), token.as_deref(), timeout)
        .map_err(AppError::Config)
}

pub fn prompts(config: &AppConfig) -> AppResult<Arc<PromptLibrary>> {
    Ok(Arc::new(PromptLibrary::load(&config.workspace)?))
}

/// One call-site bound to the configured model.
pub fn llm_call(
    config: &AppConfig,
    label: &'static str,
    sampling: SamplingParams,
    timeout: Option<Duration>,
) -> AppResult<LlmCall> {
    Ok(LlmCall::new(
        label,
        llm_client(config)?,
        config.model.clone(),
        sampling,
        timeout,
    ))
}

pub fn retriever(config: &AppConfig, params: SearchParams) -> AppResult<Retriever> {
    let index = DatabricksVectorIndex::from_config(&config.vector_search, None)?;
    Ok(Retriever::new(
        Arc::new(index),
        params,
        config.timeouts.retrieval(),
    ))
}

pub fn pipeline(config: &AppConfig) -> AppResult<Pipeline> {
    config.validate()?;

    let index = DatabricksVectorIndex::from_config(&config.vector_search, None)?;
    Ok(Pipeline::new(
        llm_client(config)?,
        Arc::new(index),
        PromptLibrary::load(&config.workspace)?,
        PipelineConfig::from_app_config(config),
    ))
}

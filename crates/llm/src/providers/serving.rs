//! Databricks model serving provider.
//!
//! Chat model endpoints accept an OpenAI-style chat payload at
//! `{host}/serving-endpoints/{endpoint}/invocations`. The request's `model`
//! field names the endpoint.

use crate::client::{ChatMessage, LlmClient, LlmRequest, LlmResponse, LlmUsage};
use faqbot_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct InvocationRequest<'a> {
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct InvocationResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<LlmUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

/// Client for a Databricks model serving endpoint.
pub struct ServingEndpointClient {
    /// Workspace URL, without trailing slash
    host: String,

    /// Personal access token or service principal token
    token: String,

    /// HTTP client
    client: reqwest::Client,
}

impl ServingEndpointClient {
    /// Create a client for the workspace at `host`.
    pub fn new(host: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            host: normalize_host(host.into()),
            token: token.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Bound every HTTP exchange by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> AppResult<Self> {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Llm(format!("Failed to create HTTP client: {}", e)))?;
        Ok(self)
    }

    fn invocation_url(&self, endpoint: &str) -> String {
        format!("{}/serving-endpoints/{}/invocations", self.host, endpoint)
    }

    fn convert_response(
        &self,
        endpoint: &str,
        response: InvocationResponse,
    ) -> AppResult<LlmResponse> {
        let choice = response.choices.into_iter().next().ok_or_else(|| {
            AppError::Llm(format!("Serving endpoint '{}' returned no choices", endpoint))
        })?;

        Ok(LlmResponse {
            content: choice.message.content,
            model: response.model.unwrap_or_else(|| endpoint.to_string()),
            usage: response.usage.unwrap_or_default(),
            done: choice.finish_reason.as_deref() != Some("length"),
        })
    }
}

/// Strip the trailing slash and add a scheme when the host was given bare.
pub fn normalize_host(host: String) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

#[async_trait::async_trait]
impl LlmClient for ServingEndpointClient {
    fn provider_name(&self) -> &str {
        "databricks"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        let url = self.invocation_url(&request.model);
        tracing::debug!("Invoking serving endpoint '{}'", request.model);

        let body = InvocationRequest {
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            top_p: request.top_p,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::Llm(format!(
                    "Failed to reach serving endpoint '{}': {}",
                    request.model, e
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Llm(format!(
                "Serving endpoint error ({}): {}",
                status, error_text
            )));
        }

        let parsed: InvocationResponse = response.json().await.map_err(|e| {
            AppError::Llm(format!("Failed to parse serving endpoint response: {}", e))
        })?;

        let converted = self.convert_response(&request.model, parsed)?;
        tracing::debug!(
            "Serving endpoint '{}' used {} tokens",
            request.model,
            converted.usage.total_tokens
        );

        Ok(converted)
    }
}

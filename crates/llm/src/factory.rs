//! LLM provider factory.
//!
//! This module creates LLM clients from a provider name plus the endpoint
//! and credential the caller resolved from configuration.

use crate::client::LlmClient;
use crate::providers::{OllamaClient, ServingEndpointClient};
use crate::types::ProviderType;
use std::sync::Arc;
use std::time::Duration;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("databricks", "ollama")
/// * `endpoint` - Base URL: the workspace host for Databricks, the server for Ollama
/// * `api_key` - Access token (required for Databricks)
/// * `timeout` - Optional bound on each HTTP exchange
///
/// # Errors
/// Returns error if:
/// - Provider is unknown
/// - Required endpoint or token is missing
/// - The HTTP client cannot be built
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
    timeout: Option<Duration>,
) -> Result<Arc<dyn LlmClient>, String> {
    match ProviderType::parse(provider) {
        Some(ProviderType::Ollama) => {
            let base_url = endpoint.unwrap_or("http://localhost:11434");
            let mut client = OllamaClient::with_base_url(base_url);
            if let Some(timeout) = timeout {
                client = client.with_timeout(timeout).map_err(|e| e.to_string())?;
            }
            Ok(Arc::new(client))
        }
        Some(ProviderType::Databricks) => {
            let host = endpoint.ok_or("Databricks provider requires a workspace host")?;
            let token = api_key.ok_or("Databricks provider requires an access token")?;
            let mut client = ServingEndpointClient::new(host, token);
            if let Some(timeout) = timeout {
                client = client.with_timeout(timeout).map_err(|e| e.to_string())?;
            }
            Ok(Arc::new(client))
        }
        None => Err(format!("Unknown provider: {}", provider)),
    }
}

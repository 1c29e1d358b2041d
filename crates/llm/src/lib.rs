//! Language-model integration crate for the FAQ bot.
//!
//! This crate provides a provider-agnostic abstraction over chat-completion
//! services. The pipeline only ever sees `dyn LlmClient`; which provider sits
//! behind it is decided by configuration.
//!
//! # Providers
//! - **Databricks model serving**: chat endpoints in the workspace (default)
//! - **Ollama**: local LLM runtime for development
//!
//! # Example
//! ```no_run
//! use faqbot_llm::{LlmClient, LlmRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = LlmRequest::from_prompt("Hello, world!", "llama3.2");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{ChatMessage, LlmClient, LlmRequest, LlmResponse, LlmUsage, Role};
pub use factory::create_client;
pub use providers::{OllamaClient, ServingEndpointClient};
pub use types::ProviderType;

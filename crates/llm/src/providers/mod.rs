//! LLM provider implementations.

pub mod ollama;
pub mod serving;

pub use ollama::OllamaClient;
pub use serving::ServingEndpointClient;

//! Prompt system for the FAQ bot.
//!
//! This crate provides structured prompt management with:
//! - Built-in prompts for every pipeline call-site
//! - YAML overrides from the workspace
//! - Handlebars template rendering
//! - Answer template selection from the assembled context

pub mod builder;
pub mod library;
pub mod loader;
pub mod selector;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use library::{PromptLibrary, REFUSAL_MESSAGE};
pub use loader::{list_prompts, load_override, load_prompt};
pub use selector::select;
pub use types::{AssembledContext, BuiltPrompt, BuiltPromptMetadata, PromptChoice, PromptDefinition};

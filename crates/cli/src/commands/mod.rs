//! Command handlers for the FAQ bot CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod classify;
pub mod rewrite;
pub mod search;
mod setup;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use classify::ClassifyCommand;
pub use rewrite::RewriteCommand;
pub use search::SearchCommand;

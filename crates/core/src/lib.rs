//! FAQ bot core library
//!
//! This crate provides the foundational utilities shared by the other crates:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Layered configuration (defaults, YAML, environment, CLI flags)

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, QueryMode};
pub use error::{AppError, AppResult};

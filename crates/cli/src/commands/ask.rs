//! Ask command handler.
//!
//! Runs a question, or a whole conversation read from a file, through the
//! answering pipeline.

use super::setup;
use clap::Args;
use faqbot_core::{config::AppConfig, AppError, AppResult};
use faqbot_knowledge::Conversation;
use std::path::{Path, PathBuf};

/// Answer a question through the full pipeline
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: Option<String>,

    /// Read the conversation from a JSON file ({"messages": [{"role", "content"}]})
    #[arg(long, conflicts_with = "question")]
    pub messages: Option<PathBuf>,

    /// Print the answer with its trace as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");

        let conversation = self.conversation()?;
        let pipeline = setup::pipeline(config)?;
        let outcome = pipeline.run(&conversation).await?;

        tracing::debug!(
            "Answered request {} via {:?} prompt in states {:?}",
            outcome.request_id,
            outcome.prompt_choice,
            outcome.states
        );

        if self.json {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        } else {
            println!("{}", outcome.answer);
        }

        Ok(())
    }

    fn conversation(&self) -> AppResult<Conversation> {
        match (&self.question, &self.messages) {
            (_, Some(path)) => read_conversation(path),
            (Some(question), None) => Ok(Conversation::single(question.clone())),
            (None, None) => Err(AppError::Config(
                "No question provided. Pass a question or --messages <file>".to_string(),
            )),
        }
    }
}

fn read_conversation(path: &Path) -> AppResult<Conversation> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        AppError::Config(format!("Failed to read conversation {:?}: {}", path, e))
    })?;
    let conversation: Conversation = serde_json::from_str(&contents)?;

    if conversation.is_empty() {
        return Err(AppError::Config(format!(
            "Conversation file {:?} has no messages",
            path
        )));
    }
    Ok(conversation)
}

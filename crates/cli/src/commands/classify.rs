//! Classify command handler.

use super::setup;
use clap::Args;
use faqbot_core::{config::AppConfig, AppResult};
use faqbot_knowledge::rag::Classifier;

/// Classify a question as general or specific
#[derive(Args, Debug)]
pub struct ClassifyCommand {
    /// The question to classify
    pub question: String,
}

impl ClassifyCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing classify command");

        let call = setup::llm_call(
            config,
            "classification",
            config.sampling.classification,
            config.timeouts.classification(),
        )?;
        let classifier = Classifier::new(call, setup::prompts(config)?);

        let label = classifier.classify(&self.question).await?;
        println!("{}", label);

        Ok(())
    }
}

//! Rewrite command handler.

use super::setup;
use clap::Args;
use faqbot_core::{config::AppConfig, AppResult};
use faqbot_knowledge::rag::QueryRewriter;

/// Show the search variants generated for a question
#[derive(Args, Debug)]
pub struct RewriteCommand {
    /// The question to expand
    pub question: String,
}

impl RewriteCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing rewrite command");

        let call = setup::llm_call(
            config,
            "rewrite",
            config.sampling.rewrite,
            config.timeouts.rewrite(),
        )?;
        let rewriter = QueryRewriter::new(
            call,
            setup::prompts(config)?,
            config.retrieval.max_query_variants,
        );

        for query in rewriter.rewrite(&self.question).await.as_slice() {
            println!("{}", query);
        }

        Ok(())
    }
}

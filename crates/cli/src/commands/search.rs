//! Search command handler.

use super::setup;
use clap::Args;
use faqbot_core::{config::AppConfig, AppResult, QueryMode};
use faqbot_knowledge::SearchParams;

/// Maximum snippet length, in characters, for printed passages.
const MAX_SNIPPET_LENGTH: usize = 150;

/// Search the vector index without answering
#[derive(Args, Debug)]
pub struct SearchCommand {
    /// Query text
    pub query: String,

    /// Number of passages to retrieve
    #[arg(short = 'k', long)]
    pub top_k: Option<u32>,

    /// Minimum relevance score in [0, 1]
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Search mode (ann, hybrid)
    #[arg(long)]
    pub mode: Option<QueryMode>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing search command");

        let mut config = config.clone();
        if let Some(k) = self.top_k {
            config.retrieval.k = k;
        }
        if let Some(threshold) = self.threshold {
            config.retrieval.score_threshold = threshold;
        }
        if let Some(mode) = self.mode {
            config.retrieval.mode = mode;
        }
        config.validate_retrieval()?;

        let retriever = setup::retriever(&config, SearchParams::from(&config.retrieval))?;
        let passages = retriever.search(&self.query).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&passages)?);
            return Ok(());
        }

        if passages.is_empty() {
            println!("No passages scored at or above {}", config.retrieval.score_threshold);
            return Ok(());
        }

        for (i, passage) in passages.iter().enumerate() {
            println!(
                "{}. [{:.3}] {}",
                i + 1,
                passage.relevance_score,
                passage.snippet(MAX_SNIPPET_LENGTH)
            );
            if let Some(uri) = &passage.source_uri {
                println!("   {}", uri);
            }
        }

        Ok(())
    }
}

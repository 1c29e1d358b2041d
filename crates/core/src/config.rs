//! Configuration management for the FAQ bot.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Built-in defaults
//! - Config files (.faqbot/config.yaml)
//! - Environment variables
//! - Command-line flags
//!
//! Secrets (workspace host, access token) are never stored in the file; the
//! file names the environment variables that hold them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Providers the LLM factory knows how to build.
pub const KNOWN_PROVIDERS: [&str; 2] = ["databricks", "ollama"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .faqbot/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// LLM provider ("databricks", "ollama")
    pub provider: String,

    /// Model identifier; the serving endpoint name for Databricks
    pub model: String,

    /// Log level override
    pub log_level: Option<String>,

    /// Log output format
    pub log_format: LogFormat,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// LLM provider configurations
    pub llm: Option<LlmConfig>,

    /// Vector search index location
    pub vector_search: VectorSearchConfig,

    /// Similarity search parameters
    pub retrieval: RetrievalConfig,

    /// Sampling parameters per call-site
    pub sampling: SamplingConfig,

    /// Timeouts per call-site
    pub timeouts: TimeoutConfig,
}

/// LLM configuration from config.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(rename = "activeProvider")]
    pub active_provider: String,

    pub providers: HashMap<String, ProviderConfig>,
}

/// Provider-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderConfig {
    Databricks {
        #[serde(rename = "hostEnv", default = "default_host_env")]
        host_env: String,
        #[serde(rename = "tokenEnv", default = "default_token_env")]
        token_env: String,
        #[serde(rename = "endpointName")]
        endpoint_name: String,
    },
    Ollama {
        endpoint: String,
        model: String,
        timeout: Option<u64>,
    },
}

fn default_host_env() -> String {
    "DATABRICKS_HOST".to_string()
}

fn default_token_env() -> String {
    "DATABRICKS_TOKEN".to_string()
}

/// Similarity search mode understood by the vector index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum QueryMode {
    /// Approximate nearest neighbour over embeddings only
    #[serde(alias = "ann")]
    Ann,

    /// Embedding search combined with keyword search
    #[serde(alias = "hybrid")]
    #[default]
    Hybrid,
}

impl QueryMode {
    /// Wire name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryMode::Ann => "ANN",
            QueryMode::Hybrid => "HYBRID",
        }
    }
}

impl FromStr for QueryMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ANN" => Ok(QueryMode::Ann),
            "HYBRID" => Ok(QueryMode::Hybrid),
            other => Err(AppError::Config(format!(
                "Unknown query mode: {}. Supported: ANN, HYBRID",
                other
            ))),
        }
    }
}

impl std::fmt::Display for QueryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the vector search index lives and how its columns are named.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VectorSearchConfig {
    /// Environment variable holding the workspace URL
    pub host_env: String,

    /// Environment variable holding the access token
    pub token_env: String,

    /// Vector search endpoint name
    pub endpoint_name: Option<String>,

    /// Fully qualified index name (catalog.schema.table_vs_index)
    pub index_name: Option<String>,

    /// Column holding the passage text
    pub text_column: String,

    /// Primary key column
    pub id_column: String,

    /// Column holding the source document URI
    pub uri_column: String,
}

impl Default for VectorSearchConfig {
    fn default() -> Self {
        Self {
            host_env: default_host_env(),
            token_env: default_token_env(),
            endpoint_name: None,
            index_name: None,
            text_column: "content".to_string(),
            id_column: "id".to_string(),
            uri_column: "url".to_string(),
        }
    }
}

/// Similarity search parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetrievalConfig {
    /// Number of results requested per query
    pub k: u32,

    /// Minimum relevance score in [0, 1]
    pub score_threshold: f32,

    /// Search mode
    pub mode: QueryMode,

    /// Upper bound on rewritten variants searched besides the original question
    pub max_query_variants: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            k: 10,
            score_threshold: 0.7,
            mode: QueryMode::Hybrid,
            max_query_variants: 7,
        }
    }
}

/// Temperature and output cap for one language-model call-site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl SamplingParams {
    pub const fn new(temperature: f32, max_tokens: u32) -> Self {
        Self {
            temperature,
            max_tokens,
        }
    }
}

/// Sampling parameters for every call-site.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SamplingConfig {
    /// Near-zero temperature, a handful of tokens
    pub classification: SamplingParams,
    pub rewrite: SamplingParams,
    pub hyde: SamplingParams,
    /// The user-facing answer
    pub generation: SamplingParams,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            classification: SamplingParams::new(0.0, 5),
            rewrite: SamplingParams::new(0.3, 500),
            hyde: SamplingParams::new(0.7, 1500),
            generation: SamplingParams::new(0.7, 1500),
        }
    }
}

/// Per call-site timeouts in seconds. `null` in YAML disables a bound.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeoutConfig {
    pub classification_secs: Option<u64>,
    pub rewrite_secs: Option<u64>,
    pub retrieval_secs: Option<u64>,
    pub hyde_secs: Option<u64>,
    pub generation_secs: Option<u64>,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            classification_secs: Some(30),
            rewrite_secs: Some(30),
            retrieval_secs: Some(30),
            hyde_secs: Some(60),
            generation_secs: Some(120),
        }
    }
}

impl TimeoutConfig {
    pub fn classification(&self) -> Option<Duration> {
        self.classification_secs.map(Duration::from_secs)
    }

    pub fn rewrite(&self) -> Option<Duration> {
        self.rewrite_secs.map(Duration::from_secs)
    }

    pub fn retrieval(&self) -> Option<Duration> {
        self.retrieval_secs.map(Duration::from_secs)
    }

    pub fn hyde(&self) -> Option<Duration> {
        self.hyde_secs.map(Duration::from_secs)
    }

    pub fn generation(&self) -> Option<Duration> {
        self.generation_secs.map(Duration::from_secs)
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Full configuration file structure.
///
/// The flat `*_name` keys accept the `rag_chain_config.yaml` layout written by
/// the indexing notebooks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    llm: Option<LlmConfig>,
    workspace: Option<WorkspaceConfig>,
    logging: Option<LoggingConfig>,
    vector_search: Option<VectorSearchConfig>,
    retrieval: Option<RetrievalConfig>,
    sampling: Option<SamplingConfig>,
    timeouts: Option<TimeoutConfig>,
    #[serde(rename = "vector_search_endpoint_name")]
    vector_search_endpoint_name: Option<String>,
    #[serde(rename = "vector_search_index_name")]
    vector_search_index_name: Option<String>,
    #[serde(rename = "llm_endpoint_name")]
    llm_endpoint_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkspaceConfig {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
    format: Option<LogFormat>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: "databricks".to_string(),
            model: "databricks-meta-llama-3-3-70b-instruct".to_string(),
            log_level: None,
            log_format: LogFormat::Text,
            verbose: false,
            no_color: false,
            llm: None,
            vector_search: VectorSearchConfig::default(),
            retrieval: RetrievalConfig::default(),
            sampling: SamplingConfig::default(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the YAML file, and environment variables.
    ///
    /// Environment variables:
    /// - `FAQBOT_WORKSPACE`: Override workspace path
    /// - `FAQBOT_CONFIG`: Path to config file
    /// - `FAQBOT_PROVIDER`: LLM provider
    /// - `FAQBOT_MODEL`: Model or serving endpoint identifier
    /// - `FAQBOT_VS_ENDPOINT`: Vector search endpoint name
    /// - `FAQBOT_VS_INDEX`: Vector search index name
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use faqbot_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Index: {:?}", config.vector_search.index_name);
    /// ```
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(workspace) = std::env::var("FAQBOT_WORKSPACE") {
            config.workspace = PathBuf::from(workspace);
        }

        if let Ok(config_file) = std::env::var("FAQBOT_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| config.faqbot_dir().join("config.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("FAQBOT_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("FAQBOT_MODEL") {
            config.model = model;
        }

        if let Ok(endpoint) = std::env::var("FAQBOT_VS_ENDPOINT") {
            config.vector_search.endpoint_name = Some(endpoint);
        }

        if let Ok(index) = std::env::var("FAQBOT_VS_INDEX") {
            config.vector_search.index_name = Some(index);
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    pub fn merge_yaml(&self, path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        self.merge_yaml_str(&contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config file {:?}: {}", path, e)))
    }

    fn merge_yaml_str(&self, contents: &str) -> Result<Self, serde_yaml::Error> {
        let config_file: ConfigFile = serde_yaml::from_str(contents)?;

        let mut result = self.clone();

        if let Some(path) = config_file.workspace.and_then(|ws| ws.path) {
            result.workspace = PathBuf::from(path);
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
            if let Some(format) = logging.format {
                result.log_format = format;
            }
        }

        if let Some(llm) = config_file.llm {
            result.provider = llm.active_provider.clone();

            if let Some(provider_config) = llm.providers.get(&llm.active_provider) {
                result.model = match provider_config {
                    ProviderConfig::Databricks { endpoint_name, .. } => endpoint_name.clone(),
                    ProviderConfig::Ollama { model, .. } => model.clone(),
                };
            }

            result.llm = Some(llm);
        }

        if let Some(vector_search) = config_file.vector_search {
            result.vector_search = vector_search;
        }

        if let Some(retrieval) = config_file.retrieval {
            result.retrieval = retrieval;
        }

        if let Some(sampling) = config_file.sampling {
            result.sampling = sampling;
        }

        if let Some(timeouts) = config_file.timeouts {
            result.timeouts = timeouts;
        }

        if let Some(endpoint) = config_file.vector_search_endpoint_name {
            result.vector_search.endpoint_name = Some(endpoint);
        }

        if let Some(index) = config_file.vector_search_index_name {
            result.vector_search.index_name = Some(index);
        }

        if let Some(endpoint) = config_file.llm_endpoint_name {
            result.model = endpoint;
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the file.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .faqbot directory.
    pub fn faqbot_dir(&self) -> PathBuf {
        self.workspace.join(".faqbot")
    }

    /// Get the configuration for a provider, if the file declared one.
    pub fn get_provider_config(&self, provider: &str) -> Option<ProviderConfig> {
        self.llm
            .as_ref()
            .and_then(|llm| llm.providers.get(provider).cloned())
    }

    /// Read a required secret from the named environment variable.
    pub fn resolve_secret(env_var: &str) -> AppResult<String> {
        std::env::var(env_var).map_err(|_| {
            AppError::Config(format!(
                "Required environment variable is not set: {}",
                env_var
            ))
        })
    }

    /// Validate configuration for the active provider and the vector index.
    pub fn validate(&self) -> AppResult<()> {
        let provider = &self.provider;

        if !KNOWN_PROVIDERS.contains(&provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        self.validate_retrieval()?;

        if self.vector_search.endpoint_name.is_none() {
            return Err(AppError::Config(
                "Vector search endpoint name is not configured".to_string(),
            ));
        }

        if self.vector_search.index_name.is_none() {
            return Err(AppError::Config(
                "Vector search index name is not configured".to_string(),
            ));
        }

        Self::resolve_secret(&self.vector_search.host_env)?;
        Self::resolve_secret(&self.vector_search.token_env)?;

        if let Some(ProviderConfig::Databricks {
            host_env,
            token_env,
            ..
        }) = self.get_provider_config(provider)
        {
            Self::resolve_secret(&host_env)?;
            Self::resolve_secret(&token_env)?;
        }

        Ok(())
    }

    /// Validate the numeric retrieval parameters.
    pub fn validate_retrieval(&self) -> AppResult<()> {
        let threshold = self.retrieval.score_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(AppError::Config(format!(
                "Score threshold must be within [0, 1], got {}",
                threshold
            )));
        }

        if self.retrieval.k == 0 {
            return Err(AppError::Config(
                "Result count k must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

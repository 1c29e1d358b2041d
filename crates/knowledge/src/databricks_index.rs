//! Databricks Vector Search index implementation.
//!
//! Queries go to `POST {host}/api/2.0/vector-search/indexes/{index}/query`.
//! The response carries a column manifest and a row-major `data_array`; the
//! service appends a `score` column after the requested ones.

use crate::passage::Passage;
use crate::vector_index::{SearchParams, VectorIndex};
use async_trait::async_trait;
use faqbot_core::config::VectorSearchConfig;
use faqbot_core::{AppConfig, AppError, AppResult};
use faqbot_llm::providers::serving::normalize_host;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

const SCORE_COLUMN: &str = "score";

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query_text: &'a str,
    columns: Vec<&'a str>,
    num_results: u32,
    query_type: &'a str,
    score_threshold: f32,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    manifest: Option<Manifest>,
    #[serde(default)]
    result: Option<ResultData>,
}

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    columns: Vec<Column>,
}

#[derive(Debug, Deserialize)]
struct Column {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ResultData {
    #[serde(default)]
    data_array: Vec<Vec<Value>>,
}

/// Names of the index columns holding passage fields.
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    pub id: String,
    pub text: String,
    pub uri: String,
}

impl From<&VectorSearchConfig> for ColumnMapping {
    fn from(config: &VectorSearchConfig) -> Self {
        Self {
            id: config.id_column.clone(),
            text: config.text_column.clone(),
            uri: config.uri_column.clone(),
        }
    }
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self::from(&VectorSearchConfig::default())
    }
}

/// Read-only client for one Databricks Vector Search index.
pub struct DatabricksVectorIndex {
    /// Workspace URL, without trailing slash
    host: String,

    token: String,

    /// Fully qualified index name (`catalog.schema.index`)
    index_name: String,

    columns: ColumnMapping,

    client: reqwest::Client,
}

impl DatabricksVectorIndex {
    pub fn new(
        host: impl Into<String>,
        token: impl Into<String>,
        index_name: impl Into<String>,
    ) -> Self {
        Self {
            host: normalize_host(host.into()),
            token: token.into(),
            index_name: index_name.into(),
            columns: ColumnMapping::default(),
            client: reqwest::Client::new(),
        }
    }

    /// Build the client from configuration, reading host and token from the
    /// environment variables it names.
    pub fn from_config(config: &VectorSearchConfig, timeout: Option<Duration>) -> AppResult<Self> {
        let index_name = config.index_name.clone().ok_or_else(|| {
            AppError::Config("vectorSearch.indexName is not configured".to_string())
        })?;
        let host = AppConfig::resolve_secret(&config.host_env)?;
        let token = AppConfig::resolve_secret(&config.token_env)?;

        if let Some(endpoint) = &config.endpoint_name {
            tracing::debug!("Using index '{}' on endpoint '{}'", index_name, endpoint);
        }

        let index = Self::new(host, token, index_name).with_columns(ColumnMapping::from(config));
        match timeout {
            Some(timeout) => index.with_timeout(timeout),
            None => Ok(index),
        }
    }

    pub fn with_columns(mut self, columns: ColumnMapping) -> Self {
        self.columns = columns;
        self
    }

    /// Bound every HTTP exchange by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> AppResult<Self> {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Knowledge(format!("Failed to create HTTP client: {}", e)))?;
        Ok(self)
    }

    fn query_url(&self) -> String {
        format!(
            "{}/api/2.0/vector-search/indexes/{}/query",
            self.host, self.index_name
        )
    }

    fn request_body<'a>(&'a self, query: &'a str, params: &'a SearchParams) -> QueryRequest<'a> {
        QueryRequest {
            query_text: query,
            columns: vec![&self.columns.id, &self.columns.text, &self.columns.uri],
            num_results: params.k,
            query_type: params.mode.as_str(),
            score_threshold: params.score_threshold,
        }
    }

    /// Turn the row-major response into passages, applying the k and threshold bounds.
    fn convert_response(
        &self,
        response: QueryResponse,
        params: &SearchParams,
    ) -> AppResult<Vec<Passage>> {
        let columns = response.manifest.map(|m| m.columns).unwrap_or_default();
        let rows = response.result.map(|r| r.data_array).unwrap_or_default();

        let position = |name: &str| columns.iter().position(|c| c.name == name);
        let text_idx = position(&self.columns.text).ok_or_else(|| {
            AppError::RetrievalUnavailable(format!(
                "Index '{}' response has no '{}' column",
                self.index_name, self.columns.text
            ))
        })?;
        let id_idx = position(&self.columns.id);
        let uri_idx = position(&self.columns.uri);
        let score_idx = position(SCORE_COLUMN);

        let mut passages = Vec::with_capacity(rows.len());
        for (row_number, row) in rows.iter().enumerate() {
            let cell = |idx: Option<usize>| idx.and_then(|i| row.get(i));

            let text = cell(Some(text_idx)).and_then(value_to_string).unwrap_or_default();
            let id = cell(id_idx)
                .and_then(value_to_string)
                .unwrap_or_else(|| row_number.to_string());
            let source_uri = cell(uri_idx).and_then(value_to_string);
            let score = cell(score_idx).and_then(Value::as_f64).map(|s| s as f32);

            let passage = Passage::new(id, text, source_uri, score)?;
            if passage.relevance_score >= params.score_threshold {
                passages.push(passage);
            }
        }

        passages.truncate(params.k as usize);
        Ok(passages)
    }
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl VectorIndex for DatabricksVectorIndex {
    fn name(&self) -> &str {
        &self.index_name
    }

    async fn similarity_search(
        &self,
        query: &str,
        params: &SearchParams,
    ) -> AppResult<Vec<Passage>> {
        tracing::debug!(
            "Querying index '{}' (k={}, threshold={}, mode={})",
            self.index_name,
            params.k,
            params.score_threshold,
            params.mode
        );

        let response = self
            .client
            .post(self.query_url())
            .bearer_auth(&self.token)
            .json(&self.request_body(query, params))
            .send()
            .await
            .map_err(|e| {
                AppError::RetrievalUnavailable(format!(
                    "Failed to reach index '{}': {}",
                    self.index_name, e
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::RetrievalUnavailable(format!(
                "Vector search error ({}): {}",
                status, error_text
            )));
        }

        let parsed: QueryResponse = response.json().await.map_err(|e| {
            AppError::RetrievalUnavailable(format!("Failed to parse vector search response: {}", e))
        })?;

        let passages = self.convert_response(parsed, params)?;
        tracing::debug!(
            "Index '{}' returned {} passages",
            self.index_name,
            passages.len()
        );
        Ok(passages)
    }
}

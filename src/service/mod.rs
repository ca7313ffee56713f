//! Analysis workflow: cache first, remote API on a miss, write-through.

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};
use url::Url;
use utoipa::ToSchema;

use crate::cache::AnalysisCache;
use crate::detector::{PageClassification, classify_page};
use crate::entities::{AnalysisResult, RecentAnalysis};
use crate::fetcher::{AnalysisClient, FetchError, fetch_page};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Where an analysis came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Cache,
    Remote,
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub result: AnalysisResult,
    pub source: Source,
    /// Set when the result could not be stored durably.
    pub degraded: Option<String>,
}

pub struct AnalyzerService {
    client: AnalysisClient,
    cache: Arc<AnalysisCache>,
    default_model_type: String,
}

impl AnalyzerService {
    pub fn new(
        client: AnalysisClient,
        cache: Arc<AnalysisCache>,
        default_model_type: impl Into<String>,
    ) -> Self {
        Self {
            client,
            cache,
            default_model_type: default_model_type.into(),
        }
    }

    pub fn cache(&self) -> &Arc<AnalysisCache> {
        &self.cache
    }

    pub fn default_model_type(&self) -> &str {
        &self.default_model_type
    }

    /// Returns the cached analysis unless `force` is set or there is none,
    /// in which case the remote API is asked and the answer cached.
    #[instrument(skip(self))]
    pub async fn analyze(
        &self,
        url: &str,
        model_type: Option<&str>,
        force: bool,
    ) -> Result<Analysis, ServiceError> {
        let url = validate_url(url)?;

        if !force && let Some(result) = self.cache.get(url).await {
            return Ok(Analysis {
                result,
                source: Source::Cache,
                degraded: None,
            });
        }

        let model_type = model_type
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(&self.default_model_type);

        let result = self.client.analyze(url, model_type).await?;
        let outcome = self.cache.put(url, result.clone()).await;

        if let Some(reason) = outcome.degraded_reason() {
            warn!(%reason, "analysis cached in memory only");
        }
        info!(source = "remote", "analysis ready");

        Ok(Analysis {
            result,
            source: Source::Remote,
            degraded: outcome.degraded_reason().map(str::to_string),
        })
    }

    pub async fn cached(&self, url: &str) -> Result<Option<AnalysisResult>, ServiceError> {
        let url = validate_url(url)?;
        Ok(self.cache.get(url).await)
    }

    pub async fn recent(&self) -> Vec<RecentAnalysis> {
        self.cache.get_recent_analyses().await
    }

    #[instrument(skip(self))]
    pub async fn by_hash(&self, hash: &str) -> Result<AnalysisResult, ServiceError> {
        let hash = hash.trim();
        if hash.is_empty() {
            return Err(ServiceError::InvalidInput("hash must not be empty".into()));
        }
        Ok(self.client.fetch_by_hash(hash).await?)
    }

    pub fn report_url(&self, hash: &str) -> String {
        self.client.report_url(hash)
    }

    /// Downloads the page at `url` and classifies it.
    #[instrument(skip(self))]
    pub async fn inspect(&self, url: &str) -> Result<PageClassification, ServiceError> {
        let url = validate_url(url)?;
        let page = fetch_page(url).await?;
        Ok(classify_page(&page.url_final, &page.body_utf8))
    }
}

/// Trims `url` and requires an absolute http(s) URL.
fn validate_url(url: &str) -> Result<&str, ServiceError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ServiceError::InvalidUrl("url must not be empty".into()));
    }

    let parsed = Url::parse(url).map_err(|e| ServiceError::InvalidUrl(format!("{url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ServiceError::InvalidUrl(format!(
            "unsupported scheme {scheme}"
        ))),
    }
}

pub mod scale;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Normalized outcome of analyzing one URL.
///
/// Constructed once by the fetcher and never mutated afterwards; a
/// re-analysis of the same URL produces a new value that replaces the
/// cached one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub url: String,
    pub fetched_at: DateTime<Utc>,
    pub title: String,
    pub publication: String,
    /// 0..=100
    pub reliability_score: f64,
    /// -5.0..=5.0, negative leans critical of the establishment.
    pub bias_score: f64,
    pub summary: String,
    pub hash: Option<String>,
    pub warnings: Vec<Warning>,
}

/// Non-fatal caveat attached to an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Warning {
    #[schema(value_type = String)]
    pub kind: WarningKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WarningKind {
    ContentBlocked,
    ArchivedContent,
    LimitedContent,
    Other(String),
}

impl WarningKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::ContentBlocked => "content_blocked",
            Self::ArchivedContent => "archived_content",
            Self::LimitedContent => "limited_content",
            Self::Other(kind) => kind,
        }
    }
}

impl From<String> for WarningKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "content_blocked" => Self::ContentBlocked,
            "archived_content" => Self::ArchivedContent,
            "limited_content" => Self::LimitedContent,
            _ => Self::Other(kind),
        }
    }
}

impl From<WarningKind> for String {
    fn from(kind: WarningKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Lightweight entry of the recent analyses list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentAnalysis {
    pub url: String,
    pub title: String,
    pub publication: String,
    pub reliability_score: f64,
    pub bias_score: f64,
    pub fetched_at: DateTime<Utc>,
    pub hash: Option<String>,
}

impl RecentAnalysis {
    pub fn summarize(result: &AnalysisResult, fetched_at: DateTime<Utc>) -> Self {
        Self {
            url: result.url.clone(),
            title: result.title.clone(),
            publication: result.publication.clone(),
            reliability_score: result.reliability_score,
            bias_score: result.bias_score,
            fetched_at,
            hash: result.hash.clone(),
        }
    }
}

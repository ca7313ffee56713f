use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use utoipa::{IntoParams, ToSchema};

use crate::entities::{
    AnalysisResult,
    scale::{BiasBand, ReliabilityBand, format_bias},
};
use crate::service::{Analysis, Source};

const MAX_URL_LEN: usize = 2048;

static MODEL_TYPE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.-]{1,64}$").expect("Failed to compile model type regex")
});

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub url: String,
    #[serde(default)]
    pub model_type: Option<String>,
    /// Skip the cache and ask the API again.
    #[serde(default)]
    pub force: bool,
}

impl AnalyzeRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_url_field(&self.url)?;
        if let Some(model_type) = &self.model_type
            && !MODEL_TYPE_REGEX.is_match(model_type)
        {
            return Err("Invalid model type".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct InspectRequest {
    pub url: String,
}

impl InspectRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_url_field(&self.url)
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AnalysisQuery {
    /// Page URL exactly as it was analyzed.
    pub url: String,
}

fn validate_url_field(url: &str) -> Result<(), String> {
    if url.trim().is_empty() {
        return Err("URL is required".to_string());
    }
    if url.len() > MAX_URL_LEN {
        return Err("URL too long".to_string());
    }
    Ok(())
}

/// An analysis plus its display labels.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisView {
    #[serde(flatten)]
    pub result: AnalysisResult,
    pub reliability_label: String,
    pub bias_label: String,
    /// Bias with one decimal and explicit sign.
    pub bias_display: String,
    pub report_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    /// Why the result was not stored durably, if it was not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded: Option<String>,
}

impl AnalysisView {
    pub fn new(result: AnalysisResult, report_url: Option<String>) -> Self {
        Self {
            reliability_label: ReliabilityBand::from_score(result.reliability_score)
                .label()
                .to_string(),
            bias_label: BiasBand::from_score(result.bias_score).label().to_string(),
            bias_display: format_bias(result.bias_score),
            report_url,
            source: None,
            degraded: None,
            result,
        }
    }

    pub fn from_analysis(analysis: Analysis, report_url: Option<String>) -> Self {
        Self {
            source: Some(analysis.source),
            degraded: analysis.degraded,
            ..Self::new(analysis.result, report_url)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

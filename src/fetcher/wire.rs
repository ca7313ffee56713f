//! Response bodies of the remote analysis API.
//!
//! The service has shipped more than one shape for the same payload:
//! scores arrive either as bare numbers or as objects carrying `value` or
//! `score`. Everything here is lenient and collapses into
//! [`AnalysisResult`] before leaving the fetcher.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::{
    AnalysisResult, Warning,
    scale::{clamp_bias, clamp_reliability},
};
use crate::fetcher::errors::FetchError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeBody<'a> {
    pub url: &'a str,
    pub model_type: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawAnalysis {
    #[serde(default)]
    pub scores: Option<RawScores>,
    #[serde(default)]
    pub meta: Option<RawMeta>,
    #[serde(default)]
    pub human_summary: Option<String>,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub warnings: Option<Vec<RawWarning>>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawScores {
    #[serde(default)]
    pub reliability: Option<ScoreValue>,
    #[serde(default)]
    pub political_establishment_bias: Option<ScoreValue>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawMeta {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub publication: Option<String>,
    #[serde(default)]
    pub original_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawWarning {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A score as the API sends it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScoreValue {
    Number(f64),
    Wrapped {
        #[serde(default)]
        value: Option<Box<ScoreValue>>,
        #[serde(default)]
        score: Option<Box<ScoreValue>>,
    },
    Other(Value),
}

impl ScoreValue {
    /// `value` wins over `score` unless it is zero or unusable.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Wrapped { value, score } => value
                .as_deref()
                .and_then(Self::as_f64)
                .filter(|v| *v != 0.0)
                .or_else(|| score.as_deref().and_then(Self::as_f64))
                .or_else(|| value.as_deref().and_then(Self::as_f64)),
            Self::Other(Value::String(s)) => s.trim().parse().ok(),
            Self::Other(_) => None,
        }
    }
}

/// Body of a non-success response.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl RawAnalysis {
    /// Parses a success body. Anything that is not a JSON object with
    /// `scores` or `meta` is rejected.
    pub fn parse(body: &[u8]) -> Result<Self, FetchError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| FetchError::InvalidResponse(format!("body is not JSON: {e}")))?;

        let raw: RawAnalysis = serde_json::from_value(value)
            .map_err(|e| FetchError::InvalidResponse(e.to_string()))?;

        if raw.scores.is_none() && raw.meta.is_none() {
            return Err(FetchError::InvalidResponse(
                raw.error
                    .unwrap_or_else(|| "invalid API response structure".to_string()),
            ));
        }

        Ok(raw)
    }

    /// `url` is used when the body does not name the analyzed page.
    pub fn into_result(self, url: Option<&str>, fetched_at: DateTime<Utc>) -> AnalysisResult {
        let scores = self.scores.unwrap_or_default();
        let meta = self.meta.unwrap_or_default();

        let reliability = scores
            .reliability
            .as_ref()
            .and_then(ScoreValue::as_f64)
            .unwrap_or(0.0);
        let bias = scores
            .political_establishment_bias
            .as_ref()
            .and_then(ScoreValue::as_f64)
            .unwrap_or(0.0);

        let url = url
            .map(str::to_string)
            .or(meta.original_url)
            .unwrap_or_default();

        let warnings = self
            .warnings
            .unwrap_or_default()
            .into_iter()
            .map(|w| Warning {
                kind: w.kind.unwrap_or_default().into(),
                message: w.message.unwrap_or_default(),
            })
            .collect();

        AnalysisResult {
            url,
            fetched_at,
            title: meta.title.unwrap_or_default(),
            publication: meta.publication.unwrap_or_default(),
            reliability_score: clamp_reliability(reliability),
            bias_score: clamp_bias(bias),
            summary: self.human_summary.unwrap_or_default(),
            hash: self.hash.filter(|h| !h.is_empty()),
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::WarningKind;
    use serde_json::json;

    fn parse(value: Value) -> Result<RawAnalysis, FetchError> {
        RawAnalysis::parse(value.to_string().as_bytes())
    }

    fn score(value: Value) -> Option<f64> {
        serde_json::from_value::<ScoreValue>(value).unwrap().as_f64()
    }

    #[test]
    fn test_score_shapes_collapse() {
        assert_eq!(score(json!(72)), Some(72.0));
        assert_eq!(score(json!({"value": 72})), Some(72.0));
        assert_eq!(score(json!({"score": 72})), Some(72.0));
        assert_eq!(score(json!({"value": 0, "score": 64})), Some(64.0));
        assert_eq!(score(json!({"value": {"score": 3.5}})), Some(3.5));
        assert_eq!(score(json!("41.5")), Some(41.5));
        assert_eq!(score(json!({})), None);
        assert_eq!(score(json!(true)), None);
    }

    #[test]
    fn test_number_and_object_shapes_normalize_identically() {
        let t = Utc::now();
        let flat = parse(json!({
            "scores": {"reliability": 72, "political_establishment_bias": -1.5},
            "meta": {"title": "T", "publication": "P"}
        }))
        .unwrap()
        .into_result(Some("https://oxu.az/a"), t);
        let nested = parse(json!({
            "scores": {
                "reliability": {"value": 72},
                "political_establishment_bias": {"score": -1.5}
            },
            "meta": {"title": "T", "publication": "P"}
        }))
        .unwrap()
        .into_result(Some("https://oxu.az/a"), t);

        assert_eq!(flat, nested);
        assert_eq!(flat.reliability_score, 72.0);
        assert_eq!(flat.bias_score, -1.5);
    }

    #[test]
    fn test_scores_are_clamped() {
        let result = parse(json!({
            "scores": {"reliability": 140, "political_establishment_bias": -9}
        }))
        .unwrap()
        .into_result(Some("https://oxu.az/a"), Utc::now());

        assert_eq!(result.reliability_score, 100.0);
        assert_eq!(result.bias_score, -5.0);
    }

    #[test]
    fn test_missing_fields_default() {
        let result = parse(json!({"meta": {}}))
            .unwrap()
            .into_result(Some("https://oxu.az/a"), Utc::now());

        assert_eq!(result.url, "https://oxu.az/a");
        assert_eq!(result.title, "");
        assert_eq!(result.publication, "");
        assert_eq!(result.reliability_score, 0.0);
        assert_eq!(result.bias_score, 0.0);
        assert!(result.hash.is_none());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_full_body() {
        let result = parse(json!({
            "hash": "f3a9c1",
            "human_summary": "Mostly factual.",
            "meta": {
                "title": "Parlament yeni qanun layihəsini qəbul etdi",
                "publication": "Oxu.az",
                "original_url": "https://oxu.az/politics/1"
            },
            "scores": {"reliability": {"value": 81}, "political_establishment_bias": 2.4},
            "warnings": [
                {"type": "archived_content", "message": "From archive"},
                {"type": "paywall"}
            ]
        }))
        .unwrap()
        .into_result(None, Utc::now());

        assert_eq!(result.url, "https://oxu.az/politics/1");
        assert_eq!(result.hash.as_deref(), Some("f3a9c1"));
        assert_eq!(result.summary, "Mostly factual.");
        assert_eq!(result.warnings.len(), 2);
        assert_eq!(result.warnings[0].kind, WarningKind::ArchivedContent);
        assert_eq!(result.warnings[1].kind, WarningKind::Other("paywall".into()));
        assert_eq!(result.warnings[1].message, "");
    }

    #[test]
    fn test_rejects_body_without_scores_or_meta() {
        let err = parse(json!({"error": "Could not extract article"})).unwrap_err();
        assert!(
            matches!(err, FetchError::InvalidResponse(ref m) if m == "Could not extract article")
        );

        let err = parse(json!({"hash": "x"})).unwrap_err();
        assert!(
            matches!(err, FetchError::InvalidResponse(ref m) if m == "invalid API response structure")
        );

        assert!(RawAnalysis::parse(b"<html>").is_err());
        assert!(parse(json!("not an analysis")).is_err());
    }
}

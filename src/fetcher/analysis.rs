use bytes::Bytes;
use chrono::Utc;
use percent_encoding::{percent_decode_str, utf8_percent_encode};
use reqwest::{Client, ClientBuilder, StatusCode};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::cache::key::COMPONENT;
use crate::entities::AnalysisResult;
use crate::fetcher::{
    client::USER_AGENT,
    errors::FetchError,
    wire::{AnalyzeBody, ErrorBody, RawAnalysis},
};

pub const DEFAULT_MODEL_TYPE: &str = "auto";

/// Client for the remote analysis API.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    http: Client,
    base: Url,
}

impl AnalysisClient {
    /// `base_url` is the service root, e.g. `https://lnk.az`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = ClientBuilder::new()
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Requests a fresh analysis of `url`.
    ///
    /// The returned result carries `url` exactly as given; the API receives
    /// its percent-decoded form.
    #[instrument(skip_all, fields(url = %url, model_type = %model_type))]
    pub async fn analyze(&self, url: &str, model_type: &str) -> Result<AnalysisResult, FetchError> {
        let target = percent_decode_str(url).decode_utf8_lossy();
        let endpoint = self.base.join("api/analyze")?;

        let response = self
            .http
            .post(endpoint)
            .json(&AnalyzeBody {
                url: &target,
                model_type,
            })
            .send()
            .await
            .map_err(FetchError::from_reqwest_error)?;

        let (status, body) = read_body(response).await?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        let result = RawAnalysis::parse(&body)
            .inspect_err(|e| warn!(error = %e, "unusable analysis response"))?
            .into_result(Some(url), Utc::now());

        info!(
            reliability = result.reliability_score,
            bias = result.bias_score,
            hash = result.hash.as_deref().unwrap_or(""),
            "analysis received"
        );
        Ok(result)
    }

    /// Looks up a previously produced analysis by its hash.
    #[instrument(skip(self))]
    pub async fn fetch_by_hash(&self, hash: &str) -> Result<AnalysisResult, FetchError> {
        let mut endpoint = self.base.join("api/get-analysis")?;
        endpoint.query_pairs_mut().append_pair("id", hash);

        let response = self
            .http
            .get(endpoint)
            .send()
            .await
            .map_err(FetchError::from_reqwest_error)?;

        let (status, body) = read_body(response).await?;
        if status == StatusCode::NOT_FOUND {
            debug!("no analysis under hash");
            return Err(FetchError::NotFound);
        }
        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        let mut result = RawAnalysis::parse(&body)?.into_result(None, Utc::now());
        if result.hash.is_none() {
            result.hash = Some(hash.to_string());
        }
        Ok(result)
    }

    /// Link to the full report page for `hash`.
    pub fn report_url(&self, hash: &str) -> String {
        format!("{}analysis/{}", self.base, utf8_percent_encode(hash, COMPONENT))
    }
}

async fn read_body(response: reqwest::Response) -> Result<(StatusCode, Bytes), FetchError> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(FetchError::from_reqwest_error)?;
    Ok((status, body))
}

fn api_error(status: StatusCode, body: &[u8]) -> FetchError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("HTTP {status}"));

    warn!(status = status.as_u16(), %message, "analysis API error");
    FetchError::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> AnalysisClient {
        AnalysisClient::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_base_gains_trailing_slash() {
        assert_eq!(client("https://lnk.az").base_url().as_str(), "https://lnk.az/");
        assert_eq!(
            client("http://127.0.0.1:9000/lnk").base_url().as_str(),
            "http://127.0.0.1:9000/lnk/"
        );
    }

    #[test]
    fn test_report_url_encodes_hash() {
        let c = client("https://lnk.az");
        assert_eq!(c.report_url("f3a9c1"), "https://lnk.az/analysis/f3a9c1");
        assert_eq!(c.report_url("a/b c"), "https://lnk.az/analysis/a%2Fb%20c");
    }

    #[test]
    fn test_invalid_base_rejected() {
        let err = AnalysisClient::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[test]
    fn test_api_error_message() {
        let err = api_error(StatusCode::BAD_REQUEST, br#"{"message": "URL is required"}"#);
        assert_eq!(err.to_string(), "URL is required");

        let err = api_error(StatusCode::SERVICE_UNAVAILABLE, b"<html>down</html>");
        assert_eq!(err.to_string(), "HTTP 503 Service Unavailable");
    }
}

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("connect timeout")]
    ConnectTimeout,

    #[error("request timeout")]
    RequestTimeout,

    /// Transport failure before any response arrived.
    #[error("network error: {0}")]
    Network(String),

    /// The analysis API answered with a non-success status.
    #[error("{message}")]
    Api { status: StatusCode, message: String },

    #[error("analysis not found")]
    NotFound,

    /// A success response that does not look like an analysis.
    #[error("invalid api response: {0}")]
    InvalidResponse(String),

    /// A page fetch answered with a non-success status.
    #[error("http error {0}")]
    Http(StatusCode),

    #[error("body too large ({0} bytes)")]
    BodyTooLarge(u64),

    #[error("unsupported content-type: {0}")]
    UnsupportedContentType(String),

    #[error("charset error: {0}")]
    Charset(String),

    #[error("io error: {0}")]
    Io(String),
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::ConnectTimeout | Self::RequestTimeout)
    }

    /// True when nothing usable came back from the remote side.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Self::ConnectTimeout | Self::RequestTimeout | Self::Network(_) | Self::Io(_)
        )
    }

    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            if err.is_connect() {
                Self::ConnectTimeout
            } else {
                Self::RequestTimeout
            }
        } else if let Some(status) = err.status() {
            Self::Api {
                status,
                message: format!("HTTP {status}"),
            }
        } else if err.is_decode() || err.is_body() {
            Self::Io(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_displays_message() {
        let err = FetchError::Api {
            status: StatusCode::TOO_MANY_REQUESTS,
            message: "Rate limit exceeded".into(),
        };
        assert_eq!(err.to_string(), "Rate limit exceeded");
        assert!(!err.is_network());
    }

    #[test]
    fn test_network_classification() {
        assert!(FetchError::RequestTimeout.is_network());
        assert!(FetchError::RequestTimeout.is_timeout());
        assert!(FetchError::Network("refused".into()).is_network());
        assert!(!FetchError::NotFound.is_network());
    }
}

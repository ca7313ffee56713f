use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{error, warn};

use crate::{
    api::dtos::{
        AnalysisQuery, AnalysisView, AnalyzeRequest, ErrorResponse, InspectRequest,
        SuccessResponse,
    },
    app_state::AppState,
    detector::PageClassification,
    entities::RecentAnalysis,
    fetcher::FetchError,
    service::ServiceError,
};

fn ok<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(SuccessResponse::new(data))).into_response()
}

fn fail(status: StatusCode, error: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(error))).into_response()
}

/// Maps a service failure onto a status code and envelope.
pub(crate) fn service_error_response(err: ServiceError) -> Response {
    let status = match &err {
        ServiceError::InvalidUrl(_) | ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        ServiceError::Fetch(fetch) => match fetch {
            FetchError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            FetchError::NotFound => StatusCode::NOT_FOUND,
            FetchError::Api { .. } | FetchError::InvalidResponse(_) | FetchError::Http(_) => {
                StatusCode::BAD_GATEWAY
            }
            FetchError::ConnectTimeout
            | FetchError::RequestTimeout
            | FetchError::Network(_)
            | FetchError::Io(_) => StatusCode::GATEWAY_TIMEOUT,
            FetchError::BodyTooLarge(_)
            | FetchError::UnsupportedContentType(_)
            | FetchError::Charset(_) => StatusCode::UNPROCESSABLE_ENTITY,
        },
    };

    if status.is_server_error() {
        error!(status = status.as_u16(), error = %err, "request failed");
    } else {
        warn!(status = status.as_u16(), error = %err, "request rejected");
    }

    fail(status, err.to_string())
}

#[utoipa::path(
    post,
    path = "/v1/analyze",
    tag = "analysis",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Analysis, from cache or freshly fetched", body = AnalysisView),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 502, description = "Analysis API failed", body = ErrorResponse),
        (status = 504, description = "Analysis API unreachable", body = ErrorResponse)
    )
)]
pub async fn analyze(State(state): State<AppState>, Json(payload): Json<AnalyzeRequest>) -> Response {
    if let Err(error) = payload.validate() {
        return fail(StatusCode::BAD_REQUEST, error);
    }

    match state
        .service
        .analyze(&payload.url, payload.model_type.as_deref(), payload.force)
        .await
    {
        Ok(analysis) => {
            let report_url = analysis
                .result
                .hash
                .as_deref()
                .map(|hash| state.service.report_url(hash));
            ok(AnalysisView::from_analysis(analysis, report_url))
        }
        Err(e) => service_error_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/v1/analysis",
    tag = "analysis",
    params(AnalysisQuery),
    responses(
        (status = 200, description = "Cached analysis, `data` is null on a miss", body = AnalysisView),
        (status = 400, description = "Invalid URL", body = ErrorResponse)
    )
)]
pub async fn get_cached(
    State(state): State<AppState>,
    Query(query): Query<AnalysisQuery>,
) -> Response {
    match state.service.cached(&query.url).await {
        Ok(result) => {
            let view = result.map(|result| {
                let report_url = result.hash.as_deref().map(|h| state.service.report_url(h));
                AnalysisView::new(result, report_url)
            });
            ok(view)
        }
        Err(e) => service_error_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/v1/recent",
    tag = "analysis",
    responses(
        (status = 200, description = "Recent analyses, newest first", body = [RecentAnalysis])
    )
)]
pub async fn recent(State(state): State<AppState>) -> Response {
    ok(state.service.recent().await)
}

#[utoipa::path(
    get,
    path = "/v1/analysis/{hash}",
    tag = "analysis",
    params(("hash" = String, Path, description = "Analysis hash")),
    responses(
        (status = 200, description = "Analysis", body = AnalysisView),
        (status = 404, description = "No analysis under this hash", body = ErrorResponse),
        (status = 502, description = "Analysis API failed", body = ErrorResponse)
    )
)]
pub async fn by_hash(State(state): State<AppState>, Path(hash): Path<String>) -> Response {
    match state.service.by_hash(&hash).await {
        Ok(result) => {
            let report_url = state.service.report_url(result.hash.as_deref().unwrap_or(&hash));
            ok(AnalysisView::new(result, Some(report_url)))
        }
        Err(e) => service_error_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/v1/inspect",
    tag = "detector",
    request_body = InspectRequest,
    responses(
        (status = 200, description = "Page classification", body = PageClassification),
        (status = 400, description = "Invalid URL", body = ErrorResponse),
        (status = 502, description = "Page could not be fetched", body = ErrorResponse)
    )
)]
pub async fn inspect(State(state): State<AppState>, Json(payload): Json<InspectRequest>) -> Response {
    if let Err(error) = payload.validate() {
        return fail(StatusCode::BAD_REQUEST, error);
    }

    match state.service.inspect(&payload.url).await {
        Ok(classification) => ok(classification),
        Err(e) => service_error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode as UpstreamStatus;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_error_status_mapping() {
        let cases = [
            (ServiceError::InvalidUrl("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Fetch(FetchError::NotFound), StatusCode::NOT_FOUND),
            (
                ServiceError::Fetch(FetchError::Api {
                    status: UpstreamStatus::INTERNAL_SERVER_ERROR,
                    message: "boom".into(),
                }),
                StatusCode::BAD_GATEWAY,
            ),
            (
                ServiceError::Fetch(FetchError::RequestTimeout),
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                ServiceError::Fetch(FetchError::Network("refused".into())),
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                ServiceError::Fetch(FetchError::UnsupportedContentType("image/png".into())),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
        ];

        for (err, expected) in cases {
            let response = service_error_response(err);
            assert_eq!(response.status(), expected);
            let body = body_json(response).await;
            assert_eq!(body["success"], false);
            assert!(body["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_api_error_message_is_passed_through() {
        let response = service_error_response(ServiceError::Fetch(FetchError::Api {
            status: UpstreamStatus::TOO_MANY_REQUESTS,
            message: "Rate limit exceeded".into(),
        }));
        let body = body_json(response).await;
        assert_eq!(body["error"], "Rate limit exceeded");
    }
}

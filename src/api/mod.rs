//! Local HTTP surface over the analyzer.

pub mod dtos;
pub mod handlers;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{app_state::AppState, health};

#[derive(OpenApi)]
#[openapi(
    info(title = "lnk-lens", description = "News article detection and media bias analysis"),
    paths(
        handlers::analyze,
        handlers::get_cached,
        handlers::recent,
        handlers::by_hash,
        handlers::inspect,
        health::health_check,
    ),
    tags(
        (name = "analysis", description = "Bias and reliability analyses"),
        (name = "detector", description = "News article detection"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health::health_check))
        .route("/v1/analyze", post(handlers::analyze))
        .route("/v1/analysis", get(handlers::get_cached))
        .route("/v1/analysis/{hash}", get(handlers::by_hash))
        .route("/v1/recent", get(handlers::recent))
        .route("/v1/inspect", post(handlers::inspect))
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

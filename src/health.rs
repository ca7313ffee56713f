use axum::Json;
use axum::extract::State;
use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::cache::{KeyValueStore, RECENT_KEY};

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    storage: String,
}

/// Always 200 while the process serves requests; a failing store only
/// degrades the cache.
#[utoipa::path(
    get,
    path = "/healthz",
    tag = "health",
    responses(
        (status = 200, description = "Process is up", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let storage = match state.service.cache().store().get_item(RECENT_KEY).await {
        Ok(_) => {
            info!("Health check passed");
            "healthy"
        }
        Err(e) => {
            warn!(error = %e, "Storage health check failed");
            "degraded"
        }
    };

    Json(HealthResponse {
        status: "OK".to_string(),
        storage: storage.to_string(),
    })
}

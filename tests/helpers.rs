use axum::Router;
use std::{sync::Arc, time::Duration};

use lnk_lens::{
    api,
    app_state::AppState,
    cache::{AnalysisCache, ExpiryPolicy, MemoryStore},
    fetcher::AnalysisClient,
    service::AnalyzerService,
};

/// Router over an in-memory cache, talking to the API at `api_base`.
pub fn test_app(api_base: &str) -> (Router, Arc<AnalysisCache>) {
    let cache = Arc::new(AnalysisCache::new(
        Arc::new(MemoryStore::new()),
        ExpiryPolicy::default(),
    ));
    let client = AnalysisClient::new(api_base, Duration::from_secs(5))
        .expect("Failed to build analysis client");
    let service = AnalyzerService::new(client, cache.clone(), "auto");

    (api::router(AppState::new(service)), cache)
}

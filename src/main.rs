use anyhow::{Context, Result};
use lnk_lens::{
    api,
    app_state::AppState,
    cache::{AnalysisCache, ExpiryPolicy, KeyValueStore, MemoryStore, PgStore, spawn_sweeper},
    config::Config,
    fetcher::AnalysisClient,
    service::AnalyzerService,
    telemetry,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();

    let config = Config::from_env()?;

    let store: Arc<dyn KeyValueStore> = match config.database_url() {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(database_url)
                .await
                .context("Failed to connect to database")?;
            let store = PgStore::new(pool);
            store.migrate().await.context("Failed to run migrations")?;
            info!("Persisting analyses in PostgreSQL");
            Arc::new(store)
        }
        None => {
            info!("DATABASE_URL not set, persisting analyses in memory");
            Arc::new(MemoryStore::new())
        }
    };

    let cache = Arc::new(AnalysisCache::new(
        store,
        ExpiryPolicy::from_window(config.cache_expiry()),
    ));
    let client = AnalysisClient::new(config.api_base(), config.request_timeout())?;
    let service = AnalyzerService::new(client, cache.clone(), config.default_model_type());

    let shutdown = CancellationToken::new();
    let sweeper = spawn_sweeper(cache, config.cleanup_interval(), shutdown.clone());

    let app = api::router(AppState::new(service));
    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr()))?;
    info!("Listening on {}", config.bind_addr());

    let server_shutdown = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            wait_for_signal().await;
            server_shutdown.cancel();
        })
        .await?;

    shutdown.cancel();
    if let Err(e) = sweeper.await {
        error!("Sweeper task failed: {}", e);
    }
    info!("Shut down cleanly");
    Ok(())
}

async fn wait_for_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal, initiating graceful shutdown...");
}

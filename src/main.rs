//! booru-pools server entry point.
//!
//! Starts the Axum HTTP server with the pool management endpoints.

use std::sync::Arc;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use booru_pools::api;
use booru_pools::app_state::AppState;
use booru_pools::auth::PrivilegeChecker;
use booru_pools::config::AppConfig;
use booru_pools::persistence::memory::MemoryStore;
use booru_pools::persistence::postgres::PostgresStore;
use booru_pools::persistence::{PoolStore, PostStore, SnapshotStore};
use booru_pools::service::PoolService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting booru-pools");

    // Build stores
    let (pools, posts, snapshots): (
        Arc<dyn PoolStore>,
        Arc<dyn PostStore>,
        Arc<dyn SnapshotStore>,
    ) = if config.persistence_enabled {
        let db = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(std::time::Duration::from_secs(
                config.database_connect_timeout_secs,
            ))
            .connect(&config.database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&db).await?;
        let store = Arc::new(PostgresStore::new(db));
        (
            Arc::clone(&store) as Arc<dyn PoolStore>,
            Arc::clone(&store) as Arc<dyn PostStore>,
            store,
        )
    } else {
        tracing::warn!("persistence disabled; state is volatile");
        let store = Arc::new(MemoryStore::new());
        (
            Arc::clone(&store) as Arc<dyn PoolStore>,
            Arc::clone(&store) as Arc<dyn PostStore>,
            store,
        )
    };

    // Build service layer
    let privileges = PrivilegeChecker::new(config.privileges.clone());
    let pool_service = Arc::new(PoolService::new(pools, posts, snapshots, privileges));

    // Build application state
    let app_state = AppState { pool_service };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

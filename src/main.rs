use std::net::SocketAddr;
use std::sync::Arc;

use registry_mirror::{
    AppState, Config, MetricsRegistry, RegistryMirrorCache, RegistryRestClient, Result, SyncEngine,
    create_router, start_sync_loop,
};
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    setup_tracing();

    // A malformed registry address aborts startup
    let config = Config::from_env().map_err(|e| {
        tracing::error!("{}", e);
        e
    })?;

    tracing::info!("Mirroring registry at {}", config.registry);

    let cache = RegistryMirrorCache::new();
    let metrics = MetricsRegistry::new();
    let client = RegistryRestClient::new(&config.registry, config.request_timeout())?;
    let engine = Arc::new(SyncEngine::new(client, cache.clone(), metrics.clone()));

    let state = Arc::new(AppState {
        config: config.clone(),
        cache,
        metrics,
    });

    // Graceful shutdown channel
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn({
        let shutdown_tx = shutdown_tx.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown signal received");
                let _ = shutdown_tx.send(true);
            }
        }
    });

    let sync_handle = start_sync_loop(shutdown_rx.clone(), engine, config.sync_interval());

    let app = create_router(state);

    let addr: SocketAddr = config.server_addr.parse().map_err(|e| {
        tracing::error!("Invalid server address: {}", e);
        e
    })?;

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        tracing::error!("Failed to bind address: {}", e);
        e
    })?;

    tracing::info!("Registry mirror starting on {}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  - GET /api/service/all            - All services");
    tracing::info!("  - GET /api/service/query/services - Services by name");
    tracing::info!("  - GET /api/service/query/providers - Providers of a service");
    tracing::info!("  - GET /api/service/query/consumers - Consumers of a service");
    tracing::info!("  - GET /health                     - Health check");
    tracing::info!("  - GET /metrics                    - Prometheus metrics");

    let mut server_shutdown = shutdown_rx.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = server_shutdown.changed().await;
            tracing::info!("HTTP server shutting down");
        })
        .await
        .map_err(|e| {
            tracing::error!("Server error: {}", e);
            e
        })?;

    let _ = sync_handle.await;
    Ok(())
}

fn setup_tracing() {
    // RUST_LOG wins; default to "info"
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

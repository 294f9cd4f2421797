//! MedSearch diagnostics server
//!
//! Runs the search layer against a remote query service and exposes it over
//! HTTP for inspection.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use medsearch::analytics::{AnalyticsSink, HttpAnalyticsSink, TracingSink};
use medsearch::query::HttpQueryService;
use medsearch::{create_router, AppState, Config, SearchCoordinator};

/// Main entry point for the diagnostics server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Wire the query service, analytics sink and shared state
/// 4. Create Axum router with all endpoints
/// 5. Start HTTP server on configured port
/// 6. Cancel outstanding searches on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medsearch=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting MedSearch");

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_capacity={}, cache_ttl={}s, debounce={}ms, prefetch_delay={}ms, port={}",
        config.cache_capacity,
        config.cache_ttl,
        config.debounce_ms,
        config.prefetch_delay_ms,
        config.server_port
    );

    let service = Arc::new(HttpQueryService::new(config.query_service_url.clone()));
    info!("Query service: {}", service.endpoint());

    let analytics: Arc<dyn AnalyticsSink> = match &config.analytics_url {
        Some(url) => {
            info!("Forwarding analytics to {}", url);
            Arc::new(HttpAnalyticsSink::new(url.clone()))
        }
        None => Arc::new(TracingSink),
    };

    let state = AppState::from_config(&config, service, analytics);
    let coordinator = state.coordinator.clone();

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(coordinator))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown, cancels the pending debounce timer and any live dispatch.
async fn shutdown_signal(coordinator: SearchCoordinator) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    coordinator.cleanup().await;
    warn!("Outstanding searches cancelled");
}

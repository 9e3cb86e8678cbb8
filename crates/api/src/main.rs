//! Chime notify API server binary entrypoint.

use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use chime_common::config::AppConfig;

use chime_api::routes::create_router;
use chime_api::state::AppState;

/// Upper bound for an incoming build event payload.
const MAX_BODY_BYTES: usize = 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("chime_api=info,chime_notifier=info,tower_http=debug")
        }))
        .init();

    tracing::info!("Starting chime notify API server...");

    // Load configuration
    let config = AppConfig::from_env()?;
    let addr = config.bind_addr;
    tracing::info!(root_url = %config.root_url, "Configuration loaded");

    // Build application state
    let state = AppState::new(config)?;

    // Build router
    let app = create_router(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http());

    // Start server
    tracing::info!("API server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Received shutdown signal, stopping gracefully...");
        })
        .await?;

    Ok(())
}

use std::sync::Arc;

use cms_dashboard::{
    build_router,
    config::{AppConfig, MetricsMode},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// ── Entry point ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present; env vars may already be set
    dotenvy::dotenv().ok();

    // Initialise structured logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cms_dashboard=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env()?;
    let bind_addr = config.bind_addr();

    let state = Arc::new(AppState::from_config(config)?);
    tracing::info!("Metrics source: {}", state.source.name());
    if let MetricsMode::Live { backend_url } = &state.config.metrics_mode {
        tracing::info!("Metrics backend: {}", backend_url);
    }

    let app = build_router(state);

    // ── Serve ──────────────────────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

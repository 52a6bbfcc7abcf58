pub mod breadcrumbs;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod sources;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use config::{AppConfig, MetricsMode};
use sources::{LiveMetricsSource, MetricsSource, MockMetricsSource, NullMetricsSource, SourceError};

// ── Shared application state ───────────────────────────────────────────────

pub struct AppState {
    pub config: AppConfig,
    /// Where the dashboard gets its raw numbers. Handlers only ever see the
    /// trait, never a concrete source.
    pub source: Arc<dyn MetricsSource>,
}

impl AppState {
    pub fn new(config: AppConfig, source: Arc<dyn MetricsSource>) -> Self {
        Self { config, source }
    }

    /// Build the state with the metrics source selected by `config`.
    pub fn from_config(config: AppConfig) -> Result<Self, SourceError> {
        let source = build_source(&config)?;
        Ok(Self::new(config, source))
    }
}

/// Pick the metrics source for the configured mode.
pub fn build_source(config: &AppConfig) -> Result<Arc<dyn MetricsSource>, SourceError> {
    let source: Arc<dyn MetricsSource> = match &config.metrics_mode {
        MetricsMode::Live { backend_url } => Arc::new(LiveMetricsSource::new(
            backend_url.clone(),
            config.metrics_timeout,
        )?),
        MetricsMode::Mock => Arc::new(MockMetricsSource::with_jitter(config.mock_jitter)),
        MetricsMode::Disabled => Arc::new(NullMetricsSource),
    };
    Ok(source)
}

// ── Router ─────────────────────────────────────────────────────────────────

pub fn build_router(state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route("/dashboard/stats", get(handlers::api::dashboard_stats))
        .route("/breadcrumbs", get(handlers::api::breadcrumbs));

    Router::new()
        // Root redirect
        .route("/", get(handlers::pages::index))
        .route("/health", get(|| async { axum::http::StatusCode::OK }))
        .route("/dashboard", get(handlers::pages::dashboard_home))
        // Every nested dashboard page shares the layout shell
        .route("/dashboard/*section", get(handlers::pages::dashboard_section))
        .nest("/api", api_router)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

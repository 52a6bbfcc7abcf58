use crate::{
    breadcrumbs::{derive_breadcrumbs, BreadcrumbEntry},
    errors::{ApiResponse, AppError},
    models::DashboardStatistics,
    normalize::normalize,
    AppState,
};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct BreadcrumbQuery {
    path: Option<String>,
}

/// GET /api/dashboard/stats
pub async fn dashboard_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<DashboardStatistics>>, AppError> {
    let raw = state.source.fetch().await?;
    if raw.is_none() {
        tracing::debug!(source = state.source.name(), "no metrics supplied, using fallbacks");
    }

    let stats = normalize(raw.as_ref());
    Ok(ApiResponse::success(
        stats,
        format!("Dashboard statistics from {} source", state.source.name()),
    ))
}

/// GET /api/breadcrumbs?path=/dashboard/revenue
pub async fn breadcrumbs(
    Query(query): Query<BreadcrumbQuery>,
) -> Json<ApiResponse<Vec<BreadcrumbEntry>>> {
    let trail = derive_breadcrumbs(query.path.as_deref().map(strip_query));
    ApiResponse::success(trail, "Breadcrumbs derived")
}

/// Keep only the path component: `"/a/b?tab=1#top"` → `"/a/b"`.
pub(crate) fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

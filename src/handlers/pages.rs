use crate::{
    breadcrumbs::{BreadcrumbEntry, RouteView},
    models::DashboardStatistics,
    normalize::normalize,
    AppState,
};
use askama::Template;
use axum::{
    extract::State,
    http::Uri,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

// ── Template structs ───────────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    title: String,
    trail: Vec<BreadcrumbEntry>,
    source: &'static str,
    stats: Option<DashboardStatistics>,
    load_error: Option<String>,
}

#[derive(Template)]
#[template(path = "section.html")]
struct SectionTemplate {
    title: String,
    trail: Vec<BreadcrumbEntry>,
    path: String,
}

// ── Handlers ───────────────────────────────────────────────────────────────

/// GET /
pub async fn index() -> Redirect {
    Redirect::to("/dashboard")
}

/// GET /dashboard
pub async fn dashboard_home(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    let view = navigate(&uri);

    let (stats, load_error) = match state.source.fetch().await {
        Ok(raw) => (Some(normalize(raw.as_ref())), None),
        Err(e) => {
            tracing::error!("Failed to load dashboard metrics: {:?}", e);
            (None, Some(e.to_string()))
        }
    };

    DashboardTemplate {
        title: view.title().unwrap_or("Dashboard").to_owned(),
        trail: view.into_trail(),
        source: state.source.name(),
        stats,
        load_error,
    }
    .into_response()
}

/// GET /dashboard/*section
///
/// Every nested dashboard route shares the same layout; only the heading and
/// breadcrumb trail differ.
pub async fn dashboard_section(uri: Uri) -> Response {
    let view = navigate(&uri);

    SectionTemplate {
        title: view.title().unwrap_or("Dashboard").to_owned(),
        path: view.path().unwrap_or("/").to_owned(),
        trail: view.into_trail(),
    }
    .into_response()
}

// ── Private helpers ────────────────────────────────────────────────────────

/// Run the layout shell's route-change hook for this request.
fn navigate(uri: &Uri) -> RouteView {
    let mut view = RouteView::new();
    view.on_route_changed(uri.path());
    view
}

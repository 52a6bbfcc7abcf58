use serde::Serialize;

// ── Types ──────────────────────────────────────────────────────────────────

/// One navigable step of the trail shown above every dashboard page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbEntry {
    pub label: String,
    /// Path prefix up to and including this segment, e.g. "/dashboard/revenue".
    pub href: String,
    pub is_last: bool,
}

// ── Deriver ────────────────────────────────────────────────────────────────

/// Derive the breadcrumb trail for a route path.
///
/// Empty segments (leading, trailing or doubled slashes) are skipped, so
/// `"//dashboard///revenue/"` yields the same trail as `"/dashboard/revenue"`.
/// An absent or empty path yields an empty trail. Query strings are not
/// understood here; callers strip them first.
pub fn derive_breadcrumbs<'a>(path: impl Into<Option<&'a str>>) -> Vec<BreadcrumbEntry> {
    let Some(path) = path.into() else {
        return Vec::new();
    };

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let last = segments.len().saturating_sub(1);

    let mut href = String::with_capacity(path.len());
    segments
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            href.push('/');
            href.push_str(segment);
            BreadcrumbEntry {
                label: label_for(segment),
                href: href.clone(),
                is_last: i == last,
            }
        })
        .collect()
}

/// `"ai-assistant"` → `"Ai assistant"`. Only the very first character is
/// upper-cased; the rest of the segment is left untouched.
fn label_for(segment: &str) -> String {
    let spaced = segment.replace('-', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ── Route view state ───────────────────────────────────────────────────────

/// Per-render navigation state held by the layout shell.
///
/// The shell calls [`RouteView::on_route_changed`] with the current path on
/// every navigation and renders [`RouteView::trail`].
#[derive(Debug, Clone, Default)]
pub struct RouteView {
    path: Option<String>,
    trail: Vec<BreadcrumbEntry>,
}

impl RouteView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-derive the trail for `path`. Unchanged paths are skipped.
    pub fn on_route_changed(&mut self, path: &str) {
        if self.path.as_deref() == Some(path) {
            return;
        }
        self.trail = derive_breadcrumbs(path);
        tracing::debug!(path, crumbs = self.trail.len(), "route changed");
        self.path = Some(path.to_owned());
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn trail(&self) -> &[BreadcrumbEntry] {
        &self.trail
    }

    /// Label of the final crumb, used as the page heading.
    pub fn title(&self) -> Option<&str> {
        self.trail.last().map(|c| c.label.as_str())
    }

    pub fn into_trail(self) -> Vec<BreadcrumbEntry> {
        self.trail
    }
}

//! Turns whatever a metrics source returned into [`DashboardStatistics`].
//!
//! Each output field is derived on its own from the default table in
//! [`fallback`]. A field falls back only when its input is absent; a
//! supplied zero is a real value and is kept.

use chrono::{NaiveDate, TimeZone, Utc};

use crate::models::{
    ActivityEvent, ActivityKind, ArticlePerformance, DashboardStatistics, RawMetricsRecord,
    RawTrafficSource, RevenuePoint, TrafficSource,
};

/// Values used when the source does not supply a field.
pub mod fallback {
    pub const ARTICLES: u64 = 45;
    pub const DRAFT_ARTICLES: u64 = 0;
    pub const VIEWS: u64 = 12_543;
    pub const REVENUE: f64 = 1_847.50;
    pub const CLICKS: u64 = 3_421;
    pub const COMMENTS: u64 = 234;
    pub const CONVERSION_RATE: f64 = 3.2;
    pub const VIEWS_CHANGE: f64 = 12.5;
    pub const REVENUE_CHANGE: f64 = 8.2;
    pub const ARTICLES_CHANGE: f64 = 15.3;
    pub const COMMENTS_CHANGE: f64 = -2.1;
}

/// Build the canonical statistics view. `None` means no backend is
/// configured; the result is then assembled from fallbacks alone.
pub fn normalize(raw: Option<&RawMetricsRecord>) -> DashboardStatistics {
    let current = raw.and_then(|r| r.current.as_ref());
    let growth = raw.and_then(|r| r.growth.as_ref());

    let articles = current.and_then(|c| c.articles).unwrap_or(fallback::ARTICLES);
    let revenue = finite(current.and_then(|c| c.revenue)).unwrap_or(fallback::REVENUE);

    DashboardStatistics {
        total_articles: articles,
        published_articles: articles,
        draft_articles: fallback::DRAFT_ARTICLES,
        total_views: current.and_then(|c| c.views).unwrap_or(fallback::VIEWS),
        total_clicks: current.and_then(|c| c.clicks).unwrap_or(fallback::CLICKS),
        total_revenue: revenue,
        monthly_revenue: revenue,
        total_comments: fallback::COMMENTS,
        conversion_rate: fallback::CONVERSION_RATE,
        views_change: finite(growth.and_then(|g| g.views)).unwrap_or(fallback::VIEWS_CHANGE),
        revenue_change: finite(growth.and_then(|g| g.revenue)).unwrap_or(fallback::REVENUE_CHANGE),
        articles_change: finite(growth.and_then(|g| g.articles))
            .unwrap_or(fallback::ARTICLES_CHANGE),
        comments_change: fallback::COMMENTS_CHANGE,
        top_performing_articles: top_articles(raw.and_then(|r| r.top_articles.as_deref())),
        recent_activity: recent_activity(raw.and_then(|r| r.recent_activity.as_deref())),
        revenue_chart: revenue_chart(raw.and_then(|r| r.revenue_chart.as_deref())),
        traffic_sources: traffic_sources(raw.and_then(|r| r.traffic_sources.as_deref())),
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn money(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Sorted by views, highest first. Ties keep their upstream order.
fn top_articles(supplied: Option<&[ArticlePerformance]>) -> Vec<ArticlePerformance> {
    let mut articles = match supplied {
        Some(list) if !list.is_empty() => list
            .iter()
            .map(|a| ArticlePerformance {
                revenue: money(a.revenue),
                ..a.clone()
            })
            .collect(),
        _ => seed_top_articles(),
    };
    articles.sort_by(|a, b| b.views.cmp(&a.views));
    articles
}

/// Newest first.
fn recent_activity(supplied: Option<&[ActivityEvent]>) -> Vec<ActivityEvent> {
    let mut events = match supplied {
        Some(list) if !list.is_empty() => list.to_vec(),
        _ => seed_recent_activity(),
    };
    events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    events
}

/// Oldest date first.
fn revenue_chart(supplied: Option<&[RevenuePoint]>) -> Vec<RevenuePoint> {
    let mut points = match supplied {
        Some(list) if !list.is_empty() => list
            .iter()
            .map(|p| RevenuePoint {
                revenue: money(p.revenue),
                ..p.clone()
            })
            .collect(),
        _ => seed_revenue_chart(),
    };
    points.sort_by_key(|p| p.date);
    points
}

/// Upstream shares are clamped to [0, 100]. A missing share is derived from
/// the row's part of the total visits.
fn traffic_sources(supplied: Option<&[RawTrafficSource]>) -> Vec<TrafficSource> {
    let list = match supplied {
        Some(list) if !list.is_empty() => list,
        _ => return seed_traffic_sources(),
    };

    // Summed as f64: u64 visit counts from upstream can overflow an integer sum.
    let total_visits: f64 = list.iter().map(|s| s.visits as f64).sum();
    list.iter()
        .map(|s| {
            let derived = if total_visits > 0.0 {
                s.visits as f64 * 100.0 / total_visits
            } else {
                0.0
            };
            let percentage = finite(s.percentage).unwrap_or(derived).clamp(0.0, 100.0);
            TrafficSource {
                source: s.source.clone(),
                visits: s.visits,
                percentage,
            }
        })
        .collect()
}

// ── Seed lists ─────────────────────────────────────────────────────────────

fn seed_top_articles() -> Vec<ArticlePerformance> {
    [
        ("1", "Getting Started with Affiliate Marketing", 2_847, 342.50),
        ("2", "Best Tools for Content Creators in 2024", 2_156, 289.75),
        ("3", "How to Monetize Your Blog", 1_923, 198.25),
        ("4", "SEO Tips That Actually Work", 1_654, 156.00),
        ("5", "Building an Email List from Scratch", 1_432, 124.80),
    ]
    .into_iter()
    .map(|(id, title, views, revenue)| ArticlePerformance {
        id: id.to_string(),
        title: title.to_string(),
        views,
        revenue,
    })
    .collect()
}

fn seed_recent_activity() -> Vec<ActivityEvent> {
    [
        (
            "1",
            ActivityKind::ArticlePublished,
            "Published \"SEO Tips That Actually Work\"",
            (2024, 1, 21, 14, 30),
        ),
        (
            "2",
            ActivityKind::RevenueMilestone,
            "Monthly revenue passed $1,500",
            (2024, 1, 21, 9, 15),
        ),
        (
            "3",
            ActivityKind::CommentReceived,
            "New comment on \"How to Monetize Your Blog\"",
            (2024, 1, 20, 18, 45),
        ),
        (
            "4",
            ActivityKind::LinkCreated,
            "Created affiliate link for \"Best Tools for Content Creators\"",
            (2024, 1, 20, 11, 0),
        ),
    ]
    .into_iter()
    .filter_map(|(id, kind, description, (y, mo, d, h, mi))| {
        let timestamp = Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).single()?;
        Some(ActivityEvent {
            id: id.to_string(),
            kind,
            description: description.to_string(),
            timestamp,
        })
    })
    .collect()
}

fn seed_revenue_chart() -> Vec<RevenuePoint> {
    [
        (15, 234.50, 456),
        (16, 289.25, 523),
        (17, 198.75, 398),
        (18, 312.00, 601),
        (19, 267.50, 489),
        (20, 245.25, 467),
        (21, 300.25, 487),
    ]
    .into_iter()
    .filter_map(|(day, revenue, clicks)| {
        Some(RevenuePoint {
            date: NaiveDate::from_ymd_opt(2024, 1, day)?,
            revenue,
            clicks,
        })
    })
    .collect()
}

fn seed_traffic_sources() -> Vec<TrafficSource> {
    [
        ("Google", 5_672, 45.2),
        ("Direct", 2_897, 23.1),
        ("Social Media", 1_969, 15.7),
        ("Referral", 1_292, 10.3),
        ("Email", 713, 5.7),
    ]
    .into_iter()
    .map(|(source, visits, percentage)| TrafficSource {
        source: source.to_string(),
        visits,
        percentage,
    })
    .collect()
}

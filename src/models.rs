use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Raw input ──────────────────────────────────────────────────────────────

/// Untyped, partial metrics record as handed over by a metrics source.
///
/// Every field may be absent. Build one from arbitrary JSON with
/// `RawMetricsRecord::from(&value)`, which never fails: wrongly-typed or
/// non-finite values are simply dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawMetricsRecord {
    pub current: Option<CurrentMetrics>,
    pub growth: Option<GrowthMetrics>,
    pub top_articles: Option<Vec<ArticlePerformance>>,
    pub recent_activity: Option<Vec<ActivityEvent>>,
    pub revenue_chart: Option<Vec<RevenuePoint>>,
    pub traffic_sources: Option<Vec<RawTrafficSource>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentMetrics {
    pub articles: Option<u64>,
    pub views: Option<u64>,
    pub revenue: Option<f64>,
    pub clicks: Option<u64>,
}

/// Percentage deltas, e.g. `27.0` for +27%.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthMetrics {
    pub views: Option<f64>,
    pub revenue: Option<f64>,
    pub articles: Option<f64>,
}

/// Traffic row as supplied upstream; the share may be missing and is then
/// derived from the visit counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTrafficSource {
    pub source: String,
    pub visits: u64,
    #[serde(default)]
    pub percentage: Option<f64>,
}

// ── Canonical view model ───────────────────────────────────────────────────

/// The fixed-shape statistics the dashboard widgets render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatistics {
    pub total_articles: u64,
    pub published_articles: u64,
    pub draft_articles: u64,
    pub total_views: u64,
    pub total_clicks: u64,
    pub total_revenue: f64,
    pub monthly_revenue: f64,
    pub total_comments: u64,
    pub conversion_rate: f64,
    pub views_change: f64,
    pub revenue_change: f64,
    pub articles_change: f64,
    pub comments_change: f64,
    pub top_performing_articles: Vec<ArticlePerformance>,
    pub recent_activity: Vec<ActivityEvent>,
    pub revenue_chart: Vec<RevenuePoint>,
    pub traffic_sources: Vec<TrafficSource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticlePerformance {
    pub id: String,
    pub title: String,
    pub views: u64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    ArticlePublished,
    RevenueMilestone,
    CommentReceived,
    LinkCreated,
    #[serde(other)]
    Other,
}

impl ActivityKind {
    pub fn label(&self) -> &'static str {
        match self {
            ActivityKind::ArticlePublished => "Article",
            ActivityKind::RevenueMilestone => "Revenue",
            ActivityKind::CommentReceived => "Comment",
            ActivityKind::LinkCreated => "Link",
            ActivityKind::Other => "Activity",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenuePoint {
    pub date: NaiveDate,
    pub revenue: f64,
    pub clicks: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficSource {
    pub source: String,
    pub visits: u64,
    pub percentage: f64,
}

// ── Lenient coercion from JSON ─────────────────────────────────────────────

impl From<&Value> for RawMetricsRecord {
    fn from(value: &Value) -> Self {
        Self {
            current: value.get("current").filter(|v| v.is_object()).map(|v| {
                CurrentMetrics {
                    articles: count(v.get("articles")),
                    views: count(v.get("views")),
                    revenue: number(v.get("revenue")),
                    clicks: count(v.get("clicks")),
                }
            }),
            growth: value.get("growth").filter(|v| v.is_object()).map(|v| {
                GrowthMetrics {
                    views: number(v.get("views")),
                    revenue: number(v.get("revenue")),
                    articles: number(v.get("articles")),
                }
            }),
            top_articles: list(value.get("topArticles"), article),
            recent_activity: list(value.get("recentActivity"), activity),
            revenue_chart: list(value.get("revenueChart"), revenue_point),
            traffic_sources: list(value.get("trafficSources"), traffic_row),
        }
    }
}

/// A finite number, accepting numeric strings such as `"1847.50"`.
fn number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// A non-negative count; fractional inputs are rounded.
fn count(value: Option<&Value>) -> Option<u64> {
    if let Some(n) = value.and_then(Value::as_u64) {
        return Some(n);
    }
    let n = number(value)?;
    (n >= 0.0 && n <= u64::MAX as f64).then(|| n.round() as u64)
}

/// A non-empty string; bare numbers are accepted for ids.
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Decode each array element on its own, dropping the ones that don't fit.
fn list<T>(value: Option<&Value>, row: fn(&Value) -> Option<T>) -> Option<Vec<T>> {
    let items = value?.as_array()?;
    Some(items.iter().filter_map(row).collect())
}

fn article(v: &Value) -> Option<ArticlePerformance> {
    Some(ArticlePerformance {
        id: text(v.get("id"))?,
        title: text(v.get("title"))?,
        views: count(v.get("views"))?,
        revenue: number(v.get("revenue")).unwrap_or(0.0),
    })
}

fn activity(v: &Value) -> Option<ActivityEvent> {
    let kind = v
        .get("type")
        .and_then(|t| serde_json::from_value(t.clone()).ok())
        .unwrap_or(ActivityKind::Other);
    Some(ActivityEvent {
        id: text(v.get("id"))?,
        kind,
        description: text(v.get("description"))?,
        timestamp: v.get("timestamp")?.as_str()?.parse().ok()?,
    })
}

fn revenue_point(v: &Value) -> Option<RevenuePoint> {
    Some(RevenuePoint {
        date: v.get("date")?.as_str()?.trim().parse().ok()?,
        revenue: number(v.get("revenue")).unwrap_or(0.0),
        clicks: count(v.get("clicks")).unwrap_or(0),
    })
}

fn traffic_row(v: &Value) -> Option<RawTrafficSource> {
    Some(RawTrafficSource {
        source: text(v.get("source"))?,
        visits: count(v.get("visits"))?,
        percentage: number(v.get("percentage")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn well_formed_record_is_read() {
        let raw = RawMetricsRecord::from(&json!({
            "current": { "articles": 45, "views": 12543, "revenue": 1847.50, "clicks": 3421 },
            "growth": { "views": 27.0, "revenue": 29.0, "articles": 18.4 }
        }));
        let current = raw.current.unwrap();
        assert_eq!(current.articles, Some(45));
        assert_eq!(current.views, Some(12543));
        assert_eq!(current.revenue, Some(1847.50));
        assert_eq!(current.clicks, Some(3421));
        assert_eq!(raw.growth.unwrap().articles, Some(18.4));
        assert!(raw.top_articles.is_none());
    }

    #[test]
    fn empty_object_and_non_object_yield_empty_record() {
        assert_eq!(RawMetricsRecord::from(&json!({})), RawMetricsRecord::default());
        assert_eq!(RawMetricsRecord::from(&json!(null)), RawMetricsRecord::default());
        assert_eq!(RawMetricsRecord::from(&json!([1, 2])), RawMetricsRecord::default());
    }

    #[test]
    fn malformed_fields_are_dropped_not_fatal() {
        let raw = RawMetricsRecord::from(&json!({
            "current": { "articles": "12", "views": -4, "revenue": "lots", "clicks": 10.6 },
            "growth": 7
        }));
        let current = raw.current.unwrap();
        assert_eq!(current.articles, Some(12));
        assert_eq!(current.views, None);
        assert_eq!(current.revenue, None);
        assert_eq!(current.clicks, Some(11));
        assert!(raw.growth.is_none());
    }

    #[test]
    fn list_entries_are_decoded_individually() {
        let raw = RawMetricsRecord::from(&json!({
            "topArticles": [
                { "id": "1", "title": "Ok", "views": 10, "revenue": 1.5 },
                { "id": "2", "title": "Missing views" }
            ],
            "revenueChart": "nope",
            "trafficSources": [{ "source": "Google", "visits": 100 }]
        }));
        assert_eq!(raw.top_articles.unwrap().len(), 1);
        assert!(raw.revenue_chart.is_none());
        let traffic = raw.traffic_sources.unwrap();
        assert_eq!(traffic[0].percentage, None);
    }

    #[test]
    fn list_entries_accept_numeric_strings_and_integral_floats() {
        let raw = RawMetricsRecord::from(&json!({
            "trafficSources": [
                { "source": "A", "visits": "100" },
                { "source": "B", "visits": 10.0, "percentage": "12.5" }
            ],
            "topArticles": [{ "id": 7, "title": "Seven", "views": "70", "revenue": "3.25" }],
            "revenueChart": [{ "date": "2024-03-01", "revenue": "9.5", "clicks": 4.0 }]
        }));

        let traffic = raw.traffic_sources.unwrap();
        assert_eq!(traffic.len(), 2);
        assert_eq!(traffic[0].visits, 100);
        assert_eq!(traffic[1].visits, 10);
        assert_eq!(traffic[1].percentage, Some(12.5));

        let article = &raw.top_articles.unwrap()[0];
        assert_eq!(article.id, "7");
        assert_eq!(article.views, 70);
        assert_eq!(article.revenue, 3.25);

        let point = &raw.revenue_chart.unwrap()[0];
        assert_eq!(point.revenue, 9.5);
        assert_eq!(point.clicks, 4);
    }

    #[test]
    fn list_entries_missing_required_fields_are_dropped() {
        let raw = RawMetricsRecord::from(&json!({
            "trafficSources": [{ "visits": 5 }, { "source": "C", "visits": -1 }],
            "revenueChart": [{ "date": "not a date", "revenue": 1 }],
            "recentActivity": [{ "id": "a", "description": "no timestamp" }]
        }));
        assert_eq!(raw.traffic_sources, Some(vec![]));
        assert_eq!(raw.revenue_chart, Some(vec![]));
        assert_eq!(raw.recent_activity, Some(vec![]));
    }

    #[test]
    fn unknown_activity_type_maps_to_other() {
        let raw = RawMetricsRecord::from(&json!({
            "recentActivity": [{
                "id": "a",
                "type": "user_signup",
                "description": "New user",
                "timestamp": "2024-01-21T10:00:00Z"
            }]
        }));
        assert_eq!(raw.recent_activity.unwrap()[0].kind, ActivityKind::Other);
    }
}

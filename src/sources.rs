use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::models::{
    CurrentMetrics, GrowthMetrics, RawMetricsRecord, RawTrafficSource, RevenuePoint,
};

// ── Capability ─────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("metrics backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("metrics backend returned HTTP {0}")]
    Status(u16),

    #[error("metrics backend rejected the request: {0}")]
    Rejected(String),
}

/// Anything that can hand over a raw statistics record.
///
/// `Ok(None)` means the source has nothing to offer (no backend configured,
/// or an empty payload); callers then render fallbacks.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self) -> Result<Option<RawMetricsRecord>, SourceError>;
}

// ── Mock ───────────────────────────────────────────────────────────────────

/// Generates plausible numbers for demos and local development.
#[derive(Debug, Clone)]
pub struct MockMetricsSource {
    jitter: bool,
}

impl MockMetricsSource {
    /// Base values varied by up to ±10% on every fetch.
    pub fn new() -> Self {
        Self { jitter: true }
    }

    /// Always returns the base values.
    pub fn fixed() -> Self {
        Self { jitter: false }
    }

    pub fn with_jitter(jitter: bool) -> Self {
        Self { jitter }
    }

    fn generate(&self) -> RawMetricsRecord {
        let mut rng = rand::thread_rng();
        let mut vary = |base: f64| {
            if self.jitter {
                base * rng.gen_range(0.9..=1.1)
            } else {
                base
            }
        };

        let current = CurrentMetrics {
            articles: Some(vary(45.0).round() as u64),
            views: Some(vary(12_543.0).round() as u64),
            revenue: Some((vary(1_847.50) * 100.0).round() / 100.0),
            clicks: Some(vary(3_421.0).round() as u64),
        };
        let growth = GrowthMetrics {
            views: Some(vary(27.0)),
            revenue: Some(vary(29.0)),
            articles: Some(vary(18.4)),
        };

        // Last seven days, oldest first, ending today.
        let today = Utc::now().date_naive();
        let revenue_chart = (0..7)
            .rev()
            .map(|ago| RevenuePoint {
                date: today - chrono::Duration::days(ago),
                revenue: (vary(260.0) * 100.0).round() / 100.0,
                clicks: vary(480.0).round() as u64,
            })
            .collect();

        let traffic_sources = [
            ("Google", 5_672.0),
            ("Direct", 2_897.0),
            ("Social Media", 1_969.0),
            ("Referral", 1_292.0),
            ("Email", 713.0),
        ]
        .into_iter()
        .map(|(source, visits)| RawTrafficSource {
            source: source.to_string(),
            visits: vary(visits).round() as u64,
            percentage: None,
        })
        .collect();

        RawMetricsRecord {
            current: Some(current),
            growth: Some(growth),
            revenue_chart: Some(revenue_chart),
            traffic_sources: Some(traffic_sources),
            ..Default::default()
        }
    }
}

impl Default for MockMetricsSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetricsSource for MockMetricsSource {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn fetch(&self) -> Result<Option<RawMetricsRecord>, SourceError> {
        Ok(Some(self.generate()))
    }
}

// ── Live backend ───────────────────────────────────────────────────────────

/// `{ data, success, message }` as returned by the metrics backend.
#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Value,
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

/// Reads statistics from the real backend over HTTP.
#[derive(Debug, Clone)]
pub struct LiveMetricsSource {
    client: reqwest::Client,
    url: String,
}

impl LiveMetricsSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl MetricsSource for LiveMetricsSource {
    fn name(&self) -> &'static str {
        "live"
    }

    async fn fetch(&self) -> Result<Option<RawMetricsRecord>, SourceError> {
        let resp = self.client.get(&self.url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(url = %self.url, %status, "metrics backend returned an error status");
            return Err(SourceError::Status(status.as_u16()));
        }

        let envelope: Envelope = resp.json().await?;
        if !envelope.success {
            let message = envelope
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "no message".to_owned());
            return Err(SourceError::Rejected(message));
        }

        if envelope.data.is_null() {
            tracing::debug!(url = %self.url, "metrics backend returned no data");
            return Ok(None);
        }

        Ok(Some(RawMetricsRecord::from(&envelope.data)))
    }
}

// ── No backend ─────────────────────────────────────────────────────────────

/// Used when no metrics backend is configured; the dashboard then shows
/// fallback values only.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMetricsSource;

#[async_trait]
impl MetricsSource for NullMetricsSource {
    fn name(&self) -> &'static str {
        "none"
    }

    async fn fetch(&self) -> Result<Option<RawMetricsRecord>, SourceError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_mock_returns_base_values() {
        let raw = MockMetricsSource::fixed().fetch().await.unwrap().unwrap();
        let current = raw.current.unwrap();
        assert_eq!(current.articles, Some(45));
        assert_eq!(current.views, Some(12_543));
        assert_eq!(current.revenue, Some(1_847.50));
        assert_eq!(raw.growth.unwrap().views, Some(27.0));
    }

    #[tokio::test]
    async fn jittered_mock_stays_within_ten_percent() {
        let source = MockMetricsSource::new();
        for _ in 0..20 {
            let raw = source.fetch().await.unwrap().unwrap();
            let views = raw.current.unwrap().views.unwrap();
            assert!((11_288..=13_798).contains(&views), "views {views}");
        }
    }

    #[tokio::test]
    async fn mock_chart_covers_a_week_in_date_order() {
        let before = Utc::now().date_naive();
        let raw = MockMetricsSource::fixed().fetch().await.unwrap().unwrap();
        let after = Utc::now().date_naive();

        let chart = raw.revenue_chart.unwrap();
        assert_eq!(chart.len(), 7);
        assert!(chart
            .windows(2)
            .all(|w| w[1].date - w[0].date == chrono::Duration::days(1)));
        assert!(before <= chart[6].date && chart[6].date <= after);
    }

    #[tokio::test]
    async fn null_source_has_nothing() {
        assert!(NullMetricsSource.fetch().await.unwrap().is_none());
        assert_eq!(NullMetricsSource.name(), "none");
    }

    #[test]
    fn source_error_messages() {
        assert_eq!(
            SourceError::Status(503).to_string(),
            "metrics backend returned HTTP 503"
        );
        assert_eq!(
            SourceError::Rejected("quota exceeded".into()).to_string(),
            "metrics backend rejected the request: quota exceeded"
        );
    }
}

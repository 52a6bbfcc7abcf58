use anyhow::{Context, Result};
use std::time::Duration;

/// Where dashboard statistics come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricsMode {
    /// Generated numbers, for demos and local development.
    Mock,
    /// The real metrics backend. The URL never has a trailing slash.
    Live { backend_url: String },
    /// No backend at all; the dashboard renders fallbacks only.
    Disabled,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind the HTTP server to, e.g. "0.0.0.0"
    pub host: String,

    /// Port to listen on
    pub port: u16,

    pub metrics_mode: MetricsMode,

    /// Upper bound on a single backend request
    pub metrics_timeout: Duration,

    /// Whether the mock source varies its numbers between requests
    pub mock_jitter: bool,
}

impl AppConfig {
    /// Load configuration from environment variables (populated by dotenvy before this is called).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key → value lookup.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = var("PORT")
            .unwrap_or_else(|| "3000".into())
            .parse::<u16>()
            .context("PORT must be a valid port number (1-65535)")?;

        let backend_url = var("METRICS_BACKEND_URL")
            .map(|url| url.trim().trim_end_matches('/').to_owned())
            .filter(|url| !url.is_empty());

        let metrics_mode = match var("METRICS_SOURCE")
            .unwrap_or_else(|| "mock".into())
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "mock" => MetricsMode::Mock,
            "live" => MetricsMode::Live {
                backend_url: backend_url
                    .context("METRICS_BACKEND_URL must be set when METRICS_SOURCE=live")?,
            },
            "none" | "off" => MetricsMode::Disabled,
            other => anyhow::bail!("unknown METRICS_SOURCE '{other}' (expected mock, live or none)"),
        };

        let timeout_secs = match var("METRICS_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "METRICS_TIMEOUT_SECS is not a whole number of seconds, using 5");
                5
            }),
            None => 5,
        };

        let mock_jitter = var("MOCK_JITTER")
            .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
            .unwrap_or(true);

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            metrics_mode,
            metrics_timeout: Duration::from_secs(timeout_secs),
            mock_jitter,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_to_mock_on_port_3000() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.metrics_mode, MetricsMode::Mock);
        assert_eq!(config.metrics_timeout, Duration::from_secs(5));
        assert!(config.mock_jitter);
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn live_mode_requires_backend_url() {
        let err = load(&[("METRICS_SOURCE", "live")]).unwrap_err();
        assert!(err.to_string().contains("METRICS_BACKEND_URL"));

        let err = load(&[("METRICS_SOURCE", "live"), ("METRICS_BACKEND_URL", "  / ")]).unwrap_err();
        assert!(err.to_string().contains("METRICS_BACKEND_URL"));

        let config = load(&[
            ("METRICS_SOURCE", "Live"),
            ("METRICS_BACKEND_URL", "http://metrics.internal/api/stats/"),
        ])
        .unwrap();
        assert_eq!(
            config.metrics_mode,
            MetricsMode::Live {
                backend_url: "http://metrics.internal/api/stats".to_string()
            }
        );
    }

    #[test]
    fn backend_url_is_ignored_outside_live_mode() {
        let config = load(&[("METRICS_BACKEND_URL", "http://metrics.internal")]).unwrap();
        assert_eq!(config.metrics_mode, MetricsMode::Mock);
    }

    #[test]
    fn rejects_bad_port_and_unknown_mode() {
        assert!(load(&[("PORT", "99999")]).is_err());
        assert!(load(&[("METRICS_SOURCE", "carrier-pigeon")]).is_err());
    }

    #[test]
    fn parses_optional_knobs() {
        let config = load(&[
            ("METRICS_SOURCE", "none"),
            ("METRICS_TIMEOUT_SECS", "12"),
            ("MOCK_JITTER", "false"),
        ])
        .unwrap();
        assert_eq!(config.metrics_mode, MetricsMode::Disabled);
        assert_eq!(config.metrics_timeout, Duration::from_secs(12));
        assert!(!config.mock_jitter);
    }

    #[test]
    fn unparseable_timeout_falls_back_to_five_seconds() {
        let config = load(&[("METRICS_TIMEOUT_SECS", "soon")]).unwrap();
        assert_eq!(config.metrics_timeout, Duration::from_secs(5));
    }
}

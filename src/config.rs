//! Configuration module

use std::env;
use std::time::Duration;

use crate::api::{ClientConfig, ReportMethod};
use crate::report::threshold::{DEFAULT_THRESHOLD, MAX_THRESHOLD, MIN_THRESHOLD};
use crate::report::DEFAULT_WINDOW;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the collaborator service
    pub api_url: String,

    /// Port this client listens on
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Attempts shown per report
    pub report_window: usize,

    /// Display threshold used when a request does not pick one
    pub default_threshold: f64,

    /// How the report filter is sent upstream
    pub report_method: ReportMethod,

    /// Upstream request timeout; `None` keeps the transport default
    pub request_timeout: Option<Duration>,

    /// Allowed CORS origins; empty means any, or none in production
    pub cors_allowed_origins: Vec<String>,

    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            api_url: lookup("API_URL")
                .map(|u| u.trim().trim_end_matches('/').to_string())
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| "http://localhost:8080".to_string()),

            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),

            environment: lookup("ENVIRONMENT")
                .unwrap_or_else(|| "development".to_string()),

            report_window: lookup("REPORT_WINDOW")
                .and_then(|w| w.parse::<usize>().ok())
                .map(|w| w.max(1))
                .unwrap_or(DEFAULT_WINDOW),

            default_threshold: lookup("DEFAULT_THRESHOLD")
                .and_then(|t| t.parse::<f64>().ok())
                .filter(|t| t.is_finite())
                .map(|t| t.clamp(MIN_THRESHOLD, MAX_THRESHOLD))
                .unwrap_or(DEFAULT_THRESHOLD),

            report_method: lookup("REPORT_METHOD")
                .and_then(|m| m.parse().ok())
                .unwrap_or_default(),

            request_timeout: lookup("REQUEST_TIMEOUT_SECS")
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|s| *s > 0)
                .map(Duration::from_secs),

            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty() && o != "*")
                        .collect()
                })
                .unwrap_or_default(),

            log_format: match lookup("LOG_FORMAT").as_deref() {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Settings for the collaborator client
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api_url.clone(),
            timeout: self.request_timeout,
            report_method: self.report_method,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.api_url, "http://localhost:8080");
        assert_eq!(config.port, 3000);
        assert_eq!(config.report_window, 100);
        assert_eq!(config.default_threshold, 0.88);
        assert_eq!(config.report_method, ReportMethod::Get);
        assert_eq!(config.request_timeout, None);
        assert!(config.cors_allowed_origins.is_empty());
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(!config.is_production());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("API_URL", "https://auth.example.com/"),
            ("PORT", "9000"),
            ("ENVIRONMENT", "production"),
            ("REPORT_WINDOW", "25"),
            ("DEFAULT_THRESHOLD", "0.95"),
            ("REPORT_METHOD", "post"),
            ("REQUEST_TIMEOUT_SECS", "15"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example.com, https://b.example.com"),
            ("LOG_FORMAT", "json"),
        ]);

        assert_eq!(config.api_url, "https://auth.example.com");
        assert_eq!(config.port, 9000);
        assert!(config.is_production());
        assert_eq!(config.report_window, 25);
        assert_eq!(config.default_threshold, 0.95);
        assert_eq!(config.report_method, ReportMethod::Post);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(15)));
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.example.com", "https://b.example.com"]
        );
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_out_of_range_values_are_bounded() {
        let config = config_from(&[
            ("REPORT_WINDOW", "0"),
            ("DEFAULT_THRESHOLD", "3"),
            ("REQUEST_TIMEOUT_SECS", "0"),
            ("PORT", "not-a-port"),
        ]);

        assert_eq!(config.report_window, 1);
        assert_eq!(config.default_threshold, 1.0);
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.port, 3000);
    }
}

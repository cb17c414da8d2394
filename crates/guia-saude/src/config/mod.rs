use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use reqwest::Url;

use crate::workflows::triage::catalog::FailurePolicy;
use crate::workflows::triage::evaluation::UrgencyPolicy;
use crate::workflows::triage::service::DEFAULT_DEGRADED_RETRY;
use crate::workflows::triage::session::TriageSettings;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

pub const DEFAULT_CATALOG_BASE_URL: &str = "http://127.0.0.1:3333";

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub catalog: CatalogConfig,
    pub triage: TriageSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let raw_base_url =
            env::var("CATALOG_BASE_URL").unwrap_or_else(|_| DEFAULT_CATALOG_BASE_URL.to_string());
        let base_url = Url::parse(raw_base_url.trim()).map_err(|err| {
            ConfigError::InvalidCatalogUrl {
                value: raw_base_url.clone(),
                detail: err.to_string(),
            }
        })?;

        let failure_policy = match env::var("CATALOG_FAILURE_POLICY") {
            Ok(raw) => raw
                .parse::<FailurePolicy>()
                .map_err(|_| ConfigError::InvalidFailurePolicy(raw))?,
            Err(_) => FailurePolicy::default(),
        };

        let degraded_retry = match env::var("CATALOG_DEGRADED_RETRY_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidDegradedRetry(raw))?,
            Err(_) => DEFAULT_DEGRADED_RETRY,
        };

        let defaults = TriageSettings::default();
        let moderate_threshold = match env::var("TRIAGE_MODERATE_THRESHOLD") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidThreshold(raw))?,
            Err(_) => defaults.urgency.moderate_threshold,
        };
        let alert_escalates = match env::var("TRIAGE_ALERT_ESCALATES") {
            Ok(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidAlertEscalation(raw))?,
            Err(_) => defaults.urgency.alert_escalates,
        };
        let suggested_units = match env::var("TRIAGE_SUGGESTED_UNITS") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|count| *count > 0)
                .ok_or(ConfigError::InvalidSuggestedUnits(raw))?,
            Err(_) => defaults.suggested_units,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                include_targets: environment == AppEnvironment::Development,
            },
            catalog: CatalogConfig {
                base_url,
                failure_policy,
                degraded_retry,
            },
            triage: TriageSettings {
                urgency: UrgencyPolicy {
                    moderate_threshold,
                    alert_escalates,
                },
                suggested_units,
            },
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub include_targets: bool,
}

/// Upstream catalog location and how its failures are handled.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: Url,
    pub failure_policy: FailurePolicy,
    /// How long bundled data is served before the live catalog is tried again.
    pub degraded_retry: Duration,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidCatalogUrl { value: String, detail: String },
    InvalidFailurePolicy(String),
    InvalidDegradedRetry(String),
    InvalidThreshold(String),
    InvalidAlertEscalation(String),
    InvalidSuggestedUnits(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidCatalogUrl { value, detail } => {
                write!(f, "CATALOG_BASE_URL '{value}' is not a valid URL: {detail}")
            }
            ConfigError::InvalidFailurePolicy(value) => write!(
                f,
                "CATALOG_FAILURE_POLICY '{value}' must be 'fallback' or 'fail_closed'"
            ),
            ConfigError::InvalidDegradedRetry(value) => write!(
                f,
                "CATALOG_DEGRADED_RETRY_SECS '{value}' must be a non-negative number of seconds"
            ),
            ConfigError::InvalidThreshold(value) => write!(
                f,
                "TRIAGE_MODERATE_THRESHOLD '{value}' must be a non-negative integer"
            ),
            ConfigError::InvalidAlertEscalation(value) => {
                write!(f, "TRIAGE_ALERT_ESCALATES '{value}' must be true or false")
            }
            ConfigError::InvalidSuggestedUnits(value) => write!(
                f,
                "TRIAGE_SUGGESTED_UNITS '{value}' must be a positive integer"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}

use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::affiliate::{AffiliateSettings, ScoringError, ScoringStrategy};

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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub affiliate: AffiliateConfig,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            affiliate: AffiliateConfig::from_env()?,
        })
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
}

/// Link selection defaults and catalog seeding.
#[derive(Debug, Clone)]
pub struct AffiliateConfig {
    /// Used when the catalog store holds no settings row.
    pub fallback_settings: AffiliateSettings,
    pub catalog_seed_path: Option<PathBuf>,
}

impl AffiliateConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = AffiliateSettings::default();

        let strategy = match env::var("AFFILIATE_STRATEGY") {
            Ok(raw) if !raw.trim().is_empty() => raw
                .parse::<ScoringStrategy>()
                .map_err(ConfigError::InvalidStrategy)?,
            _ => defaults.strategy,
        };

        let network_priority = env::var("AFFILIATE_NETWORK_PRIORITY")
            .ok()
            .map(|raw| parse_network_list(&raw))
            .filter(|networks| !networks.is_empty())
            .unwrap_or(defaults.network_priority);

        let track_clicks = match env::var("AFFILIATE_TRACK_CLICKS") {
            Ok(raw) => parse_bool(&raw).ok_or_else(|| ConfigError::InvalidFlag {
                name: "AFFILIATE_TRACK_CLICKS",
                value: raw,
            })?,
            Err(_) => defaults.track_clicks,
        };

        let catalog_seed_path = env::var("CATALOG_SEED_PATH")
            .ok()
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            fallback_settings: AffiliateSettings {
                strategy,
                network_priority,
                track_clicks,
            },
            catalog_seed_path,
        })
    }
}

/// Split a comma-separated network list, dropping blanks.
pub fn parse_network_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|network| !network.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidStrategy(ScoringError),
    InvalidFlag { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidStrategy(err) => write!(f, "AFFILIATE_STRATEGY: {}", err),
            ConfigError::InvalidFlag { name, value } => {
                write!(f, "{} must be true or false (got '{}')", name, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidFlag { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidStrategy(err) => Some(err),
        }
    }
}

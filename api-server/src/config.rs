//! HTTP server settings

use core_runtime::config::parse_bool;
use core_runtime::logging::{LogFormat, LogLevel, LoggingConfig};
use core_runtime::{Error, Result};

pub const DEFAULT_APP_NAME: &str = "Social Media API";
pub const DEFAULT_API_PREFIX: &str = "/api/v1";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

/// Settings of the REST facade, read from the environment
///
/// | Variable | Default |
/// |---|---|
/// | `APP_NAME` | `Social Media API` |
/// | `APP_VERSION` | crate version |
/// | `DEBUG` | `false` |
/// | `API_V1_PREFIX` | `/api/v1` |
/// | `HOST` / `PORT` | `0.0.0.0` / `8000` |
/// | `CORS_ORIGINS` | `*` (comma separated list) |
/// | `LOG_LEVEL` | `debug` when `DEBUG`, else `info` |
/// | `LOG_FORMAT` | `pretty` in debug builds, `json` in release |
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub app_name: String,
    pub app_version: String,
    pub debug: bool,
    pub api_prefix: String,
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub log_level: LogLevel,
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            debug: false,
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors_origins: vec!["*".to_string()],
            log_level: LogLevel::Info,
            log_format: LogFormat::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = ServerConfig::default();

        if let Some(name) = var("APP_NAME") {
            config.app_name = name;
        }
        if let Some(version) = var("APP_VERSION") {
            config.app_version = version;
        }
        if let Some(raw) = var("DEBUG") {
            config.debug = parse_bool("DEBUG", &raw)?;
        }
        if let Some(prefix) = var("API_V1_PREFIX") {
            config.api_prefix = normalize_prefix(&prefix)?;
        }
        if let Some(host) = var("HOST") {
            config.host = host;
        }
        if let Some(raw) = var("PORT") {
            config.port = raw
                .parse()
                .map_err(|e| Error::Config(format!("Invalid value for PORT: '{}' ({})", raw, e)))?;
        }
        if let Some(raw) = var("CORS_ORIGINS") {
            config.cors_origins = raw
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect();
        }

        config.log_level = match var("LOG_LEVEL") {
            Some(raw) => raw.parse()?,
            None if config.debug => LogLevel::Debug,
            None => LogLevel::Info,
        };
        if let Some(raw) = var("LOG_FORMAT") {
            config.log_format = raw.parse()?;
        }

        Ok(config)
    }

    /// `host:port` to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig::default()
            .with_format(self.log_format)
            .with_level(self.log_level)
            .with_thread_info(self.debug)
    }

    /// Whether any origin is accepted
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|origin| origin == "*")
    }
}

/// Prefix must be a non-root absolute path; trailing slashes are dropped
fn normalize_prefix(raw: &str) -> Result<String> {
    let trimmed = raw.trim_end_matches('/');
    if !trimmed.starts_with('/') || trimmed.len() < 2 {
        return Err(Error::Config(format!(
            "API_V1_PREFIX must be an absolute path such as /api/v1, got '{}'",
            raw
        )));
    }
    Ok(trimmed.to_string())
}

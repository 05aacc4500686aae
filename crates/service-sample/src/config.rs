//! # Configuration
//!
//! Settings come from the environment, with a `.env` file loaded first when present.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `API_URL` | `http://localhost` | scheme and host of the API |
//! | `API_PORT` | `80` | port of the API |
//! | `API_HEADERS` | `{"Accept":"application/json"}` | JSON object of default headers |
//! | `API_SERVICES` | `config/services.json` | path of the service definitions file |

use service_framework::{ConfigError, Headers};
use std::path::PathBuf;
use tracing::debug;

/// Connection settings for the HTTP transport.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpConfig {
    pub url: String,
    pub port: u16,
    /// Sent with every request; per-request headers override them.
    pub headers: Headers,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost".to_string(),
            port: 80,
            headers: Headers::from([("Accept".to_string(), "application/json".to_string())]),
        }
    }
}

impl HttpConfig {
    /// `<url>:<port>`, the prefix every request path is appended to.
    pub fn base_url(&self) -> String {
        format!("{}:{}", self.url.trim_end_matches('/'), self.port)
    }

    /// Builds the config from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let url = lookup("API_URL").unwrap_or(defaults.url);
        let port = match lookup("API_PORT") {
            Some(port) => port.parse().map_err(|e: std::num::ParseIntError| ConfigError::Env {
                var: "API_PORT".to_string(),
                reason: e.to_string(),
            })?,
            None => defaults.port,
        };
        let headers = match lookup("API_HEADERS") {
            Some(json) => serde_json::from_str(&json).map_err(|e| ConfigError::Env {
                var: "API_HEADERS".to_string(),
                reason: e.to_string(),
            })?,
            None => defaults.headers,
        };

        Ok(Self { url, port, headers })
    }
}

/// Everything the application needs at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub services_path: PathBuf,
}

impl AppConfig {
    /// Loads `.env` (if any), then reads the environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "Loaded .env");
        }
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let services_path = lookup("API_SERVICES")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("config/services.json"));
        Ok(Self {
            http: HttpConfig::from_lookup(&lookup)?,
            services_path,
        })
    }
}

//! Environment-style configuration
//!
//! All settings come from environment variables (a `.env` file is honored
//! by the binary before this module runs). Required variables fail startup
//! with a descriptive error; everything else has a default.
//!
//! - `DATABASE_URL`: Postgres connection string (required)
//! - `SCRAPBOOK_MAX_CONNECTIONS`: store pool size (default: 5)
//! - `SCRAPBOOK_MEDIA_ENDPOINT`: bucket endpoint base URL (required)
//! - `SCRAPBOOK_MEDIA_BUCKET`: bucket name (required)
//! - `SCRAPBOOK_MEDIA_TOKEN`: bucket API token (required)
//! - `SCRAPBOOK_MEDIA_PUBLIC_BASE`: public URL base (default: endpoint/bucket)
//! - `SCRAPBOOK_MEDIA_PREFIX`: object key prefix (default: todos)
//! - `SCRAPBOOK_BIND`: listen address (default: 127.0.0.1:3030)
//! - `SCRAPBOOK_CORS_PERMISSIVE`: allow any origin when "1" or "true"
//! - `SCRAPBOOK_PAGE_SIZE`: default list page size (default: 20)

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;

/// Default maximum connections for the store pool.
/// Kept low for single-collection tooling.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default number of items per list page.
const DEFAULT_PAGE_SIZE: u32 = 20;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Top-level service configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub media: MediaConfig,
    pub http: HttpConfig,
}

impl AppConfig {
    /// Load every section from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            store: StoreConfig::from_env()?,
            media: MediaConfig::from_env()?,
            http: HttpConfig::from_env()?,
        })
    }
}

/// Item store connection settings
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub database_url: String,
    pub max_connections: u32,
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            max_connections: parsed("SCRAPBOOK_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
        })
    }
}

/// Bucket storage settings for uploaded images
#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub endpoint: String,
    pub bucket: String,
    pub api_token: String,
    pub public_base: String,
    pub key_prefix: String,
}

impl MediaConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let endpoint = required("SCRAPBOOK_MEDIA_ENDPOINT")?;
        let bucket = required("SCRAPBOOK_MEDIA_BUCKET")?;
        let public_base = env::var("SCRAPBOOK_MEDIA_PUBLIC_BASE")
            .unwrap_or_else(|_| format!("{}/{}", endpoint.trim_end_matches('/'), bucket));

        Ok(Self {
            api_token: required("SCRAPBOOK_MEDIA_TOKEN")?,
            key_prefix: env::var("SCRAPBOOK_MEDIA_PREFIX").unwrap_or_else(|_| "todos".to_owned()),
            endpoint,
            bucket,
            public_base,
        })
    }

    /// Public URL for an uploaded object key.
    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base.trim_end_matches('/'), key)
    }
}

/// HTTP listener settings
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub bind_addr: SocketAddr,
    pub cors_permissive: bool,
    pub page_size: u32,
}

impl HttpConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: parsed("SCRAPBOOK_BIND", SocketAddr::from(([127, 0, 0, 1], 3030)))?,
            cors_permissive: flag("SCRAPBOOK_CORS_PERMISSIVE"),
            page_size: parsed("SCRAPBOOK_PAGE_SIZE", DEFAULT_PAGE_SIZE)?,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn parsed<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

fn flag(name: &str) -> bool {
    matches!(env::var(name).as_deref(), Ok("1") | Ok("true"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media_config(public_base: &str) -> MediaConfig {
        MediaConfig {
            endpoint: "https://storage.example.com".to_owned(),
            bucket: "scrapbook".to_owned(),
            api_token: "token".to_owned(),
            public_base: public_base.to_owned(),
            key_prefix: "todos".to_owned(),
        }
    }

    #[test]
    fn object_url_joins_key() {
        let config = media_config("https://cdn.example.com");
        assert_eq!(
            config.object_url("todos/a.jpg"),
            "https://cdn.example.com/todos/a.jpg"
        );
    }

    #[test]
    fn object_url_tolerates_trailing_slash() {
        let config = media_config("https://cdn.example.com/");
        assert_eq!(
            config.object_url("todos/a.jpg"),
            "https://cdn.example.com/todos/a.jpg"
        );
    }
}

//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string
//! - `GEMINI_API_KEY` - Google Gemini API key (content generation)
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `SHOPIFY_API_VERSION` - Admin API version (default: 2024-01)
//! - `GEMINI_MODEL` - Gemini model ID (default: gemma-3-4b-it)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance sample rate (default: 0.1)

use std::net::IpAddr;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3001;
const DEFAULT_API_VERSION: &str = "2024-01";
const DEFAULT_GEMINI_MODEL: &str = "gemma-3-4b-it";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Shopify Admin API configuration
    pub shopify: ShopifyConfig,
    /// Gemini content-generation configuration
    pub gemini: GeminiConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Shopify Admin API configuration.
///
/// Per-shop credentials live in the database; only the API version is
/// process-wide.
#[derive(Debug, Clone)]
pub struct ShopifyConfig {
    /// Admin API version used in the GraphQL endpoint path.
    pub api_version: String,
}

/// Gemini content-generation configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct GeminiConfig {
    /// Gemini API key.
    pub api_key: SecretString,
    /// Model ID (e.g. `gemma-3-4b-it`).
    pub model: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn parse_env<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnvVar(name.to_string(), e.to_string()))
}

impl AdminConfig {
    /// Load the configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a value
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = SecretString::from(required("ADMIN_DATABASE_URL")?);

        let host_raw = optional("ADMIN_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let host: IpAddr = parse_env("ADMIN_HOST", &host_raw)?;

        let port = match optional("ADMIN_PORT") {
            Some(raw) => parse_env("ADMIN_PORT", &raw)?,
            None => DEFAULT_PORT,
        };

        let shopify = ShopifyConfig {
            api_version: optional("SHOPIFY_API_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
        };

        let gemini = GeminiConfig {
            api_key: SecretString::from(required("GEMINI_API_KEY")?),
            model: optional("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
        };

        let sentry_sample_rate = match optional("SENTRY_SAMPLE_RATE") {
            Some(raw) => parse_env("SENTRY_SAMPLE_RATE", &raw)?,
            None => 1.0,
        };
        let sentry_traces_sample_rate = match optional("SENTRY_TRACES_SAMPLE_RATE") {
            Some(raw) => parse_env("SENTRY_TRACES_SAMPLE_RATE", &raw)?,
            None => 0.1,
        };

        Ok(Self {
            database_url,
            host,
            port,
            shopify,
            gemini,
            sentry_dsn: optional("SENTRY_DSN"),
            sentry_environment: optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Socket address the server binds to.
    #[must_use]
    pub const fn socket_addr(&self) -> std::net::SocketAddr {
        std::net::SocketAddr::new(self.host, self.port)
    }
}

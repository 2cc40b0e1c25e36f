//! Site configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults run the site locally against a
//! backend on `localhost:5000`.
//!
//! - `PORTFOLIO_HOST` - Bind address (default: 127.0.0.1)
//! - `PORTFOLIO_PORT` - Listen port (default: 3000)
//! - `PORTFOLIO_BASE_URL` - Public URL of the site (default: <http://localhost:3000>)
//! - `PORTFOLIO_ENV` - `development` or `production` (default: development)
//! - `PORTFOLIO_API_URL` - Backend API base URL, overrides the environment default
//! - `PORTFOLIO_VISITOR_IDLE_SECS` - Drop idle visitor state after this many seconds (default: 7200)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Backend used by local development.
pub const DEVELOPMENT_API_URL: &str = "http://localhost:5000/api";

/// Backend used in production.
pub const PRODUCTION_API_URL: &str = "https://portfolio-backend-mqnk.onrender.com/api";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Deployment environment, which selects the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Backend base URL used when `PORTFOLIO_API_URL` is not set.
    #[must_use]
    pub const fn default_api_url(self) -> &'static str {
        match self {
            Self::Development => DEVELOPMENT_API_URL,
            Self::Production => PRODUCTION_API_URL,
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!("expected development or production, got '{other}'")),
        }
    }
}

/// Site configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the site
    pub base_url: String,
    /// Deployment environment
    pub environment: Environment,
    /// Backend API configuration
    pub api: ApiConfig,
    /// How long an idle visitor's state is kept in memory
    pub visitor_idle: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Backend REST API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to (no trailing slash).
    pub base_url: String,
}

impl SiteConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env_or_default::<IpAddr>("PORTFOLIO_HOST", "127.0.0.1")?;
        let port = parse_env_or_default::<u16>("PORTFOLIO_PORT", "3000")?;
        let base_url = get_env_or_default("PORTFOLIO_BASE_URL", "http://localhost:3000");
        let environment = parse_env_or_default::<Environment>("PORTFOLIO_ENV", "development")?;
        let api = ApiConfig::from_env(environment)?;
        let idle_secs = parse_env_or_default::<u64>("PORTFOLIO_VISITOR_IDLE_SECS", "7200")?;

        Ok(Self {
            host,
            port,
            base_url,
            environment,
            api,
            visitor_idle: Duration::from_secs(idle_secs),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env_or_default("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Local development defaults pointed at `api`, ignoring the environment.
    #[must_use]
    pub fn local(api: ApiConfig) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            environment: Environment::Development,
            api,
            visitor_idle: Duration::from_secs(7200),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl ApiConfig {
    fn from_env(environment: Environment) -> Result<Self, ConfigError> {
        let raw = get_optional_env("PORTFOLIO_API_URL")
            .unwrap_or_else(|| environment.default_api_url().to_string());
        Self::new(&raw).map_err(|e| ConfigError::InvalidEnvVar("PORTFOLIO_API_URL".to_string(), e))
    }

    /// Build an API configuration from a base URL.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if the URL is not absolute
    /// `http`/`https`.
    pub fn new(base_url: &str) -> Result<Self, String> {
        let url = Url::parse(base_url).map_err(|e| e.to_string())?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!("unsupported scheme '{}'", url.scheme()));
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full URL for an endpoint path such as `/auth/verify`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SEAGRAPE_DATABASE_URL` - `PostgreSQL` connection string
//!
//! ## Optional
//! - `SEAGRAPE_HOST` - Bind address (default: 127.0.0.1)
//! - `SEAGRAPE_PORT` - Listen port (default: 5000)
//! - `SEAGRAPE_ENVIRONMENT` - `development` or `production` (default: development)
//! - `SHOPIFY_API_VERSION` - Admin API version (default: 2026-01)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Deployment environment.
///
/// Controls whether internal error detail is included in failure responses;
/// production suppresses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Whether this is a production deployment.
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }

    /// Name as used in environment variables and Sentry tags.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!("unknown environment \"{other}\"")),
        }
    }
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Shopify Admin API version used for metafield sync
    pub shopify_api_version: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or any
    /// variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let database_url = SecretString::from(required("SEAGRAPE_DATABASE_URL")?);

        let host = optional("SEAGRAPE_HOST")
            .map_or(Ok(IpAddr::from([127, 0, 0, 1])), |v| {
                v.parse()
                    .map_err(|_| ConfigError::InvalidEnvVar("SEAGRAPE_HOST".to_owned(), v))
            })?;

        let port = optional("SEAGRAPE_PORT").map_or(Ok(5000), |v| {
            v.parse()
                .map_err(|_| ConfigError::InvalidEnvVar("SEAGRAPE_PORT".to_owned(), v))
        })?;

        let environment = optional("SEAGRAPE_ENVIRONMENT")
            .map_or(Ok(Environment::default()), |v| {
                v.parse().map_err(|e: String| {
                    ConfigError::InvalidEnvVar("SEAGRAPE_ENVIRONMENT".to_owned(), e)
                })
            })?;

        let shopify_api_version =
            optional("SHOPIFY_API_VERSION").unwrap_or_else(|| "2026-01".to_owned());

        Ok(Self {
            database_url,
            host,
            port,
            environment,
            shopify_api_version,
            sentry_dsn: optional("SENTRY_DSN"),
            sentry_environment: optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Socket address to bind the listener to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_owned()))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            "production".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert_eq!(
            " Dev ".parse::<Environment>().unwrap(),
            Environment::Development
        );
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_environment_default_is_development() {
        assert!(!Environment::default().is_production());
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            database_url: SecretString::from("postgres://localhost/seagrape".to_owned()),
            host: IpAddr::from([0, 0, 0, 0]),
            port: 8080,
            environment: Environment::Development,
            shopify_api_version: "2026-01".to_owned(),
            sentry_dsn: None,
            sentry_environment: None,
        };
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
    }
}

//! Menu service configuration.
//!
//! Configuration is loaded from environment variables. All sensitive
//! fields are redacted in Debug output.

use std::collections::HashMap;
use std::env;
use std::fmt;
use thiserror::Error;

/// Default server bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Default SQLite database URL. `mode=rwc` creates the file on first run.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://drinks.db?mode=rwc";

/// Path appended to the auth domain when no explicit JWKS URL is set.
pub const WELL_KNOWN_JWKS_PATH: &str = "/.well-known/jwks.json";

/// Menu service configuration.
///
/// Loaded from environment variables with sensible defaults.
/// Database URL is redacted in Debug output to prevent credential leakage.
#[derive(Clone)]
pub struct Config {
    /// SQLite connection URL.
    pub database_url: String,

    /// Server bind address (default: "0.0.0.0:8080").
    pub bind_address: String,

    /// Tenant domain, scheme-free (e.g. "dev-barkeep.us.auth0.com").
    /// The token issuer and default JWKS URL are derived from it.
    pub auth_domain: String,

    /// Expected `aud` claim on access tokens.
    pub api_audience: String,

    /// URL of the JWKS document used to verify token signatures.
    pub jwks_url: String,
}

/// Custom Debug implementation that redacts sensitive fields.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("bind_address", &self.bind_address)
            .field("auth_domain", &self.auth_domain)
            .field("api_audience", &self.api_audience)
            .field("jwks_url", &self.jwks_url)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid auth domain configuration: {0}")]
    InvalidAuthDomain(String),

    #[error("Invalid API audience configuration: {0}")]
    InvalidApiAudience(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let auth_domain = vars
            .get("AUTH_DOMAIN")
            .ok_or_else(|| ConfigError::MissingEnvVar("AUTH_DOMAIN".to_string()))?
            .clone();

        if auth_domain.is_empty() {
            return Err(ConfigError::InvalidAuthDomain(
                "AUTH_DOMAIN must not be empty".to_string(),
            ));
        }

        if auth_domain.contains("://") {
            return Err(ConfigError::InvalidAuthDomain(format!(
                "AUTH_DOMAIN must be a bare domain without a URL scheme, got '{}'",
                auth_domain
            )));
        }

        let api_audience = vars
            .get("API_AUDIENCE")
            .ok_or_else(|| ConfigError::MissingEnvVar("API_AUDIENCE".to_string()))?
            .clone();

        if api_audience.is_empty() {
            return Err(ConfigError::InvalidApiAudience(
                "API_AUDIENCE must not be empty".to_string(),
            ));
        }

        // JWKS_URL override exists for setups where the key set is not
        // served from the tenant domain (e.g. tests)
        let jwks_url = vars.get("JWKS_URL").cloned().unwrap_or_else(|| {
            format!("https://{}{}", auth_domain, WELL_KNOWN_JWKS_PATH)
        });

        let database_url = vars
            .get("DATABASE_URL")
            .cloned()
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        Ok(Config {
            database_url,
            bind_address,
            auth_domain,
            api_audience,
            jwks_url,
        })
    }

    /// Expected `iss` claim, derived from the auth domain.
    ///
    /// Tokens carry the issuer with a trailing slash, so the derived
    /// value keeps it.
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.auth_domain)
    }
}

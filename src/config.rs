//! Centralized configuration.
//!
//! All configuration is loaded from environment variables and validated
//! at startup. The signing secret is captured once here and handed to the
//! codec at construction; nothing else reads it later.

use crate::error::TokenError;
use std::env;
use std::time::Duration;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Process-wide signing secret. Read-only after startup, wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    pub fn new(bytes: Vec<u8>) -> Self {
        SigningSecret(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningSecret(***)")
    }
}

/// Which token store backs the service.
#[derive(Debug, Clone)]
pub enum StoreBackend {
    /// Redis (production default)
    Redis {
        /// Connection URL
        url: String,
    },
    /// In-process map, for development and tests
    Memory,
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Shared secret for credential signing
    pub signing_secret: SigningSecret,
    /// Access credential TTL
    pub access_token_ttl: Duration,
    /// Refresh credential TTL
    pub refresh_token_ttl: Duration,
    /// Store backend selection
    pub store: StoreBackend,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `TOKEN_SECRET` is missing or any variable
    /// fails to parse.
    pub fn from_env() -> Result<Self, TokenError> {
        dotenvy::dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_env("PORT", 8080)?;

        let secret = env::var("TOKEN_SECRET")
            .map_err(|_| TokenError::config("TOKEN_SECRET must be set"))?;
        if secret.is_empty() {
            return Err(TokenError::config("TOKEN_SECRET must not be empty"));
        }

        let access_token_ttl = Duration::from_secs(parse_env("ACCESS_TOKEN_TTL", 900)?);
        let refresh_token_ttl = Duration::from_secs(parse_env("REFRESH_TOKEN_TTL", 604_800)?);

        let store = match env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "redis".to_string())
            .to_lowercase()
            .as_str()
        {
            "redis" => StoreBackend::Redis {
                url: env::var("REDIS_URL")
                    .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
            },
            "memory" => StoreBackend::Memory,
            other => {
                return Err(TokenError::config(format!(
                    "Invalid STORE_BACKEND: {}",
                    other
                )))
            }
        };

        Ok(Self {
            host,
            port,
            signing_secret: SigningSecret::new(secret.into_bytes()),
            access_token_ttl,
            refresh_token_ttl,
            store,
        })
    }
}

/// Parse environment variable with default value.
fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T, TokenError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(val) => val
            .parse()
            .map_err(|e| TokenError::config(format!("Invalid {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

use std::env;
use anyhow::{Context, Result};
use zeroize::Zeroizing;

/// Default access-token lifetime in minutes.
const DEFAULT_ACCESS_TOKEN_TTL_MINUTES: i64 = 10;
/// Default refresh-token lifetime in days.
const DEFAULT_REFRESH_TOKEN_TTL_DAYS: i64 = 7;
/// Default listen address for the HTTP server.
const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The URL of the PostgreSQL database.
    pub database_url: String,
    /// The symmetric key used to sign access tokens.
    pub jwt_secret: Zeroizing<String>,
    /// Lifetime of an access token, in minutes.
    pub access_token_ttl_minutes: i64,
    /// Lifetime of a refresh token, in days.
    pub refresh_token_ttl_days: i64,
    /// The address the HTTP server binds to.
    pub listen_addr: String,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// `DATABASE_URL` and `JWT_SECRET` are required; the token lifetimes and
    /// listen address fall back to defaults.
    pub fn from_env() -> Result<Self> {
        let jwt_secret = env::var("JWT_SECRET")
            .context("JWT_SECRET must be set (generate with: openssl rand -hex 32)")?;

        if jwt_secret.is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            jwt_secret: Zeroizing::new(jwt_secret),
            access_token_ttl_minutes: env::var("ACCESS_TOKEN_TTL_MINUTES")
                .unwrap_or_else(|_| DEFAULT_ACCESS_TOKEN_TTL_MINUTES.to_string())
                .parse()
                .context("Invalid ACCESS_TOKEN_TTL_MINUTES")?,
            refresh_token_ttl_days: env::var("REFRESH_TOKEN_TTL_DAYS")
                .unwrap_or_else(|_| DEFAULT_REFRESH_TOKEN_TTL_DAYS.to_string())
                .parse()
                .context("Invalid REFRESH_TOKEN_TTL_DAYS")?,
            listen_addr: env::var("LISTEN_ADDR")
                .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string()),
        })
    }
}

//! Configuration module for environment variable parsing.
//!
//! All configuration is read once at startup and injected into the
//! handlers; nothing reads the environment per-request.

use std::env;

use anyhow::{bail, Context, Result};

use crate::web::signature::decode_secret;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection URL
    pub database_url: String,

    /// Clerk webhook signing secret (`whsec_` prefixed base64)
    pub webhook_secret: String,

    /// Port for the web server to listen on
    pub port: u16,

    /// Maximum age in seconds for webhook timestamps
    pub signature_max_age: u64,

    /// Maximum number of connections in the Postgres pool
    pub db_max_connections: u32,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Fails if `DATABASE_URL` or `CLERK_WEBHOOK_SECRET` is missing, or
    /// if the signing secret is not a valid `whsec_` secret. Optional
    /// values fall back to defaults.
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let webhook_secret =
            env::var("CLERK_WEBHOOK_SECRET").context("CLERK_WEBHOOK_SECRET must be set")?;

        if decode_secret(&webhook_secret).is_none() {
            bail!("CLERK_WEBHOOK_SECRET must be a whsec_-prefixed base64 secret");
        }

        Ok(Config {
            database_url,
            webhook_secret,

            port: parse_or("PORT", 8080),

            signature_max_age: parse_or("WEBHOOK_SIGNATURE_MAX_AGE", 300), // 5 minutes default

            db_max_connections: parse_or("DB_MAX_CONNECTIONS", 5),
        })
    }
}

/// Parse an environment variable, falling back to a default when the
/// variable is unset or unparsable.
fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_default() {
        let result: u64 = parse_or("USERSYNC_NONEXISTENT_VAR", 42);
        assert_eq!(result, 42);
    }

    #[test]
    fn test_parse_or_valid() {
        env::set_var("USERSYNC_TEST_PORT", "9999");
        let result: u16 = parse_or("USERSYNC_TEST_PORT", 8080);
        assert_eq!(result, 9999);
        env::remove_var("USERSYNC_TEST_PORT");
    }

    #[test]
    fn test_parse_or_invalid_falls_back() {
        env::set_var("USERSYNC_TEST_BAD_PORT", "not-a-number");
        let result: u16 = parse_or("USERSYNC_TEST_BAD_PORT", 8080);
        assert_eq!(result, 8080);
        env::remove_var("USERSYNC_TEST_BAD_PORT");
    }
}

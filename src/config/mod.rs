//! Application configuration management

use std::env;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Database URL (PostgreSQL)
    pub database_url: String,

    /// JWT signing secret
    pub jwt_secret: String,

    /// Access token lifetime in seconds (default: 15 minutes)
    pub access_token_lifetime: i64,

    /// Refresh token lifetime in seconds (default: 7 days)
    pub refresh_token_lifetime: i64,

    /// Credentials for the bootstrap user created on an empty database
    pub bootstrap_username: Option<String>,
    pub bootstrap_email: Option<String>,
    pub bootstrap_password: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is required")?;

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET is required")?;

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .context("Invalid PORT")?,

            database_url,

            jwt_secret,

            access_token_lifetime: env::var("ACCESS_TOKEN_LIFETIME")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(15 * 60),

            refresh_token_lifetime: env::var("REFRESH_TOKEN_LIFETIME")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(7 * 24 * 60 * 60),

            bootstrap_username: env::var("BOOTSTRAP_USERNAME").ok(),

            bootstrap_email: env::var("BOOTSTRAP_EMAIL").ok(),

            bootstrap_password: env::var("BOOTSTRAP_PASSWORD").ok(),
        })
    }
}

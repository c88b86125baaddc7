use anyhow::{Context, Result};
use std::env;

/// Default TTL for cached events, in seconds.
const DEFAULT_EVENT_CACHE_TTL: u64 = 900;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    /// Keys every encrypted column and the event cache. Required: refusing
    /// to start beats silently storing plaintext.
    pub db_secret: String,
    pub port: u16,
    pub redis_url: Option<String>,
    pub event_cache_ttl: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            db_secret: env::var("DB_SECRET").context("DB_SECRET must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            redis_url: env::var("REDIS_URL").ok(),
            event_cache_ttl: match env::var("EVENT_CACHE_TTL") {
                Ok(value) => value.parse().context("EVENT_CACHE_TTL must be seconds")?,
                Err(_) => DEFAULT_EVENT_CACHE_TTL,
            },
        })
    }
}

//! Centralized configuration (environment variables + defaults).
//!
//! Binaries call [`load_dotenv`] once at startup so a local `.env` file can supply any of
//! these.

use anyhow::Context;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

pub fn load_dotenv() {
    dotenv::dotenv().ok();
}

/// Database URL must be provided (no default) for safety.
pub fn database_url() -> anyhow::Result<String> {
    std::env::var("DATABASE_URL").context("DATABASE_URL must be set")
}

/// Pool size, `DB_MAX_CONNECTIONS` (default 5).
pub fn max_connections() -> anyhow::Result<u32> {
    match std::env::var("DB_MAX_CONNECTIONS") {
        Ok(v) => v
            .parse::<u32>()
            .map(|n| n.max(1))
            .with_context(|| format!("DB_MAX_CONNECTIONS must be a valid u32, got {v:?}")),
        Err(_) => Ok(DEFAULT_MAX_CONNECTIONS),
    }
}

/// Listen address for the API server, `BIND_ADDR` (default `127.0.0.1:8000`).
pub fn bind_addr() -> anyhow::Result<SocketAddr> {
    let raw = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    raw.parse::<SocketAddr>()
        .with_context(|| format!("BIND_ADDR must be a socket address, got {raw:?}"))
}

/// Optional CSV file loaded before the API server starts accepting requests.
pub fn reviews_csv() -> Option<PathBuf> {
    std::env::var("REVIEWS_CSV")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

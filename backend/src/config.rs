use anyhow::{bail, Context, Result};
use axum_extra::extract::cookie::Key;
use std::env;
use std::net::SocketAddr;

// The database URL for the production database
const DEFAULT_DATABASE_URL: &str = "sqlite:shelter.db";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Cookie signing needs at least this much key material.
const MIN_SESSION_SECRET_LEN: usize = 64;

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    session_secret: String,
}

impl Config {
    /// Read configuration from the environment. There is deliberately no
    /// fallback for `SESSION_SECRET`: starting with a baked-in signing key
    /// would let anyone forge sessions.
    pub fn from_env() -> Result<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let session_secret =
            env::var("SESSION_SECRET").context("SESSION_SECRET must be set to a random secret")?;

        Self::build(database_url, &bind_addr, session_secret)
    }

    fn build(database_url: String, bind_addr: &str, session_secret: String) -> Result<Self> {
        let bind_addr = bind_addr
            .parse()
            .context("BIND_ADDR is not a valid socket address")?;
        if session_secret.len() < MIN_SESSION_SECRET_LEN {
            bail!(
                "SESSION_SECRET must be at least {} bytes of key material",
                MIN_SESSION_SECRET_LEN
            );
        }

        Ok(Self {
            database_url,
            bind_addr,
            session_secret,
        })
    }

    /// The cookie signing key derived from the configured secret.
    pub fn session_key(&self) -> Key {
        Key::from(self.session_secret.as_bytes())
    }
}

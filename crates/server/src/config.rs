use std::{env, path::PathBuf};

use anyhow::Context;
use secrecy::SecretString;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

/// Server configuration, read once at startup from the environment (plus `.env`).
#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub asset_root: PathBuf,
    pub admin_password: SecretString,
    pub anthropic_api_key: Option<String>,
    pub session_ttl_hours: i64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().context("PORT must be a valid port number")?,
            Err(_) => DEFAULT_PORT,
        };
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:portfolio.db".to_string());
        let asset_root = env::var("ASSET_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("assets"));
        let admin_password = SecretString::from(
            env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD must be set")?,
        );
        let anthropic_api_key = env::var("ANTHROPIC_API_KEY").ok();
        let session_ttl_hours = match env::var("SESSION_TTL_HOURS") {
            Ok(raw) => raw
                .parse()
                .context("SESSION_TTL_HOURS must be a number of hours")?,
            Err(_) => DEFAULT_SESSION_TTL_HOURS,
        };

        Ok(Self {
            host,
            port,
            database_url,
            asset_root,
            admin_password,
            anthropic_api_key,
            session_ttl_hours,
        })
    }
}

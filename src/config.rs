// src/config.rs

use std::{env, str::FromStr};

use dotenvy::dotenv;

use crate::utils::sanitizer::EscapeMode;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    pub log_dir: String,
    pub escape_mode: EscapeMode,
    /// Upper bound on any request body, in bytes.
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            rust_log: "info".to_string(),
            log_dir: "logs".to_string(),
            escape_mode: EscapeMode::Entities,
            max_body_bytes: 256 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let defaults = Self::default();

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", defaults.port),
            rust_log: env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            log_dir: env::var("LOG_DIR").unwrap_or(defaults.log_dir),
            escape_mode: parse_var("ESCAPE_MODE", defaults.escape_mode),
            max_body_bytes: parse_var("MAX_BODY_BYTES", defaults.max_body_bytes),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Reads `key`, keeping `default` when it is unset or unparsable.
fn parse_var<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid {}={:?}, falling back to {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}

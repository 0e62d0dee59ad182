use std::env;
use std::fmt::Display;
use std::str::FromStr;

use anyhow::{Context, anyhow};
use dotenvy::dotenv;
use strum::EnumString;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum StoreBackend {
    #[strum(serialize = "mysql")]
    MySql,
    #[strum(serialize = "memory")]
    Memory,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub store_backend: StoreBackend,
    /// Required for the MySQL backend only.
    pub database_url: Option<String>,

    // Rate limiting, 0 = off
    pub rate_vacations_per_min: u32,

    pub log_dir: String,
    pub log_level: tracing::Level,
}

/// Where a [`crate::client::VacationClient`] finds the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{key} has invalid value '{raw}': {e}")),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let store_backend = parse_or(&lookup, "STORE_BACKEND", StoreBackend::MySql)?;
        let database_url = lookup("DATABASE_URL");
        if store_backend == StoreBackend::MySql && database_url.is_none() {
            return Err(anyhow!("DATABASE_URL must be set when STORE_BACKEND is mysql"));
        }

        Ok(Self {
            server_addr: lookup("SERVER_ADDR").unwrap_or_else(|| "127.0.0.1:8003".to_string()),
            store_backend,
            database_url,
            rate_vacations_per_min: parse_or(&lookup, "RATE_VACATIONS_PER_MIN", 1000)?,
            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
            log_level: parse_or(&lookup, "LOG_LEVEL", tracing::Level::DEBUG)?,
        })
    }
}

impl ClientConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        if let Some(base_url) = lookup("VACATION_SERVER_BASE_URL") {
            return Ok(Self { base_url });
        }

        let protocol = lookup("VACATION_SERVER_PROTOCOL").unwrap_or_else(|| "http".to_string());
        let host = lookup("VACATION_SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port: u16 = parse_or(&lookup, "VACATION_SERVER_PORT", 8003)
            .context("invalid vacation server port")?;

        Ok(Self {
            base_url: format!("{protocol}://{host}:{port}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn memory_backend_needs_no_database() {
        let config = Config::from_lookup(lookup(&[("STORE_BACKEND", "Memory")])).unwrap();

        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.server_addr, "127.0.0.1:8003");
        assert_eq!(config.rate_vacations_per_min, 1000);
        assert_eq!(config.log_level, tracing::Level::DEBUG);
    }

    #[test]
    fn mysql_backend_requires_database_url() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));

        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "mysql://root@localhost/vacations"),
            ("RATE_VACATIONS_PER_MIN", "0"),
            ("LOG_LEVEL", "warn"),
        ]))
        .unwrap();
        assert_eq!(config.store_backend, StoreBackend::MySql);
        assert_eq!(config.rate_vacations_per_min, 0);
        assert_eq!(config.log_level, tracing::Level::WARN);
    }

    #[test]
    fn bad_numbers_are_reported_not_panicked() {
        let err = Config::from_lookup(lookup(&[
            ("STORE_BACKEND", "memory"),
            ("RATE_VACATIONS_PER_MIN", "lots"),
        ]))
        .unwrap_err();

        assert!(err.to_string().contains("RATE_VACATIONS_PER_MIN"));
    }

    #[test]
    fn client_base_url_is_derived_from_parts() {
        let config = ClientConfig::from_lookup(lookup(&[("VACATION_SERVER_PORT", "7003")])).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:7003");

        let config = ClientConfig::from_lookup(lookup(&[
            ("VACATION_SERVER_BASE_URL", "https://vacations.example.com"),
            ("VACATION_SERVER_PORT", "7003"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://vacations.example.com");
    }
}

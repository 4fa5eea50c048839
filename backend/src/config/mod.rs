//! Central module for application-wide configuration settings.
//!
//! This module handles loading and managing configuration parameters such as
//! the database URL, pool sizing, the listen address and log format.

use anyhow::Context;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

/// Output style for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("unknown log format {other:?}, expected \"pretty\" or \"json\""),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// The connection URL for the Postgres database.
    pub url: String,
    pub min_connections: u32,
    pub max_connections: u32,
    /// Apply the embedded migrations on startup.
    pub run_migrations: bool,
}

/// The configuration parameters for the application, read from environment
/// variables (a `.env` file is honoured).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database: DatabaseConfig,
    pub host: IpAddr,
    pub port: u16,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Missing optional keys fall back
    /// to their defaults; present but unparsable values are errors.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("DATABASE_URL").context("DATABASE_URL must be provided")?;

        let database = DatabaseConfig {
            url,
            min_connections: parse_or(&lookup, "DB_MIN_CONNECTIONS", 1)?,
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            run_migrations: parse_or(&lookup, "RUN_MIGRATIONS", true)?,
        };

        anyhow::ensure!(
            database.min_connections <= database.max_connections,
            "DB_MIN_CONNECTIONS ({}) exceeds DB_MAX_CONNECTIONS ({})",
            database.min_connections,
            database.max_connections
        );

        Ok(Self {
            database,
            host: parse_or(&lookup, "HOST", IpAddr::V4(Ipv4Addr::LOCALHOST))?,
            port: parse_or(&lookup, "PORT", 3000)?,
            log_format: parse_or(&lookup, "LOG_FORMAT", LogFormat::default())?,
        })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|err| anyhow::anyhow!("invalid value {raw:?} for {key}: {err}")),
        None => Ok(default),
    }
}

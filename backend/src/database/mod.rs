//! Module for database connection setup.
//!
//! This module is responsible for initializing the database connection pool,
//! applying the schema migrations and closing the pool on shutdown. The pool
//! is owned by [`Database`] and lent to the store, never kept in a global.

use crate::config::DatabaseConfig;
use adapters::{PgStore, MIGRATOR};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

#[derive(Debug)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await
            .context("could not connect to db")?;

        tracing::info!(
            min_connections = config.min_connections,
            max_connections = config.max_connections,
            "initialized db connection"
        );

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        MIGRATOR
            .run(&self.pool)
            .await
            .context("could not apply migrations")?;

        tracing::info!("applied migrations");
        Ok(())
    }

    /// A store sharing this handle's pool.
    pub fn store(&self) -> PgStore {
        PgStore::new(self.pool.clone())
    }

    /// Waits for checked-out connections to be returned, then closes them.
    pub async fn close(self) {
        self.pool.close().await;
        tracing::info!("closed db connection pool");
    }
}

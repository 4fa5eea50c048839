//! Main entry point for the LightBnB backend.
//!
//! This file initializes logging and configuration, opens the database pool,
//! registers all API routes and middleware, and serves until Ctrl-C. The pool
//! is closed only after the server has drained its in-flight requests.

mod api;
mod config;
mod database;
mod errors;
mod middleware;
mod utils;

use anyhow::Context;
use config::{Config, LogFormat};
use database::Database;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("expected to be able to generate config")?;
    init_tracing(config.log_format);

    let database = Database::connect(&config.database).await?;
    if config.database.run_migrations {
        database.migrate().await?;
    }

    let app = api::router(api::AppState::new(database.store()));

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("could not bind {addr}"))?;
    tracing::info!("listening on {}", addr);

    let served = axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("error running server");

    database.close().await;
    served
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .with_ansi(false)
            .with_env_filter(filter)
            .json()
            .with_current_span(true)
            .flatten_event(true)
            .init(),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

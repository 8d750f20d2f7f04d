//! UserSync - webhook receiver that syncs Clerk users into Postgres.
//!
//! This binary provides a thin web server that:
//! - Receives user lifecycle webhooks from Clerk
//! - Verifies the Svix payload signature
//! - Applies each event to the users table
//! - Responds with a plain status

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use usersync::web::{clerk_webhook, health};
use usersync::{AppState, Config, PgUserStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("usersync_starting");

    // Load configuration; a missing secret or database URL is fatal
    let config = Config::from_env()?;
    info!(
        port = config.port,
        signature_max_age = config.signature_max_age,
        db_max_connections = config.db_max_connections,
        "config_loaded"
    );

    // Connect to Postgres and bring the schema up to date
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to Postgres")?;

    sqlx::migrate!()
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    info!("database_ready");

    // Create application state
    let state = AppState::new(config.clone(), Arc::new(PgUserStore::new(pool)));

    // Build the router
    let app = Router::new()
        .route("/health", get(health))
        .route("/webhooks/clerk", post(clerk_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "usersync_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("usersync_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("usersync_shutting_down");
}

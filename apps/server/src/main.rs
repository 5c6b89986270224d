//! # Till Server
//!
//! HTTP RPC backend for the till point of sale.
//!
//! ## Architecture
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                           Till Server                            │
//! │                                                                  │
//! │  Client ───► POST /rpc/{procedure} ───► dispatch ───► handlers   │
//! │                                             │             │      │
//! │                                             ▼             ▼      │
//! │                                         JWT auth       till-db   │
//! │                                     (mutating sale     (SQLite)  │
//! │                                      & stock calls)              │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

mod auth;
mod config;
mod error;
mod rpc;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::auth::JwtManager;
use crate::config::{BusinessInfo, ServerConfig};
use till_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("starting till server");

    let config = ServerConfig::load()?;
    info!(
        port = config.port,
        database = %config.database_path,
        "configuration loaded"
    );

    let db = Database::new(DbConfig::new(&config.database_path)).await?;

    let state = Arc::new(AppState {
        jwt: JwtManager::new(&config.jwt_secret, config.jwt_lifetime_secs),
        business: config.business.clone(),
        db: db.clone(),
    });

    let app = rpc::router(state);

    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!(port = config.port, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("server shutdown complete");
    Ok(())
}

/// Shared application state.
pub struct AppState {
    pub db: Database,
    pub jwt: JwtManager,
    pub business: BusinessInfo,
}

/// Resolves once the process receives SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, draining connections");
}

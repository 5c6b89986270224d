//! Server configuration from environment variables.
//!
//! Every knob has a development-friendly default, so `cargo run`
//! works on a fresh checkout. Production deployments override via
//! the environment, `TILL_JWT_SECRET` above all.

use serde::Serialize;
use std::env;
use thiserror::Error;
use tracing::warn;

const DEFAULT_PORT: &str = "8080";
const DEFAULT_DATABASE_PATH: &str = "till.db";
const DEFAULT_JWT_LIFETIME_SECS: &str = "86400";
const DEV_JWT_SECRET: &str = "till-dev-secret-change-me";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// The shop details printed on receipts
#[derive(Debug, Clone, Serialize)]
pub struct BusinessInfo {
    pub name: String,
    pub address: String,
    pub phone: String,
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen port (TILL_PORT)
    pub port: u16,
    /// SQLite file path (TILL_DATABASE_PATH)
    pub database_path: String,
    /// HMAC secret for session tokens (TILL_JWT_SECRET)
    pub jwt_secret: String,
    /// Token lifetime in seconds (TILL_JWT_LIFETIME_SECS)
    pub jwt_lifetime_secs: u64,
    /// Receipt header block (TILL_BUSINESS_NAME/ADDRESS/PHONE)
    pub business: BusinessInfo,
}

impl ServerConfig {
    /// Read configuration from the environment, falling back to
    /// development defaults
    pub fn load() -> Result<Self, ConfigError> {
        let port_raw = env::var("TILL_PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string());
        let port = port_raw.parse().map_err(|_| ConfigError::InvalidValue {
            key: "TILL_PORT",
            value: port_raw.clone(),
        })?;

        let database_path =
            env::var("TILL_DATABASE_PATH").unwrap_or_else(|_| DEFAULT_DATABASE_PATH.to_string());

        let jwt_secret = match env::var("TILL_JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                warn!("TILL_JWT_SECRET not set, using the built-in development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        let lifetime_raw = env::var("TILL_JWT_LIFETIME_SECS")
            .unwrap_or_else(|_| DEFAULT_JWT_LIFETIME_SECS.to_string());
        let jwt_lifetime_secs = lifetime_raw.parse().map_err(|_| ConfigError::InvalidValue {
            key: "TILL_JWT_LIFETIME_SECS",
            value: lifetime_raw.clone(),
        })?;

        let business = BusinessInfo {
            name: env::var("TILL_BUSINESS_NAME").unwrap_or_else(|_| "Till Store".to_string()),
            address: env::var("TILL_BUSINESS_ADDRESS")
                .unwrap_or_else(|_| "1 Market Street".to_string()),
            phone: env::var("TILL_BUSINESS_PHONE").unwrap_or_else(|_| "000-000-0000".to_string()),
        };

        Ok(ServerConfig {
            port,
            database_path,
            jwt_secret,
            jwt_lifetime_secs,
            business,
        })
    }
}

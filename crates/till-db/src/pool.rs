//! Connection pool and database handle.
//!
//! [`Database`] owns the SQLite pool and hands out repositories. One
//! instance is created at startup and shared behind an `Arc` by the
//! server; tests create throwaway in-memory instances per test.

use crate::error::{DbError, DbResult};
use crate::migrations::run_migrations;
use crate::repository::{
    ProductRepository, ReportRepository, SaleRepository, StockRepository, UserRepository,
};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Database configuration
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite file, or `:memory:`
    pub database_path: String,
    /// Maximum pool size
    pub max_connections: u32,
    /// Connections kept open when idle
    pub min_connections: u32,
    /// How long to wait for a free connection
    pub connect_timeout: Duration,
    /// Close idle connections after this long (`None` = never)
    pub idle_timeout: Option<Duration>,
    /// Apply pending migrations on startup
    pub run_migrations: bool,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            database_path: "till.db".to_string(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            run_migrations: true,
        }
    }
}

impl DbConfig {
    /// Config for a database file at `path`
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            database_path: path.into(),
            ..Self::default()
        }
    }

    /// Config for a private in-memory database.
    ///
    /// Pinned to a single never-expiring connection: every SQLite
    /// memory connection is its own database, so a second connection
    /// (or a reopened one) would see empty tables.
    pub fn in_memory() -> Self {
        Self {
            database_path: ":memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            idle_timeout: None,
            ..Self::default()
        }
    }

    /// Builder-style override of the pool size
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }
}

/// Handle to the POS database.
///
/// Cheap to clone; all clones share one pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if necessary) and optionally migrate the database.
    ///
    /// File databases run in WAL mode with foreign keys enforced.
    ///
    /// ## Example
    ///
    /// ```no_run
    /// # async fn open() -> till_db::DbResult<()> {
    /// let db = till_db::Database::new(till_db::DbConfig::new("till.db")).await?;
    /// assert!(db.health_check().await);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        let options = if config.database_path == ":memory:" {
            SqliteConnectOptions::from_str("sqlite::memory:")
        } else {
            SqliteConnectOptions::from_str(&format!("sqlite://{}?mode=rwc", config.database_path))
        }
        .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout)
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        if config.run_migrations {
            run_migrations(&pool).await?;
        }

        info!(path = %config.database_path, "database ready");
        Ok(Self { pool })
    }

    /// The underlying pool, for queries that live outside a repository
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// User accounts
    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    /// Product catalogue
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    /// Sales and receipts
    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.pool.clone())
    }

    /// Stock adjustments
    pub fn stock(&self) -> StockRepository {
        StockRepository::new(self.pool.clone())
    }

    /// Aggregated reporting
    pub fn reports(&self) -> ReportRepository {
        ReportRepository::new(self.pool.clone())
    }

    /// True when the database answers a trivial probe
    pub async fn health_check(&self) -> bool {
        match sqlx::query("SELECT 1").execute(&self.pool).await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "database health check failed");
                false
            }
        }
    }

    /// Close the pool, waiting for in-flight queries
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

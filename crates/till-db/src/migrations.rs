//! Embedded schema migrations.
//!
//! Migration files live in `migrations/sqlite/` at the workspace root
//! and are compiled into the binary, so a deployed server carries its
//! own schema and never depends on files on disk.

use crate::error::DbResult;
use sqlx::SqlitePool;
use tracing::info;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Run all pending migrations against the pool
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("running database migrations");
    MIGRATOR.run(pool).await?;
    info!("database migrations complete");
    Ok(())
}

/// Number of migrations that have been applied.
///
/// Zero when the migrations table does not exist yet.
pub async fn applied_migrations(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
        .unwrap_or(0)
}

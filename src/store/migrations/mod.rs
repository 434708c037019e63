//! Database schema migrations.
//!
//! Migration files live in this directory as `migration_NN.sql` and upgrade
//! the schema from version `NN-1` to version `NN`.

use anyhow::Context;
use sqlx::{Executor, SqlitePool};
use tracing::debug;

struct Migration {
    /// The version this migration brings the schema to.
    version: i32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("migration_01.sql"),
}];

/// Brings the schema up to the latest version, creating the version table on
/// a fresh database. Each migration runs inside a transaction together with
/// its `schema_version` update.
pub(crate) async fn run(pool: &SqlitePool) -> anyhow::Result<()> {
    pool.execute("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)")
        .await
        .context("failed to create schema_version table")?;

    let current: Option<(i32,)> = sqlx::query_as("SELECT version FROM schema_version")
        .fetch_optional(pool)
        .await
        .context("failed to read schema version")?;
    let current = current.map(|(v,)| v).unwrap_or(0);

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        debug!("running schema migration {:02}", migration.version);
        apply_migration(pool, migration).await?;
    }

    Ok(())
}

async fn apply_migration(pool: &SqlitePool, migration: &Migration) -> anyhow::Result<()> {
    let mut tx = pool
        .begin()
        .await
        .context("failed to begin migration transaction")?;

    tx.execute(migration.sql)
        .await
        .with_context(|| format!("failed to apply migration {:02}", migration.version))?;

    sqlx::query("DELETE FROM schema_version")
        .execute(&mut *tx)
        .await
        .context("failed to clear schema_version")?;
    sqlx::query("INSERT INTO schema_version (version) VALUES (?)")
        .bind(migration.version)
        .execute(&mut *tx)
        .await
        .context("failed to update schema_version")?;

    tx.commit()
        .await
        .context("failed to commit migration transaction")?;
    Ok(())
}

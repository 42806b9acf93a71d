//! # Migrations
//!
//! SQL files under `migrations/sqlite/` at the workspace root, embedded at
//! compile time. Applied migrations are never edited; schema changes go in
//! a new `NNN_description.sql`.
//!
//! ```text
//! migrations/sqlite/
//! └── 001_initial_schema.sql   menu_items, restaurant_config, orders
//! ```

use sqlx::migrate::Migrator;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies pending migrations in filename order. Safe to call repeatedly.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    MIGRATOR.run(pool).await?;
    info!(count = MIGRATOR.migrations.len(), "Schema up to date");
    Ok(())
}

/// `(known, applied)` migration counts, logged at startup.
///
/// A database that was never migrated reports zero applied.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let known = MIGRATOR.migrations.len();

    let applied: i64 =
        match sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await
        {
            Ok(n) => n,
            Err(sqlx::Error::Database(_)) => 0,
            Err(e) => return Err(e.into()),
        };

    Ok((known, usize::try_from(applied).unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_all_migrations_applied() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (known, applied) = migration_status(db.pool()).await.unwrap();

        assert!(known > 0);
        assert_eq!(known, applied);
    }

    #[tokio::test]
    async fn test_unmigrated_database_reports_zero() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();
        let (_, applied) = migration_status(db.pool()).await.unwrap();
        assert_eq!(applied, 0);

        db.run_migrations().await.unwrap();
        db.run_migrations().await.unwrap();
        let (known, applied) = migration_status(db.pool()).await.unwrap();
        assert_eq!(known, applied);
    }
}

//! # Database Pool
//!
//! Opens the SQLite pool that holds the menu, restaurant settings and
//! placed orders.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Where Connections Go                             │
//! │                                                                         │
//! │  DbLocation::File(path)                DbLocation::Memory               │
//! │  ──────────────────────                ──────────────────               │
//! │  WAL journal, busy timeout             one connection, never recycled   │
//! │  up to max_connections                 (the database lives inside it)   │
//! │                                                                         │
//! │      GET /menu ──► conn ◄── GET /cart                                  │
//! │   POST /orders ──► conn (single INSERT per order)                      │
//! │                                                                         │
//! │  Database::new ──► pool ──► migrations (if enabled) ──► repositories   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::config::RestaurantConfigRepository;
use crate::repository::menu::MenuRepository;
use crate::repository::order::OrderRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    /// A SQLite file, created on first open. Its directory must exist.
    File(PathBuf),
    /// A private in-memory database, gone when the pool closes.
    Memory,
}

/// Database configuration.
///
/// ```rust,ignore
/// let config = DbConfig::new("/var/lib/bistro/bistro.db").max_connections(8);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub location: DbLocation,

    /// Default: 5 (always 1 in memory).
    pub max_connections: u32,

    /// How long a request waits for a free connection. Default: 10 seconds.
    pub acquire_timeout: Duration,

    /// How long SQLite retries a locked database before failing. Default: 5 seconds.
    pub busy_timeout: Duration,

    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            location: DbLocation::File(path.into()),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(10),
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    /// In-memory database with migrations applied. Used by tests.
    pub fn in_memory() -> Self {
        DbConfig {
            location: DbLocation::Memory,
            max_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            busy_timeout: Duration::from_secs(1),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = match &self.location {
            DbLocation::File(path) => SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal),
            DbLocation::Memory => SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?,
        };

        Ok(options.foreign_keys(true).busy_timeout(self.busy_timeout))
    }

    fn pool_options(&self) -> SqlitePoolOptions {
        let options = SqlitePoolOptions::new().acquire_timeout(self.acquire_timeout);

        match self.location {
            DbLocation::File(_) => options
                .max_connections(self.max_connections.max(1))
                .idle_timeout(Some(Duration::from_secs(600))),
            // Every in-memory connection is its own database, so keep exactly one
            // and never let the pool replace it.
            DbLocation::Memory => options
                .min_connections(1)
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None),
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle to the pool, handing out repositories.
///
/// Clones share one pool.
///
/// ```rust,ignore
/// async fn menu(State(state): State<AppState>) -> Result<Json<MenuView>, ApiError> {
///     let items = state.db.menu().list_available().await?;
///     ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool and, unless disabled, applies pending migrations.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        match &config.location {
            DbLocation::File(path) => info!(path = %path.display(), "Opening database"),
            DbLocation::Memory => debug!("Opening in-memory database"),
        }

        let pool = config
            .pool_options()
            .connect_with(config.connect_options()?)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(max_connections = config.max_connections, "Database pool ready");

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        }
        Ok(db)
    }

    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// The raw pool, for diagnostics. Queries belong in the repositories.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.pool.clone())
    }

    pub fn menu(&self) -> MenuRepository {
        MenuRepository::new(self.pool.clone())
    }

    pub fn restaurant_config(&self) -> RestaurantConfigRepository {
        RestaurantConfigRepository::new(self.pool.clone())
    }

    /// Closes the pool. Later calls fail with [`DbError::ConnectionFailed`].
    pub async fn close(&self) {
        info!("Closing database pool");
        self.pool.close().await;
    }

    /// Backs `GET /health`.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bistro_core::RestaurantConfig;

    #[tokio::test]
    async fn test_memory_database_keeps_data_across_calls() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);

        let mut config = RestaurantConfig::fallback();
        config.restaurant_name = "Trattoria".to_string();
        db.restaurant_config().insert(&config).await.unwrap();

        assert_eq!(
            db.restaurant_config().current().await.unwrap().restaurant_name,
            "Trattoria"
        );
    }

    #[tokio::test]
    async fn test_closed_database_is_unhealthy() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        assert!(!db.health_check().await);
    }

    #[tokio::test]
    async fn test_file_database_is_created() {
        let path = std::env::temp_dir().join(format!(
            "bistro-pool-test-{}-{}.db",
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));

        let db = Database::new(DbConfig::new(&path).max_connections(2))
            .await
            .unwrap();
        assert!(db.health_check().await);
        assert!(path.exists());
        db.close().await;

        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/bistro.db")
            .max_connections(10)
            .busy_timeout(Duration::from_millis(250))
            .run_migrations(false);

        assert_eq!(config.location, DbLocation::File(PathBuf::from("/tmp/bistro.db")));
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
        assert!(!config.run_migrations);
        assert_eq!(DbConfig::in_memory().location, DbLocation::Memory);
    }
}

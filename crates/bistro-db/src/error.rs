//! # Database Errors
//!
//! Every repository call returns [`DbResult`]. Callers in the web app log
//! the detail and show customers a generic message.
//!
//! ```text
//! sqlx::Error::Database "UNIQUE constraint failed: orders.order_number"
//!                                   → UniqueViolation { column: "order_number", .. }
//! sqlx::Error::Database (other)     → QueryFailed
//! sqlx::Error::PoolClosed           → ConnectionFailed
//! sqlx::Error::PoolTimedOut         → PoolExhausted
//! sqlx::Error::ColumnDecode / ...   → InvalidData
//! MigrateError                      → MigrationFailed
//! ```

use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// A UNIQUE index rejected the row, e.g. a repeated order number.
    #[error("{column} '{value}' already exists")]
    UniqueViolation { column: String, value: String },

    /// The database can't be opened or the pool was closed.
    #[error("Database unavailable: {0}")]
    ConnectionFailed(String),

    /// No connection became free within the acquire timeout.
    #[error("Timed out waiting for a database connection")]
    PoolExhausted,

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A stored row holds a value the domain types reject
    /// (unknown service type, malformed cart snapshot, ...).
    #[error("Stored {column} is invalid: {reason}")]
    InvalidData { column: String, reason: String },
}

impl DbError {
    pub fn duplicate(column: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn invalid_data(column: impl Into<String>, reason: impl ToString) -> Self {
        DbError::InvalidData {
            column: column.into(),
            reason: reason.to_string(),
        }
    }

    /// True when retrying later might succeed (closed or saturated pool).
    pub fn is_unavailable(&self) -> bool {
        matches!(self, DbError::ConnectionFailed(_) | DbError::PoolExhausted)
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite reports "UNIQUE constraint failed: <table>.<column>".
                match msg.strip_prefix("UNIQUE constraint failed: ") {
                    Some(target) => {
                        let column = target.rsplit('.').next().unwrap_or(target);
                        DbError::duplicate(column, "")
                    }
                    None => DbError::QueryFailed(msg.to_string()),
                }
            }

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::Io(e) => DbError::ConnectionFailed(e.to_string()),

            sqlx::Error::ColumnDecode { index, source } => DbError::invalid_data(index, source),
            sqlx::Error::ColumnNotFound(column) => {
                DbError::invalid_data(column, "column missing from result")
            }

            other => DbError::QueryFailed(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// The only JSON column is the order's cart snapshot.
impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        DbError::invalid_data("items", err)
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

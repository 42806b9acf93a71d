//! # Bistro Web Server
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AppConfig::load ──► Database::new (migrations) ──► axum::serve        │
//! │                      session sweeper (interval) ──┘  │                  │
//! │                                     shutdown_signal ─┘                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use bistro_db::{migrations, Database, DbConfig};
use bistro_web::config::AppConfig;
use bistro_web::session::{sweep_idle_sessions, MemorySessionStore};
use bistro_web::{build_router, init_tracing, shutdown_signal, AppState};
use tracing::info;

const SESSION_SWEEP_PERIOD: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting Bistro web server...");

    let config = AppConfig::load()?;
    info!(
        bind_addr = %config.bind_addr,
        db_path = %config.db_path.display(),
        "Configuration loaded"
    );

    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let db = Database::new(
        DbConfig::new(config.db_path.clone()).max_connections(config.db_max_connections),
    )
    .await
    .context("opening database")?;

    let (known, applied) = migrations::migration_status(db.pool()).await?;
    info!(known, applied, "Database ready");

    let sessions = Arc::new(MemorySessionStore::with_idle_timeout(config.session_idle_timeout));
    let sweeper = tokio::spawn(sweep_idle_sessions(sessions.clone(), SESSION_SWEEP_PERIOD));

    let state = AppState::new(db.clone(), sessions);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

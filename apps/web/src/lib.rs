//! # Bistro Web
//!
//! HTTP surface of the ordering system: session cookie, cart forms,
//! checkout and JSON views over `bistro-core` and `bistro-db`.
//!
//! ## Modules
//!
//! - [`config`] - Environment-based configuration
//! - [`session`] - Session ids, notices and the session store
//! - [`services`] - Cart operations and order submission
//! - [`routes`] - axum router and handlers
//! - [`error`] - API error type

pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;

use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

pub use routes::build_router;
pub use state::AppState;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=bistro=trace` - Show trace for bistro crates only
/// - Default: INFO level, DEBUG for bistro crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bistro=debug,sqlx=warn,tower_http=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .init();
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}

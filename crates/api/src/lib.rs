//! # Shorthands API
//!
//! REST API handlers and routes for the Shorthands service.
//!
//! ## AppState Builder
//!
//! The [`AppState`] struct uses a builder for server initialization:
//!
//! ```no_run
//! use std::sync::Arc;
//! use shorthands_api::AppState;
//!
//! # fn example(storage: Arc<shorthands_storage::Backend>, config: Arc<shorthands_config::Config>) {
//! let state = AppState::builder().storage(storage).config(config).build();
//! # }
//! ```

#![deny(unsafe_code)]

use std::sync::Arc;

use shorthands_config::Config;
use shorthands_storage::Backend;
use tracing::info;

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use error::{ApiError, ErrorResponse};
pub use handlers::AppState;
pub use middleware::{AuthContext, require_auth, require_organization, require_user};
pub use routes::create_router_with_state;

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, initiating shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM signal, initiating shutdown");
        }
    }
}

/// Start the Shorthands API HTTP server
pub async fn serve(storage: Arc<Backend>, config: Arc<Config>) -> anyhow::Result<()> {
    let state = AppState::builder().storage(storage).config(config.clone()).build();

    let router = routes::create_router_with_state(state);

    // Bind listener (address is already validated in config)
    let listener = tokio::net::TcpListener::bind(config.listen).await?;

    info!(listen = %config.listen, "Shorthands API listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {e}"))?;

    Ok(())
}

use axum::extract::State;
use shorthands_storage::StorageBackend;
use shorthands_types::Error;

use crate::{error::Result, handlers::AppState};

/// Health check
///
/// GET /healthz
pub async fn healthz_handler(State(state): State<AppState>) -> Result<&'static str> {
    state
        .storage
        .health_check()
        .await
        .map_err(|e| Error::storage(format!("Storage health check failed: {e}")))?;
    Ok("OK")
}

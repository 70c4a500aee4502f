use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report the current health status, pinging storage so connectivity
/// problems show up in the logs before clients notice them.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    if let Ok(store) = state.require_hunt_store().await {
        if let Err(err) = store.health_check().await {
            warn!(error = %err, "storage health check failed");
        }
    } else {
        warn!("storage unavailable (degraded mode)");
    }

    if state.is_degraded().await {
        HealthResponse::degraded()
    } else {
        HealthResponse::ok()
    }
}

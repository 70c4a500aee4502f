use serde::Serialize;
use utoipa::ToSchema;

/// Health payload returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status, `ok` or `degraded`.
    pub status: &'static str,
}

impl HealthResponse {
    /// Storage is reachable and the service is fully operational.
    pub fn ok() -> Self {
        Self { status: "ok" }
    }

    /// Running without a storage connection; writes are refused.
    pub fn degraded() -> Self {
        Self { status: "degraded" }
    }
}

use serde::Serialize;
use utoipa::ToSchema;

/// Health payload returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Either "ok" or "degraded".
    pub status: String,
}

impl HealthResponse {
    /// The backend is fully operational.
    pub fn ok() -> Self {
        Self {
            status: "ok".into(),
        }
    }

    /// The backend runs without a storage connection.
    pub fn degraded() -> Self {
        Self {
            status: "degraded".into(),
        }
    }
}

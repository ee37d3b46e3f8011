use axum::response::Json as ResponseJson;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const SERVICE_NAME: &str = "festival-content-api";

/// Liveness of the content API process
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always `ok` when the process answers
    pub status: String,
    pub service: String,
    /// Crate version of the running binary
    pub version: String,
}

/// Liveness check; answers without contacting the CMS
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Process is up", body = HealthResponse),
    ),
    tag = "Health"
)]
pub async fn health_check() -> ResponseJson<HealthResponse> {
    ResponseJson(HealthResponse {
        status: "ok".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

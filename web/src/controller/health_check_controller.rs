use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct HealthStatus {
    status: String,
    #[schema(value_type = String, format = DateTime)]
    timestamp: DateTime<Utc>,
}

/// GET the liveness of the API server
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "API router is up and responding to requests", body = HealthStatus),
    )
)]
pub async fn health_check() -> impl IntoResponse {
    Json(HealthStatus {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
    })
}

//! System endpoints: health check and privilege catalog.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::auth::Privilege;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// One entry of the privilege catalog.
#[derive(Debug, Serialize, ToSchema)]
struct PrivilegeInfo {
    name: &'static str,
    default_rank: &'static str,
}

/// `GET /config/privileges` — List the privileges this service gates on.
#[utoipa::path(
    get,
    path = "/config/privileges",
    tag = "System",
    summary = "List gated privileges",
    description = "Returns every privilege name the pool surface checks, with its default minimum rank.",
    responses(
        (status = 200, description = "Privilege catalog", body = Vec<PrivilegeInfo>),
    )
)]
pub async fn privileges_handler() -> impl IntoResponse {
    let catalog: Vec<PrivilegeInfo> = Privilege::ALL
        .into_iter()
        .map(|p| PrivilegeInfo {
            name: p.as_str(),
            default_rank: p.default_rank().as_str(),
        })
        .collect();
    (StatusCode::OK, Json(catalog))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/privileges", get(privileges_handler))
}

use axum::{Json, extract::State};
use serde::Serialize;
use utoipa::ToSchema;

use crate::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: &'static str,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = axum::http::StatusCode::OK, description = "Service and storage reachable", body = HealthStatus),
        (status = axum::http::StatusCode::SERVICE_UNAVAILABLE, description = "Storage unreachable")
    ),
    tag = "health",
    summary = "Health check"
)]
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthStatus>, ApiError> {
    state.db.ping().await.map_err(ApiError::database)?;
    Ok(Json(HealthStatus {
        status: "ok",
        database: "reachable",
    }))
}

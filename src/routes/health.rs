use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    db::{PoolState, PoolStatus},
    response::{ApiResponse, Meta},
    state::AppState,
};

#[derive(Serialize, ToSchema)]
pub struct HealthData {
    pub status: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "OK", body = ApiResponse<HealthData>),
    ),
        tag = "Health"
)]
pub async fn health_check() -> Json<ApiResponse<HealthData>> {
    let data = HealthData {
        status: "ok".to_string(),
    };

    Json(ApiResponse::success(
        "Health check",
        data,
        Some(Meta::empty()),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/health/db",
    responses(
        (status = 200, description = "Pool is accepting work", body = ApiResponse<PoolStatus>),
        (status = 503, description = "Pool is draining or closed", body = ApiResponse<PoolStatus>),
    ),
        tag = "Health"
)]
pub async fn database_status(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<PoolStatus>>) {
    let status = state.db.status();
    let (code, message) = match status.state {
        PoolState::Ready => (StatusCode::OK, "Database pool ready"),
        PoolState::Draining | PoolState::Closed => {
            (StatusCode::SERVICE_UNAVAILABLE, "Database pool unavailable")
        }
    };

    (
        code,
        Json(ApiResponse::success(message, status, Some(Meta::empty()))),
    )
}

use crate::transport::http::types::{AppState, HealthResponse};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

pub const WELCOME: &str = "Welcome to the Mongoose API";

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Plaintext welcome string", body = String, content_type = "text/plain")
    )
)]
pub async fn welcome_handler() -> &'static str {
    WELCOME
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Seeded and store reachable", body = HealthResponse),
        (status = 503, description = "Still starting, or store unreachable", body = HealthResponse)
    )
)]
pub async fn healthcheck_handler(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.is_ready();

    match state.store.ping().await {
        Ok(()) if ready => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
                ready,
                error: None,
            }),
        ),
        Ok(()) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "starting".to_string(),
                ready,
                error: None,
            }),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unhealthy".to_string(),
                ready,
                error: Some(format!("store ping failed: {}", e)),
            }),
        ),
    }
}

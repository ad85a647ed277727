use crate::domain::model::Dealership;
use crate::transport::http::error::ApiError;
use crate::transport::http::types::{AppState, ErrorResponse, MessageResponse};
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;

#[utoipa::path(
    get,
    path = "/fetchDealers",
    responses(
        (status = 200, description = "All dealerships", body = [Dealership]),
        (status = 500, description = "Store error", body = ErrorResponse)
    )
)]
pub async fn fetch_dealers_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Dealership>>, ApiError> {
    let dealers = state
        .store
        .dealerships()
        .await
        .map_err(ApiError::store("Error fetching dealers"))?;
    Ok(Json(dealers))
}

#[utoipa::path(
    get,
    path = "/fetchDealers/{state}",
    params(
        ("state" = String, Path, description = "State code, matched exactly (e.g. NY)")
    ),
    responses(
        (status = 200, description = "Dealerships in the state", body = [Dealership]),
        (status = 500, description = "Store error", body = ErrorResponse)
    )
)]
pub async fn fetch_dealers_by_state_handler(
    State(state): State<AppState>,
    Path(state_code): Path<String>,
) -> Result<Json<Vec<Dealership>>, ApiError> {
    let dealers = state
        .store
        .dealerships_by_state(&state_code)
        .await
        .map_err(ApiError::store("Error fetching dealers by state"))?;
    Ok(Json(dealers))
}

#[utoipa::path(
    get,
    path = "/fetchDealer/{id}",
    params(
        ("id" = i64, Path, description = "Dealership id")
    ),
    responses(
        (status = 200, description = "The dealership", body = Dealership),
        (status = 400, description = "Id is not an integer", body = ErrorResponse),
        (status = 404, description = "No dealership with this id", body = MessageResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    )
)]
pub async fn fetch_dealer_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Dealership>, ApiError> {
    let Path(id) = id.map_err(|e| ApiError::BadRequest(format!("Invalid dealer id: {}", e)))?;
    state
        .store
        .dealership(id)
        .await
        .map_err(ApiError::store("Error fetching dealer by id"))?
        .map(Json)
        .ok_or(ApiError::NotFound("Dealer not found"))
}

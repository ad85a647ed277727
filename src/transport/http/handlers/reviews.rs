use crate::domain::model::{Review, ReviewDraft};
use crate::transport::http::error::ApiError;
use crate::transport::http::extract::ReviewBody;
use crate::transport::http::types::{AppState, ErrorResponse};
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;

#[utoipa::path(
    get,
    path = "/fetchReviews",
    responses(
        (status = 200, description = "All reviews", body = [Review]),
        (status = 500, description = "Store error", body = ErrorResponse)
    )
)]
pub async fn fetch_reviews_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Review>>, ApiError> {
    let reviews = state
        .store
        .reviews()
        .await
        .map_err(ApiError::store("Error fetching documents"))?;
    Ok(Json(reviews))
}

#[utoipa::path(
    get,
    path = "/fetchReviews/dealer/{id}",
    params(
        ("id" = i64, Path, description = "Dealership id")
    ),
    responses(
        (status = 200, description = "Reviews for the dealership", body = [Review]),
        (status = 400, description = "Id is not an integer", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    )
)]
pub async fn fetch_reviews_by_dealer_handler(
    State(state): State<AppState>,
    dealer_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<Review>>, ApiError> {
    let Path(dealer_id) =
        dealer_id.map_err(|e| ApiError::BadRequest(format!("Invalid dealer id: {}", e)))?;
    let reviews = state
        .store
        .reviews_by_dealer(dealer_id)
        .await
        .map_err(ApiError::store("Error fetching documents"))?;
    Ok(Json(reviews))
}

#[utoipa::path(
    post,
    path = "/insert_review",
    request_body(
        content = ReviewDraft,
        content_type = "application/json",
        description = "Also accepted as application/x-www-form-urlencoded"
    ),
    responses(
        (status = 200, description = "Stored review with its assigned id", body = Review),
        (status = 422, description = "Body is not a review object", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    )
)]
pub async fn insert_review_handler(
    State(state): State<AppState>,
    ReviewBody(draft): ReviewBody,
) -> Result<Json<Review>, ApiError> {
    let review = state
        .store
        .insert_review(draft)
        .await
        .map_err(ApiError::store("Error inserting review"))?;
    tracing::debug!(id = review.id, dealership = ?review.dealership(), "review inserted");
    Ok(Json(review))
}

//! Handler error type and its HTTP mapping.
//!
//! Store failures never leak detail to the caller: the response carries only
//! the per-operation message, the underlying error goes to the log.

use crate::storage::StoreError;
use crate::transport::http::types::{ErrorResponse, MessageResponse};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// 404 with `{"message": ...}`.
    #[error("not found: {0}")]
    NotFound(&'static str),

    /// 400, e.g. a non-integer path id.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// 422, the request body did not parse.
    #[error("unprocessable entity: {0}")]
    Unprocessable(String),

    /// 500. `context` is the message returned to the client.
    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    pub fn store(context: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Store { context, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound(message) => (
                StatusCode::NOT_FOUND,
                Json(MessageResponse {
                    message: message.to_string(),
                }),
            )
                .into_response(),
            Self::BadRequest(error) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response()
            }
            Self::Unprocessable(error) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(ErrorResponse { error })).into_response()
            }
            Self::Store { context, source } => {
                tracing::error!(error = %source, "{}", context);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: context.to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}

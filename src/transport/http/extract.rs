//! Request body extractors.

use crate::domain::model::ReviewDraft;
use crate::transport::http::error::ApiError;
use async_trait::async_trait;
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::{Form, Json};

/// A review body sent either as JSON or as an HTML form
/// (`application/x-www-form-urlencoded`). Form values are strings; numeric and
/// boolean fields are coerced the same way as in JSON bodies.
#[derive(Debug)]
pub struct ReviewBody(pub ReviewDraft);

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| {
            ct.trim_start()
                .to_ascii_lowercase()
                .starts_with("application/x-www-form-urlencoded")
        })
        .unwrap_or(false)
}

#[async_trait]
impl<S> FromRequest<S> for ReviewBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&req) {
            let Form(draft) = Form::<ReviewDraft>::from_request(req, state)
                .await
                .map_err(|e| ApiError::Unprocessable(format!("Invalid form body: {}", e)))?;
            return Ok(Self(draft));
        }
        let Json(draft) = Json::<ReviewDraft>::from_request(req, state)
            .await
            .map_err(|e| ApiError::Unprocessable(format!("Invalid JSON body: {}", e)))?;
        Ok(Self(draft))
    }
}

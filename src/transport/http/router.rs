use crate::domain::model::{Dealership, Review, ReviewDraft};
use crate::transport::http::handlers::{dealers, health, reviews};
use crate::transport::http::types::{AppState, ErrorResponse, HealthResponse, MessageResponse};
use axum::routing::{get, post};
use axum::Router;
use std::path::Path;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::welcome_handler,
        health::healthcheck_handler,
        reviews::fetch_reviews_handler,
        reviews::fetch_reviews_by_dealer_handler,
        reviews::insert_review_handler,
        dealers::fetch_dealers_handler,
        dealers::fetch_dealers_by_state_handler,
        dealers::fetch_dealer_handler
    ),
    components(schemas(
        Review,
        ReviewDraft,
        Dealership,
        ErrorResponse,
        MessageResponse,
        HealthResponse
    ))
)]
pub struct ApiDoc;

/// Data endpoints only, no middleware.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(health::welcome_handler))
        .route("/health", get(health::healthcheck_handler))
        .route("/fetchReviews", get(reviews::fetch_reviews_handler))
        .route(
            "/fetchReviews/dealer/:id",
            get(reviews::fetch_reviews_by_dealer_handler),
        )
        .route("/fetchDealers", get(dealers::fetch_dealers_handler))
        .route("/fetchDealers/:state", get(dealers::fetch_dealers_by_state_handler))
        .route("/fetchDealer/:id", get(dealers::fetch_dealer_handler))
        .route("/insert_review", post(reviews::insert_review_handler))
        .with_state(app_state)
}

/// Full application: data endpoints, Swagger UI, optional front-end bundle,
/// permissive CORS and request tracing.
pub fn app(app_state: AppState, frontend_dir: Option<&Path>) -> Router {
    let mut router = create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    if let Some(dir) = frontend_dir {
        router = with_frontend(router, dir);
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    router.layer(cors).layer(TraceLayer::new_for_http())
}

/// Serves a single-page front-end: `/login` and `/register` are client-side
/// routes backed by `index.html`, everything else unmatched is a static file.
fn with_frontend(router: Router, dir: &Path) -> Router {
    let index = dir.join("index.html");
    tracing::info!(dir = %dir.display(), "serving front-end bundle");
    router
        .route_service("/login", ServeFile::new(&index))
        .route_service("/register", ServeFile::new(&index))
        .fallback_service(ServeDir::new(dir))
}

//! Startup sequence shared by the server binary and the tests.
//!
//! Order: read the seed files and open the store concurrently, reseed, mark
//! ready, then hand back the router. The caller binds the listener afterwards,
//! so no request is served before seeding finished.

use crate::app::seed::SeedData;
use crate::app::seeder::seed_store;
use crate::infra::config::Config;
use crate::storage::{self, DocumentStore, StoreError};
use crate::transport::http::{self, AppState};
use axum::Router;
use std::path::Path;
use std::sync::Arc;

/// Builds the ready-to-serve application for `config`.
///
/// An unreachable database is not an error: seeding is skipped with a log
/// line and data requests answer 500 until the database comes back.
pub async fn build_app(config: &Config) -> Result<Router, StoreError> {
    let (seed, store) = tokio::join!(
        SeedData::load(&config.reviews_seed_path, &config.dealerships_seed_path),
        storage::connect(config)
    );
    Ok(start(store?, seed, config.frontend_dir.as_deref()).await)
}

/// Seeds `store`, marks the service ready and returns the router.
pub async fn start(
    store: Arc<dyn DocumentStore>,
    seed: SeedData,
    frontend_dir: Option<&Path>,
) -> Router {
    let app_state = AppState::new(store.clone());
    seed_store(store.as_ref(), seed).await;
    app_state.mark_ready();
    http::app(app_state, frontend_dir)
}

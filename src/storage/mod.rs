//! Document store for the `reviews` and `dealerships` collections.
//!
//! Two backends implement [`DocumentStore`]:
//! - [`PgDocumentStore`]: JSONB documents in PostgreSQL.
//! - [`MemoryDocumentStore`]: in-process vectors, used for local runs and tests.

pub mod memory;
pub mod postgres;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

use crate::domain::model::{Dealership, Review, ReviewDraft};
use crate::infra::config::{Config, StoreBackend};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("document encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("review id space exhausted")]
    IdsExhausted,
}

/// Operations the HTTP layer and the seeder need from a backend.
///
/// Listings return documents in insertion order.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Cheap round-trip used by `/health` and `preflight`.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn clear_reviews(&self) -> Result<(), StoreError>;
    async fn clear_dealerships(&self) -> Result<(), StoreError>;

    /// Bulk insert; ids are taken from the documents as-is.
    async fn insert_reviews(&self, reviews: Vec<Review>) -> Result<usize, StoreError>;
    async fn insert_dealerships(&self, dealerships: Vec<Dealership>) -> Result<usize, StoreError>;

    async fn reviews(&self) -> Result<Vec<Review>, StoreError>;
    async fn reviews_by_dealer(&self, dealer_id: i64) -> Result<Vec<Review>, StoreError>;

    async fn dealerships(&self) -> Result<Vec<Dealership>, StoreError>;
    /// Exact, case-sensitive match on `state`.
    async fn dealerships_by_state(&self, state: &str) -> Result<Vec<Dealership>, StoreError>;
    /// First dealership with the given id, if any.
    async fn dealership(&self, id: i64) -> Result<Option<Dealership>, StoreError>;

    /// Stores a new review under a freshly allocated id.
    ///
    /// Allocation is atomic: concurrent callers never receive the same id.
    async fn insert_review(&self, draft: ReviewDraft) -> Result<Review, StoreError>;

    /// Re-aligns the review id allocator with the highest stored id.
    /// Called after bulk inserts that bypass the allocator.
    async fn sync_review_ids(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Opens the backend selected by `config`.
///
/// An unreachable database does not fail this call; see [`PgDocumentStore::connect`].
pub async fn connect(config: &Config) -> Result<Arc<dyn DocumentStore>, StoreError> {
    match config.store_backend {
        StoreBackend::Postgres => {
            let store = PgDocumentStore::connect(
                &config.database_url,
                config.db_max_connections,
                config.db_acquire_timeout,
            )
            .await?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("STORE_BACKEND=memory: documents will not survive restarts");
            Ok(Arc::new(MemoryDocumentStore::new()))
        }
    }
}

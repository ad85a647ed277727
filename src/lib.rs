pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::seed::SeedData;
pub use app::seeder::{seed_store, SeedOutcome};
pub use app::startup::build_app;
pub use domain::model::{Dealership, Review, ReviewDraft};
pub use infra::config::Config;
pub use storage::{DocumentStore, MemoryDocumentStore, PgDocumentStore, StoreError};

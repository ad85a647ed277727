//! One-shot destructive reseed of both collections.

use crate::app::seed::SeedData;
use crate::storage::{DocumentStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded { reviews: usize, dealerships: usize },
    /// One of the seed files did not load; the store was left untouched.
    Skipped,
    /// A store call failed part-way. Whatever was already applied stays.
    Failed,
}

/// Clears both collections and bulk-inserts the seed data.
///
/// Best-effort: errors are logged, never returned. There is no rollback
/// across the delete/insert steps.
pub async fn seed_store(store: &dyn DocumentStore, seed: SeedData) -> SeedOutcome {
    let (reviews, dealerships) = match (seed.reviews, seed.dealerships) {
        (Some(r), Some(d)) => (r, d),
        _ => {
            tracing::warn!("skipping seeding because seed files were not loaded");
            return SeedOutcome::Skipped;
        }
    };

    match reseed(store, reviews, dealerships).await {
        Ok((reviews, dealerships)) => {
            tracing::info!(reviews, dealerships, "database seeded successfully");
            SeedOutcome::Seeded { reviews, dealerships }
        }
        Err(e) => {
            tracing::error!(error = %e, "error seeding database");
            SeedOutcome::Failed
        }
    }
}

async fn reseed(
    store: &dyn DocumentStore,
    reviews: Vec<crate::domain::model::Review>,
    dealerships: Vec<crate::domain::model::Dealership>,
) -> Result<(usize, usize), StoreError> {
    store.clear_reviews().await?;
    store.clear_dealerships().await?;

    let n_reviews = store.insert_reviews(reviews).await?;
    let n_dealerships = store.insert_dealerships(dealerships).await?;

    store.sync_review_ids().await?;
    Ok((n_reviews, n_dealerships))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Dealership, ReviewDraft};
    use crate::storage::MemoryDocumentStore;
    use serde_json::json;

    fn dealer(id: i64, state: &str) -> Dealership {
        serde_json::from_value(json!({"id": id, "state": state})).unwrap()
    }

    #[tokio::test]
    async fn test_reseed_replaces_existing_documents() {
        let store = MemoryDocumentStore::new();
        store.insert_review(ReviewDraft::default()).await.unwrap();
        store.insert_dealerships(vec![dealer(9, "CA")]).await.unwrap();

        let seed = SeedData {
            reviews: Some(vec![ReviewDraft::default().into_review(5)]),
            dealerships: Some(vec![dealer(1, "NY"), dealer(2, "TX")]),
        };
        let outcome = seed_store(&store, seed).await;

        assert_eq!(outcome, SeedOutcome::Seeded { reviews: 1, dealerships: 2 });
        assert_eq!(store.reviews().await.unwrap()[0].id, 5);
        assert!(store.dealership(9).await.unwrap().is_none());
        assert_eq!(store.dealerships().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_incomplete_seed_leaves_store_alone() {
        let store = MemoryDocumentStore::new();
        store.insert_dealerships(vec![dealer(9, "CA")]).await.unwrap();

        let seed = SeedData {
            reviews: None,
            dealerships: Some(vec![dealer(1, "NY")]),
        };
        assert_eq!(seed_store(&store, seed).await, SeedOutcome::Skipped);
        assert!(store.dealership(9).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_store_failure_is_reported_not_raised() {
        let store = MemoryDocumentStore::new();
        store.set_offline(true);
        let seed = SeedData {
            reviews: Some(Vec::new()),
            dealerships: Some(Vec::new()),
        };
        assert_eq!(seed_store(&store, seed).await, SeedOutcome::Failed);
    }
}

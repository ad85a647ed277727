//! In-process backend.

use crate::domain::model::{Dealership, Review, ReviewDraft};
use crate::storage::{DocumentStore, StoreError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryDocumentStore {
    reviews: RwLock<Vec<Review>>,
    dealerships: RwLock<Vec<Dealership>>,
    /// When set, every operation fails as if the store were unreachable.
    offline: AtomicBool,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.check_online()
    }

    async fn clear_reviews(&self) -> Result<(), StoreError> {
        self.check_online()?;
        self.reviews.write().await.clear();
        Ok(())
    }

    async fn clear_dealerships(&self) -> Result<(), StoreError> {
        self.check_online()?;
        self.dealerships.write().await.clear();
        Ok(())
    }

    async fn insert_reviews(&self, reviews: Vec<Review>) -> Result<usize, StoreError> {
        self.check_online()?;
        let n = reviews.len();
        self.reviews.write().await.extend(reviews);
        Ok(n)
    }

    async fn insert_dealerships(&self, dealerships: Vec<Dealership>) -> Result<usize, StoreError> {
        self.check_online()?;
        let n = dealerships.len();
        self.dealerships.write().await.extend(dealerships);
        Ok(n)
    }

    async fn reviews(&self) -> Result<Vec<Review>, StoreError> {
        self.check_online()?;
        Ok(self.reviews.read().await.clone())
    }

    async fn reviews_by_dealer(&self, dealer_id: i64) -> Result<Vec<Review>, StoreError> {
        self.check_online()?;
        let reviews = self.reviews.read().await;
        Ok(reviews
            .iter()
            .filter(|r| r.dealership() == Some(dealer_id))
            .cloned()
            .collect())
    }

    async fn dealerships(&self) -> Result<Vec<Dealership>, StoreError> {
        self.check_online()?;
        Ok(self.dealerships.read().await.clone())
    }

    async fn dealerships_by_state(&self, state: &str) -> Result<Vec<Dealership>, StoreError> {
        self.check_online()?;
        let dealerships = self.dealerships.read().await;
        Ok(dealerships.iter().filter(|d| d.in_state(state)).cloned().collect())
    }

    async fn dealership(&self, id: i64) -> Result<Option<Dealership>, StoreError> {
        self.check_online()?;
        let dealerships = self.dealerships.read().await;
        Ok(dealerships.iter().find(|d| d.id == id).cloned())
    }

    async fn insert_review(&self, draft: ReviewDraft) -> Result<Review, StoreError> {
        self.check_online()?;
        // Read-max and push happen under one write guard.
        let mut reviews = self.reviews.write().await;
        let next_id = reviews
            .iter()
            .map(|r| r.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or(StoreError::IdsExhausted)?;
        let review = draft.into_review(next_id);
        reviews.push(review.clone());
        Ok(review)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn draft(dealer: i64) -> ReviewDraft {
        ReviewDraft {
            dealership: Some(dealer),
            name: Some("A".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_ids_continue_from_seeded_max() {
        let store = MemoryDocumentStore::new();
        store
            .insert_reviews(vec![draft(1).into_review(10), draft(2).into_review(4)])
            .await
            .unwrap();

        let r = store.insert_review(draft(1)).await.unwrap();
        assert_eq!(r.id, 11);
    }

    #[tokio::test]
    async fn test_insert_after_max_id_is_an_error_not_a_wrap() {
        let store = MemoryDocumentStore::new();
        store
            .insert_reviews(vec![draft(1).into_review(i64::MAX)])
            .await
            .unwrap();

        let err = store.insert_review(draft(1)).await.unwrap_err();
        assert!(matches!(err, StoreError::IdsExhausted));
        assert_eq!(store.reviews().await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_get_distinct_ids() {
        let store = Arc::new(MemoryDocumentStore::new());
        let mut handles = Vec::new();
        for i in 0..50 {
            let store = store.clone();
            handles.push(tokio::spawn(async move { store.insert_review(draft(i % 3)).await }));
        }

        let mut ids = HashSet::new();
        for h in handles {
            ids.insert(h.await.unwrap().unwrap().id);
        }
        assert_eq!(ids.len(), 50);
        assert_eq!(ids.iter().copied().max(), Some(50));
    }

    #[tokio::test]
    async fn test_offline_store_fails_every_call() {
        let store = MemoryDocumentStore::new();
        store.set_offline(true);
        assert!(store.ping().await.is_err());
        assert!(store.reviews().await.is_err());
        assert!(store.insert_review(draft(1)).await.is_err());

        store.set_offline(false);
        assert!(store.reviews().await.unwrap().is_empty());
    }
}

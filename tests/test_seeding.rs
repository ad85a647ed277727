//! Startup seeding: seed files on disk -> store -> HTTP listings.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use dealer_reviews_api::transport::http::{app, AppState};
use dealer_reviews_api::{seed_store, DocumentStore, MemoryDocumentStore, SeedData, SeedOutcome};
use http_body_util::BodyExt;
use serde_json::{json, Value as JsonValue};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower::ServiceExt;

struct SeedDir {
    _dir: tempfile::TempDir,
    reviews: PathBuf,
    dealerships: PathBuf,
}

fn write_seed(reviews: &str, dealerships: &str) -> SeedDir {
    let dir = tempfile::tempdir().unwrap();
    let reviews_path = dir.path().join("reviews.json");
    let dealerships_path = dir.path().join("dealerships.json");
    std::fs::write(&reviews_path, reviews).unwrap();
    std::fs::write(&dealerships_path, dealerships).unwrap();
    SeedDir {
        _dir: dir,
        reviews: reviews_path,
        dealerships: dealerships_path,
    }
}

async fn list(store: &Arc<MemoryDocumentStore>, uri: &str) -> JsonValue {
    let state = AppState::new(store.clone());
    state.mark_ready();
    let response = app(state, None)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK, "{}", uri);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_wrapped_seed_files_populate_store() {
    let files = write_seed(
        r#"{"reviews": [{"id": 1, "dealership": 1, "name": "A"}, {"id": 7, "dealership": 2}]}"#,
        r#"{"dealerships": [{"id": 1, "state": "NY"}, {"id": 2, "state": "CA"}]}"#,
    );
    let store = Arc::new(MemoryDocumentStore::new());

    let seed = SeedData::load(&files.reviews, &files.dealerships).await;
    assert!(seed.is_complete());
    let outcome = seed_store(store.as_ref(), seed).await;
    assert_eq!(outcome, SeedOutcome::Seeded { reviews: 2, dealerships: 2 });

    assert_eq!(list(&store, "/fetchReviews").await.as_array().unwrap().len(), 2);
    assert_eq!(list(&store, "/fetchDealers/CA").await[0]["id"], json!(2));

    // Allocation continues from the seeded maximum.
    let next = store.insert_review(Default::default()).await.unwrap();
    assert_eq!(next.id, 8);
}

#[tokio::test]
async fn test_bare_array_seed_files_are_accepted() {
    let files = write_seed(
        r#"[{"id": 1, "dealership": 1}]"#,
        r#"[{"id": 1, "state": "NY"}]"#,
    );
    let seed = SeedData::load(&files.reviews, &files.dealerships).await;
    assert_eq!(seed.reviews.as_ref().map(Vec::len), Some(1));
    assert_eq!(seed.dealerships.as_ref().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_malformed_seed_file_leaves_collections_empty() {
    let files = write_seed(
        r#"{"reviews": [{"id": 1, "dealership": 1}"#,
        r#"{"dealerships": [{"id": 1, "state": "NY"}]}"#,
    );
    let store = Arc::new(MemoryDocumentStore::new());

    let seed = SeedData::load(&files.reviews, &files.dealerships).await;
    assert!(seed.reviews.is_none());
    assert!(seed.dealerships.is_some());
    assert_eq!(seed_store(store.as_ref(), seed).await, SeedOutcome::Skipped);

    for uri in ["/fetchReviews", "/fetchReviews/dealer/1", "/fetchDealers", "/fetchDealers/NY"] {
        assert_eq!(list(&store, uri).await, json!([]), "{}", uri);
    }
}

#[tokio::test]
async fn test_missing_seed_file_disables_seeding() {
    let files = write_seed("[]", "[]");
    let missing = files.reviews.with_file_name("nope.json");

    let seed = SeedData::load(&missing, &files.dealerships).await;
    assert!(!seed.is_complete());
    let store = Arc::new(MemoryDocumentStore::new());
    assert_eq!(seed_store(store.as_ref(), seed).await, SeedOutcome::Skipped);
}

#[tokio::test]
async fn test_bundled_seed_data_loads() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    let seed = SeedData::load(&root.join("reviews.json"), &root.join("dealerships.json")).await;
    assert!(seed.is_complete());

    let store = Arc::new(MemoryDocumentStore::new());
    match seed_store(store.as_ref(), seed).await {
        SeedOutcome::Seeded { reviews, dealerships } => {
            assert!(reviews > 0);
            assert!(dealerships > 0);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

//! PostgreSQL backend: one JSONB document per row.

use crate::domain::model::{Dealership, Review, ReviewDraft};
use crate::storage::{DocumentStore, StoreError};
use async_trait::async_trait;
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::time::Duration;
use tokio::sync::OnceCell;

// Keeps each bulk INSERT well under the 65535 bind-parameter limit.
const INSERT_CHUNK: usize = 1000;

pub struct PgDocumentStore {
    pool: PgPool,
    /// Set once the collections exist and the id sequence is aligned.
    prepared: OnceCell<()>,
}

impl PgDocumentStore {
    /// Builds a lazily connecting pool and tries to prepare the collections.
    ///
    /// An unreachable database is logged, not returned: the pool reconnects on
    /// demand and preparation is retried by the first operation that succeeds
    /// in reaching it. Only a malformed URL is an error here.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect_lazy(database_url)?;

        let store = Self {
            pool,
            prepared: OnceCell::new(),
        };
        match store.prepare().await {
            Ok(()) => tracing::info!("database connected successfully"),
            Err(e) => tracing::error!(error = %e, "database connection error"),
        }
        Ok(store)
    }

    async fn prepare(&self) -> Result<(), StoreError> {
        self.prepared
            .get_or_try_init(|| async {
                self.ensure_schema().await?;
                self.resync_review_ids().await
            })
            .await?;
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        // `seq` preserves insertion order; the document id lives inside `doc`.
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS reviews (
                seq BIGSERIAL PRIMARY KEY,
                doc JSONB NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS dealerships (
                seq BIGSERIAL PRIMARY KEY,
                doc JSONB NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS reviews_doc_idx ON reviews USING GIN (doc jsonb_path_ops)")
            .execute(&self.pool)
            .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS dealerships_doc_idx ON dealerships USING GIN (doc jsonb_path_ops)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE SEQUENCE IF NOT EXISTS review_ids")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn resync_review_ids(&self) -> Result<(), StoreError> {
        // setval(seq, max, true) makes the next value max + 1; on an empty
        // collection setval(seq, 1, false) makes it 1.
        sqlx::query(
            "SELECT setval('review_ids', GREATEST(m, 1), m > 0)
             FROM (
                 SELECT COALESCE(MAX(floor((doc->>'id')::numeric)), 0)::bigint AS m
                 FROM reviews
                 WHERE jsonb_typeof(doc->'id') = 'number'
             ) AS max_id",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_docs<T: Serialize + Sync>(
        &self,
        table: &str,
        docs: &[T],
    ) -> Result<usize, StoreError> {
        for chunk in docs.chunks(INSERT_CHUNK) {
            let mut qb = QueryBuilder::<Postgres>::new(format!("INSERT INTO {} (doc) ", table));
            qb.push_values(chunk, |mut b, doc| {
                b.push_bind(Json(doc));
            });
            qb.build().execute(&self.pool).await?;
        }
        Ok(docs.len())
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn clear_reviews(&self) -> Result<(), StoreError> {
        self.prepare().await?;
        sqlx::query("DELETE FROM reviews").execute(&self.pool).await?;
        Ok(())
    }

    async fn clear_dealerships(&self) -> Result<(), StoreError> {
        self.prepare().await?;
        sqlx::query("DELETE FROM dealerships").execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_reviews(&self, reviews: Vec<Review>) -> Result<usize, StoreError> {
        self.prepare().await?;
        self.insert_docs("reviews", &reviews).await
    }

    async fn insert_dealerships(&self, dealerships: Vec<Dealership>) -> Result<usize, StoreError> {
        self.prepare().await?;
        self.insert_docs("dealerships", &dealerships).await
    }

    async fn reviews(&self) -> Result<Vec<Review>, StoreError> {
        self.prepare().await?;
        let rows: Vec<Json<Review>> = sqlx::query_scalar("SELECT doc FROM reviews ORDER BY seq")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|Json(r)| r).collect())
    }

    async fn reviews_by_dealer(&self, dealer_id: i64) -> Result<Vec<Review>, StoreError> {
        self.prepare().await?;
        let rows: Vec<Json<Review>> = sqlx::query_scalar(
            "SELECT doc FROM reviews
             WHERE doc @> jsonb_build_object('dealership', $1::bigint)
             ORDER BY seq",
        )
        .bind(dealer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|Json(r)| r).collect())
    }

    async fn dealerships(&self) -> Result<Vec<Dealership>, StoreError> {
        self.prepare().await?;
        let rows: Vec<Json<Dealership>> =
            sqlx::query_scalar("SELECT doc FROM dealerships ORDER BY seq")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|Json(d)| d).collect())
    }

    async fn dealerships_by_state(&self, state: &str) -> Result<Vec<Dealership>, StoreError> {
        self.prepare().await?;
        let rows: Vec<Json<Dealership>> = sqlx::query_scalar(
            "SELECT doc FROM dealerships
             WHERE doc @> jsonb_build_object('state', $1::text)
             ORDER BY seq",
        )
        .bind(state)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|Json(d)| d).collect())
    }

    async fn dealership(&self, id: i64) -> Result<Option<Dealership>, StoreError> {
        self.prepare().await?;
        let row: Option<Json<Dealership>> = sqlx::query_scalar(
            "SELECT doc FROM dealerships
             WHERE doc @> jsonb_build_object('id', $1::bigint)
             ORDER BY seq
             LIMIT 1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|Json(d)| d))
    }

    async fn insert_review(&self, draft: ReviewDraft) -> Result<Review, StoreError> {
        self.prepare().await?;
        // nextval fails once the sequence passes i64::MAX.
        let id: i64 = sqlx::query_scalar("SELECT nextval('review_ids')")
            .fetch_one(&self.pool)
            .await?;
        let review = draft.into_review(id);
        sqlx::query("INSERT INTO reviews (doc) VALUES ($1)")
            .bind(Json(&review))
            .execute(&self.pool)
            .await?;
        Ok(review)
    }

    async fn sync_review_ids(&self) -> Result<(), StoreError> {
        self.prepare().await?;
        self.resync_review_ids().await
    }
}

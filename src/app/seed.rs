//! Seed data loaded from static JSON files at startup.
//!
//! A seed file holds either a bare array of records or an object wrapping the
//! array under the collection name (`{"reviews": [...]}` /
//! `{"dealerships": [...]}`). Both shapes are accepted.

use crate::domain::model::{Dealership, Review};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{}: expected an array or an object with a `{key}` array", .path.display())]
    Shape { path: PathBuf, key: &'static str },
}

/// Datasets read at startup. `None` means the file could not be loaded.
#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub reviews: Option<Vec<Review>>,
    pub dealerships: Option<Vec<Dealership>>,
}

impl SeedData {
    /// Loads both files. A failure is logged and leaves only that dataset unset.
    pub async fn load(reviews_path: &Path, dealerships_path: &Path) -> Self {
        let reviews = match load_file::<Review>(reviews_path, "reviews").await {
            Ok(v) => {
                tracing::info!(path = %reviews_path.display(), count = v.len(), "loaded review seed data");
                Some(v)
            }
            Err(e) => {
                tracing::error!(error = %e, "could not load review seed data");
                None
            }
        };
        let dealerships = match load_file::<Dealership>(dealerships_path, "dealerships").await {
            Ok(v) => {
                tracing::info!(path = %dealerships_path.display(), count = v.len(), "loaded dealership seed data");
                Some(v)
            }
            Err(e) => {
                tracing::error!(error = %e, "could not load dealership seed data");
                None
            }
        };
        Self { reviews, dealerships }
    }

    /// Seeding only runs when both datasets loaded.
    pub fn is_complete(&self) -> bool {
        self.reviews.is_some() && self.dealerships.is_some()
    }
}

pub async fn load_file<T: DeserializeOwned>(
    path: &Path,
    key: &'static str,
) -> Result<Vec<T>, SeedError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    parse_records(&text, key).map_err(|e| match e {
        ParseFailure::Json(source) => SeedError::Parse {
            path: path.to_path_buf(),
            source,
        },
        ParseFailure::Shape => SeedError::Shape {
            path: path.to_path_buf(),
            key,
        },
    })
}

#[derive(Debug)]
enum ParseFailure {
    Json(serde_json::Error),
    Shape,
}

fn parse_records<T: DeserializeOwned>(text: &str, key: &str) -> Result<Vec<T>, ParseFailure> {
    let value: JsonValue = serde_json::from_str(text).map_err(ParseFailure::Json)?;
    let records = match value {
        JsonValue::Array(items) => JsonValue::Array(items),
        JsonValue::Object(mut obj) => match obj.remove(key) {
            Some(inner @ JsonValue::Array(_)) => inner,
            _ => return Err(ParseFailure::Shape),
        },
        _ => return Err(ParseFailure::Shape),
    };
    serde_json::from_value(records).map_err(ParseFailure::Json)
}

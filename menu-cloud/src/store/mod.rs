//! Document store
//!
//! Collections of JSON documents keyed by a store-assigned id. The id is not
//! part of the stored body; [`Document::into_model`] injects it when decoding.
//!
//! Backends:
//! - [`MemoryStore`]: process-local, used in development and tests
//! - [`PgStore`]: PostgreSQL JSONB table

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub const RESTAURANTS: &str = "restaurants";
pub const MENUS: &str = "menus";
/// Slug reservations keyed by slug, first writer wins
pub const SLUGS: &str = "slugs";
pub const PROCESSED_WEBHOOK_EVENTS: &str = "processed_webhook_events";

/// Top-level fields of a partial update
pub type Fields = serde_json::Map<String, Value>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{collection}/{id} not found")]
    NotFound { collection: String, id: String },

    #[error("{collection}/{id} was modified concurrently")]
    VersionConflict { collection: String, id: String },

    #[error("store backend error: {0}")]
    Backend(String),

    #[error("document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn not_found(collection: &str, id: &str) -> Self {
        StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }

    pub fn version_conflict(collection: &str, id: &str) -> Self {
        StoreError::VersionConflict {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// A stored document and its id
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub body: Value,
}

impl Document {
    /// Decode into a model whose `id` field is filled from the document id
    pub fn into_model<T: DeserializeOwned>(self) -> Result<T, StoreError> {
        let mut body = self.body;
        if let Value::Object(map) = &mut body {
            map.insert("id".into(), Value::String(self.id));
        }
        Ok(serde_json::from_value(body)?)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.body.get(field).is_some_and(|v| !v.is_null())
    }
}

/// Split a serialized model into storable fields, dropping any `id`
pub fn into_fields(doc: Value) -> Result<Fields, StoreError> {
    match doc {
        Value::Object(mut map) => {
            map.remove("id");
            Ok(map)
        }
        other => Err(StoreError::Backend(format!(
            "document body must be a JSON object, got {other}"
        ))),
    }
}

/// Generic document store
///
/// `update` merges top-level fields (shallow); nested values are replaced as a
/// whole. `update_if` and `increment` are atomic per document.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert under a fresh id
    async fn create(&self, collection: &str, doc: Value) -> Result<String, StoreError>;

    /// Insert under a caller-chosen id; `false` if the id is taken
    async fn insert(&self, collection: &str, id: &str, doc: Value) -> Result<bool, StoreError>;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Documents whose top-level `field` equals `value`, in creation order
    async fn query(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError>;

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Merge `fields` only if `field` currently equals `expected`
    ///
    /// Returns `false` on mismatch, `NotFound` if the document is missing.
    async fn update_if(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        expected: &Value,
        fields: Fields,
    ) -> Result<bool, StoreError>;

    /// Add `by` to an integer field; a missing field counts as zero
    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        by: i64,
    ) -> Result<(), StoreError>;
}

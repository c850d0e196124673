//! In-memory document store

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::Value;
use shared::util::new_id;

use super::{Document, DocumentStore, Fields, StoreError, into_fields};

#[derive(Debug, Clone)]
struct StoredDoc {
    seq: u64,
    body: Fields,
}

/// Process-local store keyed by `(collection, id)`
///
/// Per-document atomicity comes from the shard lock held by `get_mut`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: DashMap<(String, String), StoredDoc>,
    seq: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(collection: &str, id: &str) -> (String, String) {
        (collection.to_string(), id.to_string())
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create(&self, collection: &str, doc: Value) -> Result<String, StoreError> {
        let body = into_fields(doc)?;
        let id = new_id();
        let seq = self.next_seq();
        self.docs
            .insert(Self::key(collection, &id), StoredDoc { seq, body });
        Ok(id)
    }

    async fn insert(&self, collection: &str, id: &str, doc: Value) -> Result<bool, StoreError> {
        let body = into_fields(doc)?;
        match self.docs.entry(Self::key(collection, id)) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                let seq = self.next_seq();
                slot.insert(StoredDoc { seq, body });
                Ok(true)
            }
        }
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        Ok(self
            .docs
            .get(&Self::key(collection, id))
            .map(|doc| Document {
                id: id.to_string(),
                body: Value::Object(doc.body.clone()),
            }))
    }

    async fn query(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError> {
        let mut hits: Vec<(u64, Document)> = self
            .docs
            .iter()
            .filter(|entry| entry.key().0 == collection && entry.body.get(field) == Some(value))
            .map(|entry| {
                (
                    entry.seq,
                    Document {
                        id: entry.key().1.clone(),
                        body: Value::Object(entry.body.clone()),
                    },
                )
            })
            .collect();
        hits.sort_by_key(|(seq, _)| *seq);
        Ok(hits.into_iter().map(|(_, doc)| doc).collect())
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        let mut doc = self
            .docs
            .get_mut(&Self::key(collection, id))
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        doc.body.extend(fields);
        Ok(())
    }

    async fn update_if(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        expected: &Value,
        fields: Fields,
    ) -> Result<bool, StoreError> {
        let mut doc = self
            .docs
            .get_mut(&Self::key(collection, id))
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        if doc.body.get(field) != Some(expected) {
            return Ok(false);
        }
        doc.body.extend(fields);
        Ok(true)
    }

    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        by: i64,
    ) -> Result<(), StoreError> {
        let mut doc = self
            .docs
            .get_mut(&Self::key(collection, id))
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        let current = doc.body.get(field).and_then(Value::as_i64).unwrap_or(0);
        doc.body.insert(field.to_string(), Value::from(current + by));
        Ok(())
    }
}

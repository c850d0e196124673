//! PostgreSQL document store
//!
//! One `documents (collection, id, body JSONB)` table; see `migrations/`.

use async_trait::async_trait;
use serde_json::Value;
use shared::util::{new_id, now_millis};
use sqlx::PgPool;
use sqlx::types::Json;

use super::{Document, DocumentStore, Fields, StoreError, into_fields};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and run embedded migrations
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self::new(pool))
    }

    async fn exists(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let row: Option<(i32,)> =
            sqlx::query_as("SELECT 1 FROM documents WHERE collection = $1 AND id = $2")
                .bind(collection)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.is_some())
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn create(&self, collection: &str, doc: Value) -> Result<String, StoreError> {
        let body = into_fields(doc)?;
        let id = new_id();
        sqlx::query(
            "INSERT INTO documents (collection, id, body, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(collection)
        .bind(&id)
        .bind(Json(&body))
        .bind(now_millis())
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    async fn insert(&self, collection: &str, id: &str, doc: Value) -> Result<bool, StoreError> {
        let body = into_fields(doc)?;
        let result = sqlx::query(
            "INSERT INTO documents (collection, id, body, created_at) VALUES ($1, $2, $3, $4)
             ON CONFLICT (collection, id) DO NOTHING",
        )
        .bind(collection)
        .bind(id)
        .bind(Json(&body))
        .bind(now_millis())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let row: Option<(Json<Value>,)> =
            sqlx::query_as("SELECT body FROM documents WHERE collection = $1 AND id = $2")
                .bind(collection)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(Json(body),)| Document {
            id: id.to_string(),
            body,
        }))
    }

    async fn query(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError> {
        // Containment on a single top-level key hits the jsonb_path_ops index
        let mut containment = Fields::new();
        containment.insert(field.to_string(), value.clone());

        let rows: Vec<(String, Json<Value>)> = sqlx::query_as(
            "SELECT id, body FROM documents
             WHERE collection = $1 AND body @> $2
             ORDER BY created_at, id",
        )
        .bind(collection)
        .bind(Json(&containment))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, Json(body))| Document { id, body })
            .collect())
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE documents SET body = body || $3 WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .bind(Json(&fields))
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(collection, id));
        }
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
        let result = sqlx::query(
            "UPDATE documents SET body = body || $5
             WHERE collection = $1 AND id = $2 AND body -> $3 = $4",
        )
        .bind(collection)
        .bind(id)
        .bind(field)
        .bind(Json(expected))
        .bind(Json(&fields))
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 1 {
            return Ok(true);
        }
        if self.exists(collection, id).await? {
            Ok(false)
        } else {
            Err(StoreError::not_found(collection, id))
        }
    }

    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        by: i64,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE documents
             SET body = jsonb_set(body, ARRAY[$3::text], to_jsonb(COALESCE((body ->> $3)::bigint, 0) + $4))
             WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .bind(field)
        .bind(by)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(collection, id));
        }
        Ok(())
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
//! Key-value document storage for blog posts and testimonials

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

/// Storage error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Document in {table} is not an object")]
    NotAnObject { table: String },

    #[error("Document in {table} has no string id")]
    MissingId { table: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, StoreError>;

/// JSON documents keyed by table and `id`.
///
/// `id` is the only invariant: it uniquely identifies a document within a
/// table.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, table: &str, id: &str) -> Result<Option<Value>>;

    async fn list(&self, table: &str) -> Result<Vec<Value>>;

    /// Insert or replace a document. The document must carry a string `id`.
    async fn put(&self, table: &str, document: Value) -> Result<Value>;

    /// Merge `fields` into an existing document. Returns the updated
    /// document, or None when no document has that id.
    async fn update_fields(
        &self,
        table: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<Option<Value>>;

    /// Returns whether a document was removed.
    async fn delete(&self, table: &str, id: &str) -> Result<bool>;
}

/// Process-local document store.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    tables: RwLock<HashMap<String, HashMap<String, Value>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, table: &str, id: &str) -> Result<Option<Value>> {
        let tables = self.tables.read().await;
        Ok(tables.get(table).and_then(|t| t.get(id)).cloned())
    }

    async fn list(&self, table: &str) -> Result<Vec<Value>> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(table)
            .map(|t| t.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn put(&self, table: &str, document: Value) -> Result<Value> {
        let id = match &document {
            Value::Object(map) => match map.get("id") {
                Some(Value::String(id)) => id.clone(),
                _ => {
                    return Err(StoreError::MissingId {
                        table: table.to_string(),
                    })
                }
            },
            _ => {
                return Err(StoreError::NotAnObject {
                    table: table.to_string(),
                })
            }
        };

        let mut tables = self.tables.write().await;
        tables
            .entry(table.to_string())
            .or_default()
            .insert(id, document.clone());
        Ok(document)
    }

    async fn update_fields(
        &self,
        table: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<Option<Value>> {
        let mut tables = self.tables.write().await;
        let Some(document) = tables.get_mut(table).and_then(|t| t.get_mut(id)) else {
            return Ok(None);
        };

        let Value::Object(existing) = &mut *document else {
            return Err(StoreError::NotAnObject {
                table: table.to_string(),
            });
        };

        for (key, value) in fields {
            if key != "id" {
                existing.insert(key, value);
            }
        }

        Ok(Some(document.clone()))
    }

    async fn delete(&self, table: &str, id: &str) -> Result<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .get_mut(table)
            .map(|t| t.remove(id).is_some())
            .unwrap_or(false))
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
//! Typed access to blog posts and testimonials over a document store

use crate::models::Record;
use crate::store::{DocumentStore, Result, StoreError};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;

/// CRUD wrapper for one record type
pub struct Repository<T: Record> {
    store: Arc<dyn DocumentStore>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: Record> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    /// All records, newest first
    pub async fn list(&self) -> Result<Vec<T>> {
        let mut records = self
            .store
            .list(T::TABLE)
            .await?
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<T>, _>>()?;
        records.sort_by_key(|r| std::cmp::Reverse(r.created_at()));
        Ok(records)
    }

    pub async fn get(&self, id: &str) -> Result<Option<T>> {
        self.store
            .get(T::TABLE, id)
            .await?
            .map(serde_json::from_value)
            .transpose()
            .map_err(StoreError::from)
    }

    pub async fn create(&self, record: T) -> Result<T> {
        let stored = self.store.put(T::TABLE, serde_json::to_value(&record)?).await?;
        Ok(serde_json::from_value(stored)?)
    }

    /// Apply the fields present in `patch` and refresh `updatedAt`.
    /// Returns None if the record does not exist.
    pub async fn update<P: Serialize>(&self, id: &str, patch: &P) -> Result<Option<T>> {
        let mut fields = match serde_json::to_value(patch)? {
            Value::Object(map) => map,
            _ => {
                return Err(StoreError::NotAnObject {
                    table: T::TABLE.to_string(),
                })
            }
        };
        fields.remove("createdAt");
        fields.insert(
            "updatedAt".to_string(),
            serde_json::to_value(Utc::now())?,
        );

        self.store
            .update_fields(T::TABLE, id, fields)
            .await?
            .map(serde_json::from_value)
            .transpose()
            .map_err(StoreError::from)
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        self.store.delete(T::TABLE, id).await
    }
}

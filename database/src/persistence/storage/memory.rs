use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        PoisonError, RwLock,
    },
    time::Duration,
};

use async_trait::async_trait;
use crossbeam_skiplist::SkipMap;
use serde_json::Value;

use crate::consts::consts::{DocumentId, ID_FIELD};

use super::{
    filter::Filter, DeleteResult, Document, DocumentStore, StorageResult, StoreError,
    UpdateResult,
};

#[derive(Debug, Clone, Default)]
pub struct MemoryStoreOptions {
    pub latency: Option<Duration>,
}

// Implements: https://rust-unofficial.github.io/patterns/patterns/creational/builder.html
impl MemoryStoreOptions {
    /// Every store call sleeps for `latency` before touching any data. Used to emulate a slow
    /// or unreachable database.
    pub fn set_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }
}

struct StoredDocument {
    document: RwLock<Document>,
}

/// Process local document store.
///
/// Documents are keyed by insertion sequence, so scans (and therefore "first match") follow
/// insertion order.
pub struct MemoryStore {
    documents: SkipMap<u64, StoredDocument>,
    sequence: AtomicU64,
    options: MemoryStoreOptions,
}

fn poisoned<T>(_: PoisonError<T>) -> StoreError {
    StoreError::Backend("memory store lock poisoned".to_string())
}

impl MemoryStore {
    pub fn new(options: MemoryStoreOptions) -> Self {
        Self {
            documents: SkipMap::new(),
            sequence: AtomicU64::new(0),
            options,
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.options.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore::new(MemoryStoreOptions::default())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    #[tracing::instrument(skip(self))]
    async fn find(&self, filter: &Filter) -> StorageResult<Vec<Document>> {
        self.simulate_latency().await;

        let mut found = vec![];

        for entry in self.documents.iter() {
            let document = entry.value().document.read().map_err(poisoned)?;

            if filter.matches(&document) {
                found.push(document.clone());
            }
        }

        Ok(found)
    }

    #[tracing::instrument(skip(self))]
    async fn find_one(&self, filter: &Filter) -> StorageResult<Option<Document>> {
        self.simulate_latency().await;

        for entry in self.documents.iter() {
            let document = entry.value().document.read().map_err(poisoned)?;

            if filter.matches(&document) {
                return Ok(Some(document.clone()));
            }
        }

        Ok(None)
    }

    #[tracing::instrument(skip(self, document))]
    async fn insert_one(&self, mut document: Document) -> StorageResult<DocumentId> {
        self.simulate_latency().await;

        let id = DocumentId::new();

        document.insert(ID_FIELD.to_string(), Value::String(id.to_string()));

        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);

        self.documents.insert(
            sequence,
            StoredDocument {
                document: RwLock::new(document),
            },
        );

        Ok(id)
    }

    #[tracing::instrument(skip(self, set))]
    async fn update_one(&self, filter: &Filter, set: Document) -> StorageResult<UpdateResult> {
        self.simulate_latency().await;

        for entry in self.documents.iter() {
            // Match and assignment happen under the same write lock, a concurrent update can
            // never move the document out from under the filter in between
            let mut document = entry.value().document.write().map_err(poisoned)?;

            if !filter.matches(&document) {
                continue;
            }

            let mut modified = false;

            for (field, value) in set {
                if field == ID_FIELD {
                    continue;
                }

                if document.get(&field) != Some(&value) {
                    document.insert(field, value);
                    modified = true;
                }
            }

            return Ok(UpdateResult {
                matched_count: 1,
                modified_count: modified as u64,
            });
        }

        Ok(UpdateResult::default())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_one(&self, filter: &Filter) -> StorageResult<DeleteResult> {
        self.simulate_latency().await;

        for entry in self.documents.iter() {
            let document = entry.value().document.write().map_err(poisoned)?;

            // `remove` is false when a concurrent delete got here first, keep looking
            if filter.matches(&document) && entry.remove() {
                return Ok(DeleteResult { deleted_count: 1 });
            }
        }

        Ok(DeleteResult::default())
    }
}

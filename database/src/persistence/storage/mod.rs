pub mod filter;
pub mod memory;
#[cfg(feature = "mongodb")]
pub mod mongo;

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::consts::DocumentId;

use self::{
    filter::Filter,
    memory::{MemoryStore, MemoryStoreOptions},
};

#[cfg(feature = "mongodb")]
use self::mongo::{MongoOptions, MongoStore};

/// Schemaless stored document, top level keys are field names
pub type Document = serde_json::Map<String, serde_json::Value>;

pub type StorageResult<T> = Result<T, StoreError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Store did not respond within {0:?}")]
    Timeout(Duration),

    #[error("Store request failed: {0}")]
    Backend(String),

    #[error("Cannot decode stored document [id: {id}]: {message}")]
    Decode { id: String, message: String },

    #[error("Cannot encode document: {0}")]
    Encode(String),
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct UpdateResult {
    pub matched_count: u64,
    pub modified_count: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct DeleteResult {
    pub deleted_count: u64,
}

/// Connection scoped client for a single collection.
///
/// Implementations are shared across every in-flight request, so they must be safe to call
/// concurrently. Cancelling a call means dropping its future.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every matching document, fully materialised
    async fn find(&self, filter: &Filter) -> StorageResult<Vec<Document>>;

    /// First matching document, arbitrary when several match
    async fn find_one(&self, filter: &Filter) -> StorageResult<Option<Document>>;

    /// Stores the document under a freshly assigned id, an `_id` in the input is discarded
    async fn insert_one(&self, document: Document) -> StorageResult<DocumentId>;

    /// Assigns every top level field of `set` on the first matching document
    async fn update_one(&self, filter: &Filter, set: Document) -> StorageResult<UpdateResult>;

    async fn delete_one(&self, filter: &Filter) -> StorageResult<DeleteResult>;
}

#[derive(Debug, Clone)]
pub enum StorageEngine {
    Memory(MemoryStoreOptions),
    #[cfg(feature = "mongodb")]
    Mongo(MongoOptions),
}

impl StorageEngine {
    pub async fn get_engine(self) -> StorageResult<Arc<dyn DocumentStore>> {
        match self {
            StorageEngine::Memory(options) => Ok(Arc::new(MemoryStore::new(options))),
            #[cfg(feature = "mongodb")]
            StorageEngine::Mongo(options) => Ok(Arc::new(MongoStore::connect(&options).await?)),
        }
    }

    pub fn get_engine_info_stats(&self) -> Vec<(String, String)> {
        match self {
            StorageEngine::Memory(options) => vec![
                ("StorageEngine".to_string(), "Memory".to_string()),
                (
                    "Latency".to_string(),
                    format!("{:?}", options.latency.unwrap_or_default()),
                ),
            ],
            #[cfg(feature = "mongodb")]
            StorageEngine::Mongo(options) => vec![
                ("StorageEngine".to_string(), "MongoDB".to_string()),
                ("Database".to_string(), options.database.clone()),
                ("Collection".to_string(), options.collection.clone()),
            ],
        }
    }
}

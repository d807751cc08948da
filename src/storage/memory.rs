use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::Store;
use crate::config::StorageKind;
use crate::error::StorageError;

/// Process-local store; contents vanish on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn read(&self, name: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.documents.read().await.get(name).cloned())
    }

    async fn write(&self, name: &str, value: Value) -> Result<(), StorageError> {
        self.documents.write().await.insert(name.to_string(), value);
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<bool, StorageError> {
        Ok(self.documents.write().await.remove(name).is_some())
    }

    fn kind(&self) -> StorageKind {
        StorageKind::Memory
    }
}

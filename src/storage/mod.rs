//! Persistence for daily content.
//!
//! A `Store` holds named JSON documents. Each content type lives in one
//! document holding a JSON array that is read and rewritten wholesale.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::StorageKind;
use crate::error::StorageError;

pub mod file;
pub mod memory;
pub mod repository;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use repository::{DailyContent, DailyRepository};

/// Document names, one per persisted collection.
pub mod names {
    pub const VOCABULARY: &str = "vocabulary";
    pub const IDIOMS: &str = "idioms";
    pub const GK_QUESTIONS: &str = "gk-questions";
    pub const NEWS: &str = "news";
    pub const GK_FACTS: &str = "gk-facts";
    pub const PRACTICE_SESSIONS: &str = "practice-sessions";
    pub const DAILY_PROGRESS: &str = "daily-progress";
    pub const USER_STATS: &str = "user-stats";
}

#[async_trait]
pub trait Store: Send + Sync + std::fmt::Debug {
    /// The stored document, or `None` when it has never been written.
    async fn read(&self, name: &str) -> Result<Option<Value>, StorageError>;
    async fn write(&self, name: &str, value: Value) -> Result<(), StorageError>;
    /// Remove a document; returns whether it existed.
    async fn remove(&self, name: &str) -> Result<bool, StorageError>;
    fn kind(&self) -> StorageKind;
}

/// Typed helpers over any `Store`.
#[async_trait]
pub trait StoreExt: Store {
    /// Load a document as `T`, or `T::default()` when absent.
    async fn load<T>(&self, name: &str) -> Result<T, StorageError>
    where
        T: DeserializeOwned + Default + Send,
    {
        match self.read(name).await? {
            Some(value) => serde_json::from_value(value)
                .map_err(|source| StorageError::Corrupt { name: name.to_string(), source }),
            None => Ok(T::default()),
        }
    }

    async fn save<T>(&self, name: &str, value: &T) -> Result<(), StorageError>
    where
        T: Serialize + Sync,
    {
        let value = serde_json::to_value(value)?;
        self.write(name, value).await
    }
}

impl<S: Store + ?Sized> StoreExt for S {}

/// Build the backend selected by configuration.
pub fn open(kind: StorageKind, data_dir: impl Into<std::path::PathBuf>) -> Arc<dyn Store> {
    match kind {
        StorageKind::File => Arc::new(FileStore::new(data_dir)),
        StorageKind::Memory => Arc::new(MemoryStore::new()),
    }
}

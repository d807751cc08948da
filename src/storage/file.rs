use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tracing::debug;

use super::Store;
use crate::config::StorageKind;
use crate::error::StorageError;

/// Stores each document as `<dir>/<name>.json`, pretty-printed.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io { path: path.display().to_string(), source }
}

#[async_trait]
impl Store for FileStore {
    async fn read(&self, name: &str) -> Result<Option<Value>, StorageError> {
        let path = self.path_for(name);
        let raw = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(&path, e)),
        };
        let value = serde_json::from_str(&raw)
            .map_err(|source| StorageError::Corrupt { name: name.to_string(), source })?;
        Ok(Some(value))
    }

    async fn write(&self, name: &str, value: Value) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).await.map_err(|e| io_error(&self.dir, e))?;
        let path = self.path_for(name);
        // Readers only ever see a complete document.
        let tmp = self.dir.join(format!(".{name}.json.tmp"));
        let body = serde_json::to_string_pretty(&value)?;
        fs::write(&tmp, body).await.map_err(|e| io_error(&tmp, e))?;
        fs::rename(&tmp, &path).await.map_err(|e| io_error(&path, e))?;
        debug!(path = %path.display(), "document written");
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<bool, StorageError> {
        let path = self.path_for(name);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    fn kind(&self) -> StorageKind {
        StorageKind::File
    }
}

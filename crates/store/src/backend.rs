//! Key/value backends stores persist through

use async_trait::async_trait;
use dashmap::DashMap;
use dqa_errors::{Error, StorageError};
use dqa_types::StoreKey;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;

const FILE_EXTENSION: &str = "json";

#[async_trait]
pub trait StoreBackend: Send + Sync {
    async fn get(&self, key: &StoreKey) -> Result<Option<Value>, Error>;
    async fn set(&self, key: StoreKey, value: Value) -> Result<(), Error>;
    async fn has_key(&self, key: &StoreKey) -> Result<bool, Error>;
    async fn list_keys(&self) -> Result<Vec<StoreKey>, Error>;
}

/// Process-local backend, lost on exit
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    entries: DashMap<StoreKey, Value>,
}

impl InMemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoreBackend for InMemoryBackend {
    async fn get(&self, key: &StoreKey) -> Result<Option<Value>, Error> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: StoreKey, value: Value) -> Result<(), Error> {
        self.entries.insert(key, value);
        Ok(())
    }

    async fn has_key(&self, key: &StoreKey) -> Result<bool, Error> {
        Ok(self.entries.contains_key(key))
    }

    async fn list_keys(&self) -> Result<Vec<StoreKey>, Error> {
        let mut keys: Vec<StoreKey> = self.entries.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        Ok(keys)
    }
}

/// One JSON file per key below a base directory.
///
/// Every key component becomes a path segment; the last one gets a `.json`
/// extension.
#[derive(Debug, Clone)]
pub struct FilesystemBackend {
    base: PathBuf,
}

impl FilesystemBackend {
    #[must_use]
    pub fn new<P: Into<PathBuf>>(base: P) -> Self {
        Self { base: base.into() }
    }

    #[must_use]
    pub fn base_directory(&self) -> &Path {
        &self.base
    }

    fn path_for(&self, key: &StoreKey) -> Result<PathBuf, Error> {
        let parts = key.parts();
        let valid = !parts.is_empty()
            && parts.iter().all(|part| {
                !part.is_empty()
                    && part != "."
                    && part != ".."
                    && !part.contains(['/', '\\'])
            });
        if !valid {
            return Err(StorageError::InvalidKey {
                key: key.to_string(),
            }
            .into());
        }

        let mut path = self.base.clone();
        for part in parts {
            path.push(part);
        }
        let file_name = format!("{}.{FILE_EXTENSION}", parts[parts.len() - 1]);
        path.set_file_name(file_name);
        Ok(path)
    }

    fn key_for(&self, path: &Path) -> Option<StoreKey> {
        let relative = path.strip_prefix(&self.base).ok()?;
        let mut parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_str().map(str::to_string))
            .collect::<Option<_>>()?;
        let last = parts.pop()?;
        parts.push(last.strip_suffix(&format!(".{FILE_EXTENSION}"))?.to_string());
        Some(StoreKey::from_parts(parts))
    }
}

#[async_trait]
impl StoreBackend for FilesystemBackend {
    async fn get(&self, key: &StoreKey) -> Result<Option<Value>, Error> {
        let path = self.path_for(key)?;
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::from_io_with_path(&e, &path).into()),
        };
        let value = serde_json::from_slice(&bytes).map_err(|e| StorageError::CorruptedData {
            message: format!("{}: {e}", path.display()),
        })?;
        Ok(Some(value))
    }

    async fn set(&self, key: StoreKey, value: Value) -> Result<(), Error> {
        let path = self.path_for(&key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::from_io_with_path(&e, parent))?;
        }
        let bytes =
            serde_json::to_vec_pretty(&value).map_err(|e| StorageError::SerializationFailed {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        fs::write(&path, bytes)
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, &path))?;
        Ok(())
    }

    async fn has_key(&self, key: &StoreKey) -> Result<bool, Error> {
        let path = self.path_for(key)?;
        Ok(fs::try_exists(&path)
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, &path))?)
    }

    async fn list_keys(&self) -> Result<Vec<StoreKey>, Error> {
        let mut keys = Vec::new();
        if !fs::try_exists(&self.base).await.unwrap_or(false) {
            return Ok(keys);
        }

        let mut pending = vec![self.base.clone()];
        while let Some(dir) = pending.pop() {
            let mut rd = fs::read_dir(&dir)
                .await
                .map_err(|e| StorageError::from_io_with_path(&e, &dir))?;
            while let Some(entry) = rd.next_entry().await? {
                let path = entry.path();
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    pending.push(path);
                } else if file_type.is_file() {
                    if let Some(key) = self.key_for(&path) {
                        keys.push(key);
                    }
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

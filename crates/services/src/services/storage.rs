//! Blob storage for uploaded achievement images.
//!
//! The store is deliberately dumb: keys map to files under a configured root, and removal
//! is best effort from the caller's point of view (metadata deletion never waits on it).

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tokio::fs;

#[derive(Debug, Error)]
pub enum AssetStoreError {
    #[error("asset not found: {0}")]
    NotFound(String),
    #[error("invalid asset key: {0}")]
    InvalidKey(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn put(&self, key: &str, bytes: Bytes) -> Result<(), AssetStoreError>;
    async fn remove(&self, key: &str) -> Result<(), AssetStoreError>;
}

/// Filesystem-backed asset store rooted at a configured directory.
pub struct LocalAssetStore {
    root: PathBuf,
}

impl LocalAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub async fn ensure_root(&self) -> Result<(), AssetStoreError> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a key to a path under the root. Keys are relative, forward-slash separated,
    /// and must not escape the root.
    fn resolve(&self, key: &str) -> Result<PathBuf, AssetStoreError> {
        if key.is_empty() || key.contains('\\') {
            return Err(AssetStoreError::InvalidKey(key.to_string()));
        }
        let relative = Path::new(key);
        let all_normal = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !all_normal {
            return Err(AssetStoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    async fn put(&self, key: &str, bytes: Bytes) -> Result<(), AssetStoreError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, &bytes).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AssetStoreError> {
        let path = self.resolve(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AssetStoreError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_remove_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalAssetStore::new(dir.path());

        store
            .put("achievements/a.jpg", Bytes::from_static(b"jpeg bytes"))
            .await
            .unwrap();
        assert!(dir.path().join("achievements/a.jpg").exists());

        store.remove("achievements/a.jpg").await.unwrap();
        assert!(!dir.path().join("achievements/a.jpg").exists());
    }

    #[tokio::test]
    async fn remove_missing_asset_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalAssetStore::new(dir.path());

        let err = store.remove("nope.jpg").await.unwrap_err();
        assert!(matches!(err, AssetStoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn keys_cannot_escape_the_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalAssetStore::new(dir.path());

        for key in ["../outside.jpg", "/etc/passwd", "a/../../b", ""] {
            let err = store.put(key, Bytes::from_static(b"x")).await.unwrap_err();
            assert!(matches!(err, AssetStoreError::InvalidKey(_)), "key: {key}");
        }
    }
}

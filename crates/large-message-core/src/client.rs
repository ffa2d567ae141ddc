//! Blob storage client abstraction and reference backends.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use tracing::debug;

use crate::error::Result;

/// Client for an object store addressed by a URI scheme.
///
/// Implementations wrap the actual storage SDK (S3, GCS, local disk, ...).
/// This layer owns no retry, timeout, or backoff policy; failures are
/// propagated to the caller unchanged.
#[async_trait]
pub trait BlobStorageClient: Send + Sync {
    /// Write an object and return the URI string it can be fetched from.
    async fn put_object(&self, data: &[u8], bucket: &str, key: &str) -> Result<String>;

    /// Fetch an object's bytes.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes>;

    /// Delete every object under `prefix` in `bucket`. Deleting an empty
    /// prefix is not an error.
    async fn delete_all_objects(&self, bucket: &str, prefix: &str) -> Result<()>;
}

/// In-memory blob storage, for tests and ephemeral pipelines.
#[derive(Debug, Default)]
pub struct InMemoryClient {
    objects: Mutex<HashMap<(String, String), Bytes>>,
}

impl InMemoryClient {
    /// URI scheme served by this client.
    pub const SCHEME: &'static str = "memory";

    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects across all buckets.
    pub fn object_count(&self) -> usize {
        self.objects.lock().len()
    }
}

#[async_trait]
impl BlobStorageClient for InMemoryClient {
    async fn put_object(&self, data: &[u8], bucket: &str, key: &str) -> Result<String> {
        self.objects.lock().insert(
            (bucket.to_owned(), key.to_owned()),
            Bytes::copy_from_slice(data),
        );
        Ok(format!("{}://{bucket}/{key}", Self::SCHEME))
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        self.objects
            .lock()
            .get(&(bucket.to_owned(), key.to_owned()))
            .cloned()
            .with_context(|| format!("object not found: {}://{bucket}/{key}", Self::SCHEME))
            .map_err(Into::into)
    }

    async fn delete_all_objects(&self, bucket: &str, prefix: &str) -> Result<()> {
        self.objects
            .lock()
            .retain(|(b, k), _| b != bucket || !k.starts_with(prefix));
        Ok(())
    }
}

/// Blob storage backed by the local filesystem.
///
/// Objects live at `<root>/<bucket>/<key>`; keys containing `/` map to
/// nested directories. Prefix deletion expects the `/`-terminated prefixes
/// this protocol produces and removes the corresponding directory tree.
#[derive(Debug, Clone)]
pub struct LocalFileClient {
    root: PathBuf,
}

impl LocalFileClient {
    /// URI scheme served by this client.
    pub const SCHEME: &'static str = "file";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn object_path(&self, bucket: &str, key: &str) -> PathBuf {
        let mut path = self.root.join(bucket);
        for segment in key.split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path
    }
}

#[async_trait]
impl BlobStorageClient for LocalFileClient {
    async fn put_object(&self, data: &[u8], bucket: &str, key: &str) -> Result<String> {
        let path = self.object_path(bucket, key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        tokio::fs::write(&path, data)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        debug!(path = %path.display(), size = data.len(), "wrote object to local storage");
        Ok(format!("{}://{bucket}/{key}", Self::SCHEME))
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        let path = self.object_path(bucket, key);
        let data = tokio::fs::read(&path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Bytes::from(data))
    }

    async fn delete_all_objects(&self, bucket: &str, prefix: &str) -> Result<()> {
        let path = self.object_path(bucket, prefix);
        match tokio::fs::remove_dir_all(&path).await {
            Ok(()) => {
                debug!(path = %path.display(), "deleted object prefix");
                Ok(())
            }
            // deleting a prefix with no objects under it is a no-op
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("failed to delete {}", path.display()))
                .into()),
        }
    }
}

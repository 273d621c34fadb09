//! Filesystem-backed object store
//!
//! Objects live at `<root>/<bucket>/<path>`. Paths are validated so that an
//! object key can never escape its bucket directory.

use async_trait::async_trait;
use brandhub_common::{Error, Result};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use super::{Bucket, ObjectStore};

#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStore {
    /// Create a store rooted at `root`; public URLs are prefixed with
    /// `public_base_url` (no trailing slash)
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Directory holding a bucket's objects
    pub fn bucket_dir(&self, bucket: Bucket) -> PathBuf {
        self.root.join(bucket.name())
    }

    /// Create bucket directories if missing
    pub async fn ensure_buckets(&self) -> Result<()> {
        for bucket in [Bucket::BrandLogos, Bucket::BrandAssets] {
            tokio::fs::create_dir_all(self.bucket_dir(bucket))
                .await
                .map_err(|e| Error::Storage(format!("Cannot create bucket {}: {}", bucket, e)))?;
        }
        Ok(())
    }

    fn object_path(&self, bucket: Bucket, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let is_plain = !path.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !is_plain {
            return Err(Error::Storage(format!("Invalid object path: '{}'", path)));
        }
        Ok(self.bucket_dir(bucket).join(relative))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn upload(
        &self,
        bucket: Bucket,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<()> {
        let target = self.object_path(bucket, path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::Storage(format!("Upload of {} failed: {}", path, e)))?;
        }

        tokio::fs::write(&target, bytes)
            .await
            .map_err(|e| Error::Storage(format!("Upload of {} failed: {}", path, e)))?;

        debug!(bucket = %bucket, path, content_type, size = bytes.len(), "Stored object");
        Ok(())
    }

    async fn download(&self, bucket: Bucket, path: &str) -> Result<Vec<u8>> {
        let target = self.object_path(bucket, path)?;
        tokio::fs::read(&target).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::NotFound(format!("object {}/{}", bucket, path)),
            _ => Error::Storage(format!("Download of {} failed: {}", path, e)),
        })
    }

    async fn remove(&self, bucket: Bucket, paths: &[String]) -> Result<()> {
        let mut failures = Vec::new();

        for path in paths {
            let outcome = match self.object_path(bucket, path) {
                Ok(target) => match tokio::fs::remove_file(&target).await {
                    Ok(()) => Ok(()),
                    Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                    Err(e) => Err(format!("{}: {}", path, e)),
                },
                Err(e) => Err(e.to_string()),
            };
            if let Err(msg) = outcome {
                failures.push(msg);
            }
        }

        if failures.is_empty() {
            debug!(bucket = %bucket, count = paths.len(), "Removed objects");
            Ok(())
        } else {
            Err(Error::Storage(format!(
                "Failed to remove {} of {} objects: {}",
                failures.len(),
                paths.len(),
                failures.join("; ")
            )))
        }
    }

    fn public_url(&self, bucket: Bucket, path: &str) -> String {
        format!("{}/storage/{}/{}", self.public_base_url, bucket, path)
    }
}

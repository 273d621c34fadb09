//! Object storage boundary
//!
//! The object store knows nothing about the relational schema: an asset or
//! logo is tied to its object only through the stored path string. Paths are
//! namespaced by user id (and brand id for assets) plus a millisecond
//! timestamp.

use async_trait::async_trait;
use brandhub_common::Result;
use std::fmt;
use uuid::Uuid;

pub mod local;

pub use local::LocalObjectStore;

/// Storage buckets used by BrandHub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    /// Publicly readable brand logos
    BrandLogos,
    /// Private brand assets
    BrandAssets,
}

impl Bucket {
    pub fn name(&self) -> &'static str {
        match self {
            Bucket::BrandLogos => "brand_logos",
            Bucket::BrandAssets => "brand_assets",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Object store operations needed by the lifecycle managers
///
/// Every failure is reported as `Error::Storage` (or `Error::NotFound` for
/// downloads of absent objects).
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` at `path`, replacing any existing object
    async fn upload(&self, bucket: Bucket, path: &str, bytes: &[u8], content_type: &str)
        -> Result<()>;

    /// Read an object back
    async fn download(&self, bucket: Bucket, path: &str) -> Result<Vec<u8>>;

    /// Remove objects; paths that do not exist are ignored
    async fn remove(&self, bucket: Bucket, paths: &[String]) -> Result<()>;

    /// Publicly reachable URL of an object
    fn public_url(&self, bucket: Bucket, path: &str) -> String;
}

/// Path of a brand logo: `{userId}/{timestamp}_{fileName}`
pub fn logo_path(user_id: Uuid, timestamp_millis: i64, file_name: &str) -> String {
    format!("{}/{}_{}", user_id, timestamp_millis, sanitize_file_name(file_name))
}

/// Path of a brand asset: `{userId}/{brandId}/{timestamp}_{assetId}.{ext}`
///
/// The asset id keeps two uploads within the same millisecond apart.
pub fn asset_path(
    user_id: Uuid,
    brand_id: Uuid,
    timestamp_millis: i64,
    asset_id: Uuid,
    file_name: &str,
) -> String {
    let stem = format!("{}/{}/{}_{}", user_id, brand_id, timestamp_millis, asset_id);
    match file_extension(file_name) {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem,
    }
}

/// Strip directories and replace characters unsafe in object paths
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Lower-cased extension of a file name, if it has a sensible one
pub fn file_extension(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next()?;
    let (stem, ext) = base.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || ext.len() > 10 {
        return None;
    }
    if !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

//! Lifecycle managers and pure view logic
//!
//! Managers own the ordering of every multi-step operation: local
//! validation and ownership checks first, then the storage step, then the
//! database write.

pub mod access;
pub mod assets;
pub mod brands;
pub mod calendar;
pub mod launches;
pub mod pricing;
pub mod style_check;

use brandhub_common::db::Brand;
use brandhub_common::{ensure_owner, Error, Result};
use sqlx::SqlitePool;
use uuid::Uuid;

pub use access::PaidFeature;
pub use assets::AssetManager;
pub use brands::BrandManager;
pub use launches::LaunchManager;

/// A file received from a form submission
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Load a brand and verify the caller owns it
pub(crate) async fn owned_brand(db: &SqlitePool, brand_id: Uuid, user_id: Uuid) -> Result<Brand> {
    let brand = crate::db::brands::get_brand(db, brand_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("brand {}", brand_id)))?;
    ensure_owner(&brand, user_id)?;
    Ok(brand)
}

/// Trim optional free text; blank becomes `None`
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

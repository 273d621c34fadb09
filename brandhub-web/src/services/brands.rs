//! Brand lifecycle
//!
//! Create, update and delete brands together with their logo object and,
//! on delete, every asset object and row below the brand.

use brandhub_common::db::Brand;
use brandhub_common::time::{millis_timestamp, now};
use brandhub_common::{Error, Result};
use serde::Serialize;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{optional_text, owned_brand, UploadedFile};
use crate::db;
use crate::storage::{logo_path, Bucket, ObjectStore};

/// Applied when a brand is created without colors
pub const DEFAULT_PRIMARY_COLOR: &str = "#8b5cf6";
pub const DEFAULT_SECONDARY_COLOR: &str = "#ffffff";

/// Submitted brand fields
///
/// On update, `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default)]
pub struct BrandFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub font: Option<String>,
    pub website_url: Option<String>,
}

/// Outcome of a brand delete
#[derive(Debug, Clone, Serialize)]
pub struct BrandDeletion {
    pub brand_id: Uuid,
    pub assets_removed: u64,
    /// False when one or more storage objects could not be removed
    pub storage_cleaned: bool,
}

#[derive(Clone)]
pub struct BrandManager {
    db: SqlitePool,
    store: Arc<dyn ObjectStore>,
}

impl BrandManager {
    pub fn new(db: SqlitePool, store: Arc<dyn ObjectStore>) -> Self {
        Self { db, store }
    }

    /// All brands of the caller, newest first
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Brand>> {
        db::brands::list_brands_for_user(&self.db, user_id).await
    }

    /// One brand of the caller
    pub async fn get(&self, brand_id: Uuid, user_id: Uuid) -> Result<Brand> {
        owned_brand(&self.db, brand_id, user_id).await
    }

    /// Create a brand owned by `user_id`
    ///
    /// The logo (if any) is uploaded before the row is written; a failed
    /// upload aborts the create.
    pub async fn create(
        &self,
        user_id: Uuid,
        fields: BrandFields,
        logo: Option<UploadedFile>,
    ) -> Result<Brand> {
        let name = required_name(fields.name.as_deref())?;
        let primary_color = normalize_color(fields.primary_color, "primary color")?;
        let secondary_color = normalize_color(fields.secondary_color, "secondary color")?;
        let logo = non_empty_logo(logo)?;

        let created_at = now();
        let mut brand = Brand {
            id: Uuid::new_v4(),
            user_id,
            name,
            description: optional_text(fields.description),
            primary_color: Some(primary_color.unwrap_or_else(|| DEFAULT_PRIMARY_COLOR.to_string())),
            secondary_color: Some(
                secondary_color.unwrap_or_else(|| DEFAULT_SECONDARY_COLOR.to_string()),
            ),
            font: optional_text(fields.font),
            website_url: optional_text(fields.website_url),
            logo_path: None,
            logo_url: None,
            created_at,
        };

        if let Some(file) = logo {
            let path = self.upload_logo(user_id, &file).await?;
            brand.logo_url = Some(self.store.public_url(Bucket::BrandLogos, &path));
            brand.logo_path = Some(path);
        }

        db::brands::insert_brand(&self.db, &brand).await?;
        info!("Created brand {} ({}) for user {}", brand.id, brand.name, user_id);
        Ok(brand)
    }

    /// Update a brand of the caller
    ///
    /// A new logo replaces the reference; the previous logo object is left
    /// in storage.
    pub async fn update(
        &self,
        brand_id: Uuid,
        user_id: Uuid,
        fields: BrandFields,
        logo: Option<UploadedFile>,
    ) -> Result<Brand> {
        let mut brand = owned_brand(&self.db, brand_id, user_id).await?;

        if let Some(name) = fields.name.as_deref() {
            brand.name = required_name(Some(name))?;
        }
        if let Some(color) = normalize_color(fields.primary_color, "primary color")? {
            brand.primary_color = Some(color);
        }
        if let Some(color) = normalize_color(fields.secondary_color, "secondary color")? {
            brand.secondary_color = Some(color);
        }
        if fields.description.is_some() {
            brand.description = optional_text(fields.description);
        }
        if fields.font.is_some() {
            brand.font = optional_text(fields.font);
        }
        if fields.website_url.is_some() {
            brand.website_url = optional_text(fields.website_url);
        }

        if let Some(file) = non_empty_logo(logo)? {
            let path = self.upload_logo(user_id, &file).await?;
            if let Some(previous) = &brand.logo_path {
                debug!("Brand {} logo replaced; previous object {} kept", brand.id, previous);
            }
            brand.logo_url = Some(self.store.public_url(Bucket::BrandLogos, &path));
            brand.logo_path = Some(path);
        }

        let updated = db::brands::update_brand(&self.db, &brand).await?;
        if updated == 0 {
            return Err(Error::NotFound(format!("brand {}", brand_id)));
        }

        info!("Updated brand {}", brand.id);
        Ok(brand)
    }

    /// Delete a brand of the caller, its assets and its launches
    ///
    /// Storage removal is best effort: failures are logged and the rows are
    /// deleted anyway.
    pub async fn delete(&self, brand_id: Uuid, user_id: Uuid) -> Result<BrandDeletion> {
        let brand = owned_brand(&self.db, brand_id, user_id).await?;
        let assets = db::assets::list_assets_for_brand(&self.db, brand_id).await?;

        let mut storage_cleaned = true;
        if !assets.is_empty() {
            let paths: Vec<String> = assets.iter().map(|a| a.file_path.clone()).collect();
            if let Err(e) = self.store.remove(Bucket::BrandAssets, &paths).await {
                warn!(
                    "Failed to remove {} asset object(s) of brand {}: {} (continuing with delete)",
                    paths.len(),
                    brand_id,
                    e
                );
                storage_cleaned = false;
            }
        }

        if let Some(path) = &brand.logo_path {
            if let Err(e) = self.store.remove(Bucket::BrandLogos, &[path.clone()]).await {
                warn!("Failed to remove logo of brand {}: {}", brand_id, e);
                storage_cleaned = false;
            }
        }

        let mut tx = self.db.begin().await?;
        let assets_removed = db::assets::delete_assets_for_brand(&mut *tx, brand_id).await?;
        db::brands::delete_brand(&mut *tx, brand_id).await?;
        tx.commit().await?;

        info!(
            "Deleted brand {} with {} asset(s) for user {}",
            brand_id, assets_removed, user_id
        );

        Ok(BrandDeletion {
            brand_id,
            assets_removed,
            storage_cleaned,
        })
    }

    async fn upload_logo(&self, user_id: Uuid, file: &UploadedFile) -> Result<String> {
        let path = logo_path(user_id, millis_timestamp(now()), &file.file_name);
        self.store
            .upload(Bucket::BrandLogos, &path, &file.bytes, &file.content_type)
            .await?;
        Ok(path)
    }
}

fn required_name(name: Option<&str>) -> Result<String> {
    let name = name.map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(Error::validation("Brand name is required"));
    }
    Ok(name.to_string())
}

/// Accept `#rgb` or `#rrggbb`; blank means "not supplied"
pub fn normalize_color(value: Option<String>, field: &str) -> Result<Option<String>> {
    let Some(value) = optional_text(value) else {
        return Ok(None);
    };

    let hex = value.strip_prefix('#').unwrap_or_default();
    let valid = matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(Error::validation(format!(
            "Invalid {}: '{}' (expected a hex color such as #8b5cf6)",
            field, value
        )));
    }
    Ok(Some(value.to_ascii_lowercase()))
}

/// Drop an empty file input; reject files that are not images
fn non_empty_logo(logo: Option<UploadedFile>) -> Result<Option<UploadedFile>> {
    let Some(file) = logo.filter(|f| !f.is_empty()) else {
        return Ok(None);
    };
    if !file.content_type.starts_with("image/") {
        return Err(Error::validation(format!(
            "Logo must be an image (got '{}')",
            file.content_type
        )));
    }
    Ok(Some(file))
}

//! Asset lifecycle
//!
//! Upload order is object first, row second; delete order is object first,
//! row second, and a failed object removal keeps the row so the delete can
//! be retried.

use brandhub_common::db::Asset;
use brandhub_common::time::{millis_timestamp, now};
use brandhub_common::{ensure_owner, Error, Result};
use serde::Serialize;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::{optional_text, owned_brand, UploadedFile};
use crate::db;
use crate::storage::{asset_path, Bucket, ObjectStore};

/// Group label for assets without a campaign
pub const DEFAULT_CAMPAIGN: &str = "General";

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// An asset upload request
#[derive(Debug, Clone)]
pub struct AssetUpload {
    pub file: UploadedFile,
    /// Display name; the file name is used when blank
    pub name: Option<String>,
    pub campaign: Option<String>,
}

/// Assets sharing one campaign label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignGroup {
    pub campaign: String,
    pub assets: Vec<Asset>,
}

#[derive(Clone)]
pub struct AssetManager {
    db: SqlitePool,
    store: Arc<dyn ObjectStore>,
}

impl AssetManager {
    pub fn new(db: SqlitePool, store: Arc<dyn ObjectStore>) -> Self {
        Self { db, store }
    }

    /// Assets of a brand the caller owns, newest first
    pub async fn list(&self, brand_id: Uuid, user_id: Uuid) -> Result<Vec<Asset>> {
        owned_brand(&self.db, brand_id, user_id).await?;
        db::assets::list_assets_for_brand(&self.db, brand_id).await
    }

    /// One asset of the caller
    pub async fn get(&self, asset_id: Uuid, user_id: Uuid) -> Result<Asset> {
        let asset = db::assets::get_asset(&self.db, asset_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("asset {}", asset_id)))?;
        ensure_owner(&asset, user_id)?;
        Ok(asset)
    }

    /// Store a file below a brand the caller owns and record it
    pub async fn upload(&self, brand_id: Uuid, user_id: Uuid, upload: AssetUpload) -> Result<Asset> {
        if upload.file.is_empty() {
            return Err(Error::validation("No file provided"));
        }
        owned_brand(&self.db, brand_id, user_id).await?;

        let created_at = now();
        let id = Uuid::new_v4();
        let file_path = asset_path(
            user_id,
            brand_id,
            millis_timestamp(created_at),
            id,
            &upload.file.file_name,
        );
        let file_type = match upload.file.content_type.trim() {
            "" => FALLBACK_CONTENT_TYPE.to_string(),
            ct => ct.to_string(),
        };
        let name = optional_text(upload.name)
            .or_else(|| optional_text(Some(upload.file.file_name.clone())))
            .unwrap_or_else(|| "Untitled asset".to_string());

        self.store
            .upload(Bucket::BrandAssets, &file_path, &upload.file.bytes, &file_type)
            .await?;

        let asset = Asset {
            id,
            brand_id,
            user_id,
            name,
            file_path,
            file_type,
            campaign: optional_text(upload.campaign),
            created_at,
        };

        if let Err(e) = db::assets::insert_asset(&self.db, &asset).await {
            warn!(
                "Asset row insert failed after upload; object {} is orphaned: {}",
                asset.file_path, e
            );
            return Err(e);
        }

        info!(
            "Uploaded asset {} ({} bytes) to brand {}",
            asset.id,
            upload.file.bytes.len(),
            brand_id
        );
        Ok(asset)
    }

    /// Delete an asset given its id, object path and brand
    ///
    /// The path and brand must match the stored row. When the object cannot
    /// be removed the row is kept and the storage error is returned.
    pub async fn delete(
        &self,
        asset_id: Uuid,
        file_path: &str,
        brand_id: Uuid,
        user_id: Uuid,
    ) -> Result<()> {
        let asset = self.get(asset_id, user_id).await?;
        if asset.file_path != file_path || asset.brand_id != brand_id {
            return Err(Error::validation(format!(
                "asset {} does not match the given file path and brand",
                asset_id
            )));
        }

        self.store
            .remove(Bucket::BrandAssets, &[asset.file_path.clone()])
            .await?;
        db::assets::delete_asset(&self.db, asset_id).await?;

        info!("Deleted asset {} of brand {}", asset_id, brand_id);
        Ok(())
    }

    /// Delete an asset by id, taking path and brand from the stored row
    pub async fn delete_by_id(&self, asset_id: Uuid, user_id: Uuid) -> Result<()> {
        let asset = self.get(asset_id, user_id).await?;
        self.delete(asset.id, &asset.file_path, asset.brand_id, user_id)
            .await
    }

    /// Read back the stored file of an asset
    pub async fn download(&self, asset_id: Uuid, user_id: Uuid) -> Result<(Asset, Vec<u8>)> {
        let asset = self.get(asset_id, user_id).await?;
        let bytes = self
            .store
            .download(Bucket::BrandAssets, &asset.file_path)
            .await?;
        Ok((asset, bytes))
    }
}

/// Group assets by campaign, keeping first-seen group order
///
/// Assets without a campaign land in [`DEFAULT_CAMPAIGN`].
pub fn group_by_campaign(assets: &[Asset]) -> Vec<CampaignGroup> {
    let mut groups: Vec<CampaignGroup> = Vec::new();
    for asset in assets {
        let label = asset
            .campaign
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CAMPAIGN);

        match groups.iter_mut().find(|g| g.campaign == label) {
            Some(group) => group.assets.push(asset.clone()),
            None => groups.push(CampaignGroup {
                campaign: label.to_string(),
                assets: vec![asset.clone()],
            }),
        }
    }
    groups
}

//! Asset persistence

use brandhub_common::db::Asset;
use brandhub_common::time::to_db_timestamp;
use brandhub_common::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite, SqlitePool};
use uuid::Uuid;

use super::{parse_timestamp, parse_uuid};

const ASSET_COLUMNS: &str = "id, brand_id, user_id, name, file_path, file_type, campaign, created_at";

fn asset_from_row(row: &SqliteRow) -> Result<Asset> {
    let id: String = row.try_get("id")?;
    let brand_id: String = row.try_get("brand_id")?;
    let user_id: String = row.try_get("user_id")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(Asset {
        id: parse_uuid(&id, "assets.id")?,
        brand_id: parse_uuid(&brand_id, "assets.brand_id")?,
        user_id: parse_uuid(&user_id, "assets.user_id")?,
        name: row.try_get("name")?,
        file_path: row.try_get("file_path")?,
        file_type: row.try_get("file_type")?,
        campaign: row.try_get("campaign")?,
        created_at: parse_timestamp(&created_at)?,
    })
}

/// Insert a new asset row
pub async fn insert_asset(pool: &SqlitePool, asset: &Asset) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO assets (id, brand_id, user_id, name, file_path, file_type, campaign, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(asset.id.to_string())
    .bind(asset.brand_id.to_string())
    .bind(asset.user_id.to_string())
    .bind(&asset.name)
    .bind(&asset.file_path)
    .bind(&asset.file_type)
    .bind(&asset.campaign)
    .bind(to_db_timestamp(asset.created_at))
    .execute(pool)
    .await?;

    Ok(())
}

/// Load an asset by id regardless of owner
pub async fn get_asset(pool: &SqlitePool, id: Uuid) -> Result<Option<Asset>> {
    let row = sqlx::query(&format!("SELECT {} FROM assets WHERE id = ?", ASSET_COLUMNS))
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(asset_from_row).transpose()
}

/// All assets of a brand, newest first
pub async fn list_assets_for_brand(pool: &SqlitePool, brand_id: Uuid) -> Result<Vec<Asset>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM assets WHERE brand_id = ? ORDER BY created_at DESC, rowid DESC",
        ASSET_COLUMNS
    ))
    .bind(brand_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.iter().map(asset_from_row).collect()
}

/// Delete one asset row
pub async fn delete_asset(pool: &SqlitePool, id: Uuid) -> Result<u64> {
    let result = sqlx::query("DELETE FROM assets WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Delete every asset row of a brand
pub async fn delete_assets_for_brand<'e, E>(executor: E, brand_id: Uuid) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM assets WHERE brand_id = ?")
        .bind(brand_id.to_string())
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

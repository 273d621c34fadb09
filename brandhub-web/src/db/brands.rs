//! Brand persistence

use brandhub_common::db::Brand;
use brandhub_common::time::to_db_timestamp;
use brandhub_common::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite, SqlitePool};
use uuid::Uuid;

use super::{parse_timestamp, parse_uuid};

const BRAND_COLUMNS: &str = "id, user_id, name, description, primary_color, secondary_color, \
                             font, website_url, logo_path, logo_url, created_at";

fn brand_from_row(row: &SqliteRow) -> Result<Brand> {
    let id: String = row.try_get("id")?;
    let user_id: String = row.try_get("user_id")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(Brand {
        id: parse_uuid(&id, "brands.id")?,
        user_id: parse_uuid(&user_id, "brands.user_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        primary_color: row.try_get("primary_color")?,
        secondary_color: row.try_get("secondary_color")?,
        font: row.try_get("font")?,
        website_url: row.try_get("website_url")?,
        logo_path: row.try_get("logo_path")?,
        logo_url: row.try_get("logo_url")?,
        created_at: parse_timestamp(&created_at)?,
    })
}

/// Insert a new brand row
pub async fn insert_brand(pool: &SqlitePool, brand: &Brand) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO brands (id, user_id, name, description, primary_color, secondary_color,
                            font, website_url, logo_path, logo_url, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(brand.id.to_string())
    .bind(brand.user_id.to_string())
    .bind(&brand.name)
    .bind(&brand.description)
    .bind(&brand.primary_color)
    .bind(&brand.secondary_color)
    .bind(&brand.font)
    .bind(&brand.website_url)
    .bind(&brand.logo_path)
    .bind(&brand.logo_url)
    .bind(to_db_timestamp(brand.created_at))
    .execute(pool)
    .await?;

    Ok(())
}

/// Load a brand by id regardless of owner
pub async fn get_brand(pool: &SqlitePool, id: Uuid) -> Result<Option<Brand>> {
    let row = sqlx::query(&format!("SELECT {} FROM brands WHERE id = ?", BRAND_COLUMNS))
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(brand_from_row).transpose()
}

/// All brands of a user, newest first
pub async fn list_brands_for_user(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<Brand>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM brands WHERE user_id = ? ORDER BY created_at DESC, rowid DESC",
        BRAND_COLUMNS
    ))
    .bind(user_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.iter().map(brand_from_row).collect()
}

/// Overwrite the mutable columns of a brand
///
/// Returns the number of rows touched (0 if the brand vanished meanwhile).
pub async fn update_brand(pool: &SqlitePool, brand: &Brand) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE brands SET
            name = ?,
            description = ?,
            primary_color = ?,
            secondary_color = ?,
            font = ?,
            website_url = ?,
            logo_path = ?,
            logo_url = ?
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(&brand.name)
    .bind(&brand.description)
    .bind(&brand.primary_color)
    .bind(&brand.secondary_color)
    .bind(&brand.font)
    .bind(&brand.website_url)
    .bind(&brand.logo_path)
    .bind(&brand.logo_url)
    .bind(brand.id.to_string())
    .bind(brand.user_id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Delete a brand row
pub async fn delete_brand<'e, E>(executor: E, id: Uuid) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM brands WHERE id = ?")
        .bind(id.to_string())
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

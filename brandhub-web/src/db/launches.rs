//! Launch persistence
//!
//! The task list is a JSON document in the `tasks` column, always written
//! whole.

use brandhub_common::db::{Launch, LaunchTask};
use brandhub_common::time::to_db_timestamp;
use brandhub_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{parse_timestamp, parse_uuid};

const LAUNCH_COLUMNS: &str =
    "id, brand_id, user_id, title, description, start_date, end_date, status, tasks, created_at";

fn launch_from_row(row: &SqliteRow) -> Result<Launch> {
    let id: String = row.try_get("id")?;
    let brand_id: String = row.try_get("brand_id")?;
    let user_id: String = row.try_get("user_id")?;
    let start_date: String = row.try_get("start_date")?;
    let end_date: Option<String> = row.try_get("end_date")?;
    let status: String = row.try_get("status")?;
    let tasks: String = row.try_get("tasks")?;
    let created_at: String = row.try_get("created_at")?;

    let tasks: Vec<LaunchTask> = serde_json::from_str(&tasks)
        .map_err(|e| Error::Persistence(format!("Invalid task list for launch {}: {}", id, e)))?;

    Ok(Launch {
        id: parse_uuid(&id, "launches.id")?,
        brand_id: parse_uuid(&brand_id, "launches.brand_id")?,
        user_id: parse_uuid(&user_id, "launches.user_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        start_date: parse_timestamp(&start_date)?,
        end_date: end_date.as_deref().map(parse_timestamp).transpose()?,
        status: status
            .parse()
            .map_err(|e| Error::Persistence(format!("launches.status: {}", e)))?,
        tasks,
        created_at: parse_timestamp(&created_at)?,
    })
}

fn tasks_json(tasks: &[LaunchTask]) -> Result<String> {
    serde_json::to_string(tasks)
        .map_err(|e| Error::Persistence(format!("Cannot encode task list: {}", e)))
}

/// Insert a new launch row
pub async fn insert_launch(pool: &SqlitePool, launch: &Launch) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO launches (id, brand_id, user_id, title, description, start_date, end_date,
                              status, tasks, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(launch.id.to_string())
    .bind(launch.brand_id.to_string())
    .bind(launch.user_id.to_string())
    .bind(&launch.title)
    .bind(&launch.description)
    .bind(to_db_timestamp(launch.start_date))
    .bind(launch.end_date.map(to_db_timestamp))
    .bind(launch.status.as_str())
    .bind(tasks_json(&launch.tasks)?)
    .bind(to_db_timestamp(launch.created_at))
    .execute(pool)
    .await?;

    Ok(())
}

/// Replace every mutable column of a launch, including the full task list
pub async fn update_launch(pool: &SqlitePool, launch: &Launch) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE launches SET
            brand_id = ?,
            title = ?,
            description = ?,
            start_date = ?,
            end_date = ?,
            status = ?,
            tasks = ?
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(launch.brand_id.to_string())
    .bind(&launch.title)
    .bind(&launch.description)
    .bind(to_db_timestamp(launch.start_date))
    .bind(launch.end_date.map(to_db_timestamp))
    .bind(launch.status.as_str())
    .bind(tasks_json(&launch.tasks)?)
    .bind(launch.id.to_string())
    .bind(launch.user_id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Load a launch by id regardless of owner
pub async fn get_launch(pool: &SqlitePool, id: Uuid) -> Result<Option<Launch>> {
    let row = sqlx::query(&format!("SELECT {} FROM launches WHERE id = ?", LAUNCH_COLUMNS))
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(launch_from_row).transpose()
}

/// All launches of a user ordered by start date
pub async fn list_launches_for_user(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<Launch>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM launches WHERE user_id = ? ORDER BY start_date ASC, rowid ASC",
        LAUNCH_COLUMNS
    ))
    .bind(user_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.iter().map(launch_from_row).collect()
}

/// Delete one launch row
pub async fn delete_launch(pool: &SqlitePool, id: Uuid) -> Result<u64> {
    let result = sqlx::query("DELETE FROM launches WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

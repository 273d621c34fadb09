//! Subscription lookups
//!
//! Rows are written by the external billing webhook; this service only reads.

use brandhub_common::db::{Subscription, ACTIVE_SUBSCRIPTION_STATUSES};
use brandhub_common::Result;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::parse_uuid;

/// The subscription row of a user, if any
pub async fn get_subscription(pool: &SqlitePool, user_id: Uuid) -> Result<Option<Subscription>> {
    let row = sqlx::query(
        r#"
        SELECT id, user_id, status, provider_subscription_id, plan_id, ends_at, trial_ends_at
        FROM subscriptions
        WHERE user_id = ?
        "#,
    )
    .bind(user_id.to_string())
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let stored_user: String = row.try_get("user_id")?;
    Ok(Some(Subscription {
        id: row.try_get("id")?,
        user_id: parse_uuid(&stored_user, "subscriptions.user_id")?,
        status: row.try_get("status")?,
        provider_subscription_id: row.try_get("provider_subscription_id")?,
        plan_id: row.try_get("plan_id")?,
        ends_at: row.try_get("ends_at")?,
        trial_ends_at: row.try_get("trial_ends_at")?,
    }))
}

/// Whether a row exists for the user with an access-granting status
pub async fn has_active_subscription(pool: &SqlitePool, user_id: Uuid) -> Result<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM subscriptions WHERE user_id = ? AND status IN (?, ?)",
    )
    .bind(user_id.to_string())
    .bind(ACTIVE_SUBSCRIPTION_STATUSES[0])
    .bind(ACTIVE_SUBSCRIPTION_STATUSES[1])
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}

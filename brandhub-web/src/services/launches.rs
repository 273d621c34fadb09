//! Launch lifecycle

use brandhub_common::db::{Launch, LaunchStatus, LaunchTask};
use brandhub_common::time::{normalize_date_input, now};
use brandhub_common::{ensure_owner, Error, Result};
use chrono::FixedOffset;
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use super::calendar::{self, CalendarMonth, MonthRef};
use super::{optional_text, owned_brand};
use crate::db;

/// Launch fields as submitted by the launch form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LaunchDraft {
    /// Brand id as text; the form sends an empty string when none is chosen
    #[serde(default)]
    pub brand_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub status: LaunchStatus,
    #[serde(default)]
    pub tasks: Vec<LaunchTask>,
}

/// A draft after validation and date normalization
struct ValidDraft {
    brand_id: Uuid,
    title: String,
    description: Option<String>,
    start_date: chrono::DateTime<chrono::Utc>,
    end_date: Option<chrono::DateTime<chrono::Utc>>,
    status: LaunchStatus,
    tasks: Vec<LaunchTask>,
}

impl LaunchDraft {
    fn validate(self, offset: FixedOffset) -> Result<ValidDraft> {
        let brand_id = match optional_text(self.brand_id) {
            None => return Err(Error::validation("You must select a brand")),
            Some(id) => Uuid::parse_str(&id)
                .map_err(|_| Error::validation(format!("Invalid brand id: '{}'", id)))?,
        };

        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(Error::validation("Launch title is required"));
        }

        let start_date = normalize_date_input(&self.start_date, offset)?;
        let end_date = optional_text(self.end_date)
            .map(|d| normalize_date_input(&d, offset))
            .transpose()?;
        if let Some(end) = end_date {
            if end < start_date {
                return Err(Error::validation("End date cannot be before the start date"));
            }
        }

        let tasks = self
            .tasks
            .into_iter()
            .filter_map(|t| {
                let text = t.text.trim().to_string();
                (!text.is_empty()).then_some(LaunchTask {
                    text,
                    completed: t.completed,
                })
            })
            .collect();

        Ok(ValidDraft {
            brand_id,
            title,
            description: optional_text(self.description),
            start_date,
            end_date,
            status: self.status,
            tasks,
        })
    }
}

#[derive(Clone)]
pub struct LaunchManager {
    db: SqlitePool,
}

impl LaunchManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Create (`launch_id` None) or update a launch of the caller
    ///
    /// Dates without an explicit offset are read in `offset`. On update the
    /// submitted task list replaces the stored one.
    pub async fn save(
        &self,
        launch_id: Option<Uuid>,
        user_id: Uuid,
        draft: LaunchDraft,
        offset: FixedOffset,
    ) -> Result<Launch> {
        let draft = draft.validate(offset)?;

        let existing = match launch_id {
            Some(id) => {
                let launch = db::launches::get_launch(&self.db, id)
                    .await?
                    .ok_or_else(|| Error::NotFound(format!("launch {}", id)))?;
                ensure_owner(&launch, user_id)?;
                Some(launch)
            }
            None => None,
        };

        owned_brand(&self.db, draft.brand_id, user_id).await?;

        let launch = Launch {
            id: existing.as_ref().map(|l| l.id).unwrap_or_else(Uuid::new_v4),
            brand_id: draft.brand_id,
            user_id,
            title: draft.title,
            description: draft.description,
            start_date: draft.start_date,
            end_date: draft.end_date,
            status: draft.status,
            tasks: draft.tasks,
            created_at: existing.as_ref().map(|l| l.created_at).unwrap_or_else(now),
        };

        if existing.is_some() {
            let updated = db::launches::update_launch(&self.db, &launch).await?;
            if updated == 0 {
                return Err(Error::NotFound(format!("launch {}", launch.id)));
            }
            info!("Updated launch {} ({})", launch.id, launch.status);
        } else {
            db::launches::insert_launch(&self.db, &launch).await?;
            info!("Created launch {} for brand {}", launch.id, launch.brand_id);
        }

        Ok(launch)
    }

    /// Delete a launch of the caller
    pub async fn delete(&self, launch_id: Uuid, user_id: Uuid) -> Result<()> {
        let launch = db::launches::get_launch(&self.db, launch_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("launch {}", launch_id)))?;
        ensure_owner(&launch, user_id)?;

        db::launches::delete_launch(&self.db, launch_id).await?;
        info!("Deleted launch {}", launch_id);
        Ok(())
    }

    /// All launches of the caller ordered by start date
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Launch>> {
        db::launches::list_launches_for_user(&self.db, user_id).await
    }

    /// Month view of the caller's launches
    pub async fn calendar(
        &self,
        user_id: Uuid,
        month: MonthRef,
        offset: FixedOffset,
    ) -> Result<CalendarMonth> {
        let launches = self.list(user_id).await?;
        let brands = db::brands::list_brands_for_user(&self.db, user_id).await?;
        calendar::build_month(&launches, &brands, month, offset)
    }
}

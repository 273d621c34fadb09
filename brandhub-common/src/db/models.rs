//! Database models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::ownership::Owned;
use crate::Error;

/// Subscription statuses that grant paid access
pub const ACTIVE_SUBSCRIPTION_STATUSES: [&str; 2] = ["active", "trialing"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brand {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub font: Option<String>,
    pub website_url: Option<String>,
    /// Object path in the `brand_logos` bucket
    pub logo_path: Option<String>,
    /// Publicly readable URL of the logo
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Owned for Brand {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }

    fn kind(&self) -> &'static str {
        "brand"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub user_id: Uuid,
    /// Display name
    pub name: String,
    /// Object path in the `brand_assets` bucket
    pub file_path: String,
    /// MIME type reported at upload
    pub file_type: String,
    /// Free-text campaign label used for grouping
    pub campaign: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Owned for Asset {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }

    fn kind(&self) -> &'static str {
        "asset"
    }
}

/// Launch lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LaunchStatus {
    #[default]
    Planned,
    InProgress,
    Done,
}

impl LaunchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LaunchStatus::Planned => "planned",
            LaunchStatus::InProgress => "in-progress",
            LaunchStatus::Done => "done",
        }
    }
}

impl fmt::Display for LaunchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LaunchStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planned" => Ok(LaunchStatus::Planned),
            "in-progress" => Ok(LaunchStatus::InProgress),
            "done" => Ok(LaunchStatus::Done),
            other => Err(Error::validation(format!("Unknown launch status: '{}'", other))),
        }
    }
}

/// One checklist entry of a launch; the list is stored as a whole document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchTask {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Launch {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: LaunchStatus,
    pub tasks: Vec<LaunchTask>,
    pub created_at: DateTime<Utc>,
}

impl Launch {
    /// Completed-task percentage, `None` when there are no tasks
    pub fn progress(&self) -> Option<u8> {
        task_progress(&self.tasks)
    }
}

impl Owned for Launch {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }

    fn kind(&self) -> &'static str {
        "launch"
    }
}

/// Percentage of completed tasks rounded to the nearest integer
///
/// Returns `None` for an empty list so no progress bar is rendered.
pub fn task_progress(tasks: &[LaunchTask]) -> Option<u8> {
    if tasks.is_empty() {
        return None;
    }
    let completed = tasks.iter().filter(|t| t.completed).count();
    let percent = (completed as f64 / tasks.len() as f64 * 100.0).round();
    Some(percent as u8)
}

/// Subscription row written by the billing webhook; read-only here
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub user_id: Uuid,
    pub status: Option<String>,
    /// Subscription id at the payment provider
    pub provider_subscription_id: String,
    pub plan_id: Option<String>,
    pub ends_at: Option<String>,
    pub trial_ends_at: Option<String>,
}

impl Subscription {
    /// Whether this row's status grants paid access
    pub fn grants_access(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| ACTIVE_SUBSCRIPTION_STATUSES.contains(&s))
    }
}

//! Subscription access checks
//!
//! Access is evaluated on every request; nothing is cached. Any failure to
//! determine access is treated as "no access".

use serde::Serialize;
use sqlx::SqlitePool;
use std::fmt;
use std::future::Future;
use tracing::warn;
use uuid::Uuid;

use crate::db::subscriptions;

/// Features reserved for paying subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PaidFeature {
    LaunchCalendar,
    StyleChecker,
}

impl PaidFeature {
    /// Name shown in the upsell prompt
    pub fn display_name(&self) -> &'static str {
        match self {
            PaidFeature::LaunchCalendar => "Launch Calendar",
            PaidFeature::StyleChecker => "AI Brand Style Checker",
        }
    }
}

impl fmt::Display for PaidFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Whether the user has a subscription row with status `active` or `trialing`
///
/// Lookup errors are logged and count as no access.
pub async fn has_active_access(db: &SqlitePool, user_id: Uuid) -> bool {
    match subscriptions::has_active_subscription(db, user_id).await {
        Ok(active) => active,
        Err(e) => {
            warn!("Subscription lookup failed for user {}: {} (denying access)", user_id, e);
            false
        }
    }
}

/// Run `protected` only when `has_access` holds, otherwise produce the fallback
///
/// The protected future is never polled without access.
pub async fn gate<T, P, F>(has_access: bool, protected: P, fallback: F) -> T
where
    P: Future<Output = T>,
    F: FnOnce() -> T,
{
    if has_access {
        protected.await
    } else {
        fallback()
    }
}

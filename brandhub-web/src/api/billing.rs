//! Pricing and subscription status endpoints

use axum::{extract::State, http::HeaderMap, Extension, Json};
use serde::Serialize;
use tracing::warn;

use super::auth::{caller_from_headers, CallerId};
use crate::db::subscriptions::get_subscription;
use crate::error::ApiResult;
use crate::services::access::has_active_access;
use crate::services::pricing::{pricing_tiers, PricingTier};
use crate::AppState;

/// Subscription status of the caller
#[derive(Debug, Serialize)]
pub struct SubscriptionStatus {
    pub has_active_access: bool,
    pub status: Option<String>,
    pub plan_id: Option<String>,
    pub ends_at: Option<String>,
    pub trial_ends_at: Option<String>,
}

/// GET /api/subscription
pub async fn get_subscription_status(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
) -> ApiResult<Json<SubscriptionStatus>> {
    let subscription = get_subscription(&state.db, caller.0).await?;
    let has_active_access = has_active_access(&state.db, caller.0).await;

    Ok(Json(SubscriptionStatus {
        has_active_access,
        status: subscription.as_ref().and_then(|s| s.status.clone()),
        plan_id: subscription.as_ref().and_then(|s| s.plan_id.clone()),
        ends_at: subscription.as_ref().and_then(|s| s.ends_at.clone()),
        trial_ends_at: subscription.and_then(|s| s.trial_ends_at),
    }))
}

/// GET /api/pricing
///
/// Public; a caller id, when present, personalizes checkout links and marks
/// the current tier.
pub async fn get_pricing(State(state): State<AppState>, headers: HeaderMap) -> Json<Vec<PricingTier>> {
    let caller = caller_from_headers(&headers).ok().map(|c| c.0);

    let subscription = match caller {
        Some(user_id) => match get_subscription(&state.db, user_id).await {
            Ok(sub) => sub,
            Err(e) => {
                warn!("Subscription lookup failed for pricing page: {}", e);
                None
            }
        },
        None => None,
    };

    Json(pricing_tiers(&state.billing, caller, subscription.as_ref()))
}

//! Subscription gates for paid route groups
//!
//! Access is checked on every request. Without it the protected handler is
//! never run and an upsell naming the feature is returned instead.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    Extension,
};

use super::auth::CallerId;
use crate::error::ApiError;
use crate::services::access::{gate, has_active_access};
use crate::services::PaidFeature;
use crate::AppState;

/// Gate for every launch route
pub async fn launch_calendar_guard(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
    request: Request,
    next: Next,
) -> Response {
    paid_feature_guard(&state, caller, PaidFeature::LaunchCalendar, request, next).await
}

/// Gate for the style checker
pub async fn style_checker_guard(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
    request: Request,
    next: Next,
) -> Response {
    paid_feature_guard(&state, caller, PaidFeature::StyleChecker, request, next).await
}

async fn paid_feature_guard(
    state: &AppState,
    caller: CallerId,
    feature: PaidFeature,
    request: Request,
    next: Next,
) -> Response {
    let has_access = has_active_access(&state.db, caller.0).await;
    if !has_access {
        tracing::debug!("User {} lacks access to {}", caller.0, feature);
    }
    gate(has_access, next.run(request), || {
        ApiError::UpgradeRequired(feature).into_response()
    })
    .await
}

//! Launch and calendar endpoints
//!
//! All routes here sit behind the Launch Calendar gate.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use brandhub_common::db::Launch;
use brandhub_common::time::offset_from_minutes;
use brandhub_common::Error;
use chrono::{FixedOffset, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::auth::CallerId;
use crate::error::ApiResult;
use crate::services::calendar::{local_day, CalendarMonth, MonthRef};
use crate::services::launches::LaunchDraft;
use crate::AppState;

/// Viewer offset for interpreting and bucketing dates
#[derive(Debug, Default, Deserialize)]
pub struct OffsetQuery {
    pub tz_offset_minutes: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CalendarQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub tz_offset_minutes: Option<i32>,
}

fn viewer_offset(state: &AppState, minutes: Option<i32>) -> ApiResult<FixedOffset> {
    match minutes {
        Some(m) => Ok(offset_from_minutes(m)?),
        None => Ok(state.default_offset()),
    }
}

/// GET /api/launches
pub async fn list_launches(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
) -> ApiResult<Json<Vec<Launch>>> {
    Ok(Json(state.launches().list(caller.0).await?))
}

/// POST /api/launches
pub async fn create_launch(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
    Query(query): Query<OffsetQuery>,
    Json(draft): Json<LaunchDraft>,
) -> ApiResult<(StatusCode, Json<Launch>)> {
    let offset = viewer_offset(&state, query.tz_offset_minutes)?;
    let launch = state.launches().save(None, caller.0, draft, offset).await?;
    Ok((StatusCode::CREATED, Json(launch)))
}

/// PUT /api/launches/:id
pub async fn update_launch(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
    Path(launch_id): Path<Uuid>,
    Query(query): Query<OffsetQuery>,
    Json(draft): Json<LaunchDraft>,
) -> ApiResult<Json<Launch>> {
    let offset = viewer_offset(&state, query.tz_offset_minutes)?;
    let launch = state
        .launches()
        .save(Some(launch_id), caller.0, draft, offset)
        .await?;
    Ok(Json(launch))
}

/// DELETE /api/launches/:id
pub async fn delete_launch(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
    Path(launch_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.launches().delete(launch_id, caller.0).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/launches/calendar?year=&month=&tz_offset_minutes=
///
/// Without year and month the current month in the viewer's offset is shown.
pub async fn get_calendar(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
    Query(query): Query<CalendarQuery>,
) -> ApiResult<Json<CalendarMonth>> {
    let offset = viewer_offset(&state, query.tz_offset_minutes)?;
    let month = match (query.year, query.month) {
        (Some(year), Some(month)) => MonthRef::new(year, month)?,
        (None, None) => MonthRef::containing(local_day(Utc::now(), offset)),
        _ => {
            return Err(Error::validation("year and month must be given together").into());
        }
    };

    Ok(Json(state.launches().calendar(caller.0, month, offset).await?))
}

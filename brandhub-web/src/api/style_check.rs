//! Style checker endpoint

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use super::auth::CallerId;
use crate::error::ApiResult;
use crate::services::style_check::{run_style_check, StyleCheckInput, StyleCheckResult};
use crate::AppState;

/// POST /api/brands/:id/style-check
///
/// Body: `{"text": "...", "image": {"mime_type": "image/png", "data": "<base64>"}}`,
/// at least one of the two.
pub async fn check_style(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
    Path(brand_id): Path<Uuid>,
    Json(input): Json<StyleCheckInput>,
) -> ApiResult<Json<StyleCheckResult>> {
    let brand = state.brands().get(brand_id, caller.0).await?;
    let result = run_style_check(state.analyzer.as_ref(), &brand, input).await?;
    Ok(Json(result))
}

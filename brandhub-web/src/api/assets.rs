//! Asset endpoints

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use brandhub_common::db::Asset;
use brandhub_common::Error;
use uuid::Uuid;

use super::auth::CallerId;
use super::forms::read_multipart;
use crate::error::ApiResult;
use crate::services::assets::AssetUpload;
use crate::AppState;

/// GET /api/brands/:id/assets
pub async fn list_assets(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
    Path(brand_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Asset>>> {
    Ok(Json(state.assets().list(brand_id, caller.0).await?))
}

/// POST /api/brands/:id/assets (multipart: `file`, optional `name`, `campaign`)
pub async fn upload_asset(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
    Path(brand_id): Path<Uuid>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Asset>)> {
    let mut form = read_multipart(multipart).await?;
    let file = form
        .take_file("file")
        .ok_or_else(|| Error::validation("No file provided"))?;

    let asset = state
        .assets()
        .upload(
            brand_id,
            caller.0,
            AssetUpload {
                file,
                name: form.text("name"),
                campaign: form.text("campaign"),
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(asset)))
}

/// DELETE /api/assets/:id
pub async fn delete_asset(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
    Path(asset_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.assets().delete_by_id(asset_id, caller.0).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/assets/:id/file
///
/// Streams the stored object back to its owner.
pub async fn download_asset(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
    Path(asset_id): Path<Uuid>,
) -> ApiResult<Response> {
    let (asset, bytes) = state.assets().download(asset_id, caller.0).await?;
    let safe_name: String = asset
        .name
        .chars()
        .map(|c| {
            if c == ' ' || (c.is_ascii_graphic() && c != '"' && c != '\\') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let disposition = format!("inline; filename=\"{}\"", safe_name);

    Ok((
        [
            (header::CONTENT_TYPE, asset.file_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

//! Brand endpoints

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Extension, Json,
};
use brandhub_common::db::Brand;
use serde::Serialize;
use uuid::Uuid;

use super::auth::CallerId;
use super::forms::{read_multipart, FormData};
use crate::error::ApiResult;
use crate::services::access::has_active_access;
use crate::services::assets::{group_by_campaign, CampaignGroup};
use crate::services::brands::{BrandDeletion, BrandFields};
use crate::AppState;

/// Brand page payload
#[derive(Debug, Serialize)]
pub struct BrandDetail {
    pub brand: Brand,
    /// Assets grouped by campaign label
    pub campaigns: Vec<CampaignGroup>,
    pub has_active_subscription: bool,
}

fn brand_fields(form: &FormData) -> BrandFields {
    BrandFields {
        name: form.text("name"),
        description: form.text("description"),
        primary_color: form.text("primary_color"),
        secondary_color: form.text("secondary_color"),
        font: form.text("font"),
        website_url: form.text("website_url"),
    }
}

/// GET /api/brands
pub async fn list_brands(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
) -> ApiResult<Json<Vec<Brand>>> {
    Ok(Json(state.brands().list(caller.0).await?))
}

/// POST /api/brands (multipart: brand fields plus optional `logo` file)
pub async fn create_brand(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Brand>)> {
    let mut form = read_multipart(multipart).await?;
    let logo = form.take_file("logo");
    let brand = state
        .brands()
        .create(caller.0, brand_fields(&form), logo)
        .await?;
    Ok((StatusCode::CREATED, Json(brand)))
}

/// GET /api/brands/:id
pub async fn get_brand(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
    Path(brand_id): Path<Uuid>,
) -> ApiResult<Json<BrandDetail>> {
    let brand = state.brands().get(brand_id, caller.0).await?;
    let assets = state.assets().list(brand_id, caller.0).await?;
    let has_active_subscription = has_active_access(&state.db, caller.0).await;

    Ok(Json(BrandDetail {
        brand,
        campaigns: group_by_campaign(&assets),
        has_active_subscription,
    }))
}

/// PUT /api/brands/:id (multipart; omitted fields keep their value)
pub async fn update_brand(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
    Path(brand_id): Path<Uuid>,
    multipart: Multipart,
) -> ApiResult<Json<Brand>> {
    let mut form = read_multipart(multipart).await?;
    let logo = form.take_file("logo");
    let brand = state
        .brands()
        .update(brand_id, caller.0, brand_fields(&form), logo)
        .await?;
    Ok(Json(brand))
}

/// DELETE /api/brands/:id
pub async fn delete_brand(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
    Path(brand_id): Path<Uuid>,
) -> ApiResult<Json<BrandDeletion>> {
    Ok(Json(state.brands().delete(brand_id, caller.0).await?))
}

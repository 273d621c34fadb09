//! brandhub-web library - BrandHub HTTP service
//!
//! Multi-tenant brand management: brands with logos, campaign assets,
//! subscription-gated launch calendar and AI brand style checker.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};
use brandhub_common::config::{BillingConfig, BrandHubConfig};
use brandhub_common::time::offset_from_minutes;
use chrono::{DateTime, FixedOffset, Utc};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod error;
pub mod services;
pub mod storage;

use services::style_check::StyleAnalyzer;
use services::{AssetManager, BrandManager, LaunchManager};
use storage::{Bucket, ObjectStore};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Object store holding logos and assets
    pub store: Arc<dyn ObjectStore>,
    /// Style checker backend
    pub analyzer: Arc<dyn StyleAnalyzer>,
    /// Checkout settings for the pricing page
    pub billing: BillingConfig,
    /// Offset used when a request does not send its own
    pub utc_offset: FixedOffset,
    /// Directory served publicly under /storage/brand_logos
    pub logo_dir: PathBuf,
    /// Request body limit for uploads
    pub max_upload_bytes: usize,
    /// Server startup time for uptime calculation
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        db: SqlitePool,
        store: Arc<dyn ObjectStore>,
        analyzer: Arc<dyn StyleAnalyzer>,
        config: &BrandHubConfig,
    ) -> brandhub_common::Result<Self> {
        Ok(Self {
            db,
            store,
            analyzer,
            billing: config.billing.clone(),
            utc_offset: offset_from_minutes(config.utc_offset_minutes)?,
            logo_dir: config.storage_root().join(Bucket::BrandLogos.name()),
            max_upload_bytes: config.max_upload_bytes,
            startup_time: Utc::now(),
        })
    }

    pub fn brands(&self) -> BrandManager {
        BrandManager::new(self.db.clone(), self.store.clone())
    }

    pub fn assets(&self) -> AssetManager {
        AssetManager::new(self.db.clone(), self.store.clone())
    }

    pub fn launches(&self) -> LaunchManager {
        LaunchManager::new(self.db.clone())
    }

    pub fn default_offset(&self) -> FixedOffset {
        self.utc_offset
    }
}

/// Build application router
///
/// Health, build info, pricing and logos are public; everything else
/// requires a caller id, and the launch and style-check routes additionally
/// require an active subscription.
pub fn build_router(state: AppState) -> Router {
    // Paid: Launch Calendar
    let launch_calendar = Router::new()
        .route("/api/launches", get(api::list_launches).post(api::create_launch))
        .route("/api/launches/calendar", get(api::get_calendar))
        .route("/api/launches/:id", put(api::update_launch).delete(api::delete_launch))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            api::launch_calendar_guard,
        ));

    // Paid: AI Brand Style Checker
    let style_checker = Router::new()
        .route("/api/brands/:id/style-check", post(api::check_style))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            api::style_checker_guard,
        ));

    // Protected routes (require a caller id)
    let protected = Router::new()
        .route("/api/brands", get(api::list_brands).post(api::create_brand))
        .route(
            "/api/brands/:id",
            get(api::get_brand)
                .put(api::update_brand)
                .delete(api::delete_brand),
        )
        .route(
            "/api/brands/:id/assets",
            get(api::list_assets).post(api::upload_asset),
        )
        .route("/api/assets/:id", axum::routing::delete(api::delete_asset))
        .route("/api/assets/:id/file", get(api::download_asset))
        .route("/api/subscription", get(api::get_subscription_status))
        .merge(launch_calendar)
        .merge(style_checker)
        .route_layer(middleware::from_fn(api::require_caller));

    // Public routes (no authentication)
    let public = Router::new()
        .route("/api/pricing", get(api::get_pricing))
        .route("/api/buildinfo", get(api::get_build_info))
        .nest_service("/storage/brand_logos", ServeDir::new(&state.logo_dir))
        .merge(api::health_routes());

    let body_limit = state.max_upload_bytes;

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

//! Build identification for the running BrandHub instance

use axum::{extract::State, response::Json};
use brandhub_common::time::to_db_timestamp;
use serde::Serialize;

use crate::AppState;

/// Which build is answering, and since when
#[derive(Debug, Serialize)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
    /// Short commit hash, suffixed `-dirty` for uncommitted trees
    pub git_hash: &'static str,
    pub build_timestamp: &'static str,
    pub build_profile: &'static str,
    pub started_at: String,
}

impl BuildInfo {
    /// `brandhub 0.1.0 (a1b2c3d4, release)`, logged at startup
    pub fn banner() -> String {
        format!(
            "brandhub {} ({}, {})",
            env!("CARGO_PKG_VERSION"),
            env!("GIT_HASH"),
            env!("BUILD_PROFILE")
        )
    }
}

/// GET /api/buildinfo
pub async fn get_build_info(State(state): State<AppState>) -> Json<BuildInfo> {
    Json(BuildInfo {
        service: "brandhub",
        version: env!("CARGO_PKG_VERSION"),
        git_hash: env!("GIT_HASH"),
        build_timestamp: env!("BUILD_TIMESTAMP"),
        build_profile: env!("BUILD_PROFILE"),
        started_at: to_db_timestamp(state.startup_time),
    })
}

//! Error types for brandhub-web
//!
//! Every lifecycle error surfaces to the caller with its message; the HTTP
//! status follows the error kind.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use brandhub_common::Error;
use serde_json::json;
use thiserror::Error;

use crate::services::PaidFeature;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// No usable caller identity (401)
    #[error("Authentication required: {0}")]
    Unauthenticated(String),

    /// Paid feature requested without an active subscription (402)
    #[error("Upgrade to Pro to use the {0}")]
    UpgradeRequired(PaidFeature),

    /// Request could not be read (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// brandhub-common error
    #[error(transparent)]
    Common(#[from] Error),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Unauthenticated(_) => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            ApiError::UpgradeRequired(_) => (StatusCode::PAYMENT_REQUIRED, "UPGRADE_REQUIRED"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Common(err) => match err {
                Error::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                Error::Authorization(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
                Error::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                Error::Storage(_) => (StatusCode::BAD_GATEWAY, "STORAGE_ERROR"),
                Error::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
                Error::Config(_) => (StatusCode::SERVICE_UNAVAILABLE, "CONFIG_ERROR"),
                Error::RemoteService(_) => (StatusCode::BAD_GATEWAY, "ANALYSIS_ERROR"),
                Error::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let mut body = json!({
            "error": {
                "code": error_code,
                "message": self.to_string(),
            }
        });

        if let ApiError::UpgradeRequired(feature) = &self {
            body["feature"] = json!(feature.display_name());
            body["pricing_url"] = json!("/api/pricing");
        }

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

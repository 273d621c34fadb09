//! Caller identity middleware
//!
//! Sign-in is handled by the identity provider in front of this service.
//! The provider forwards the verified user id in the `x-user-id` header;
//! requests without a valid id are rejected with 401.

use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

/// Header carrying the authenticated user id
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller, inserted into request extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerId(pub Uuid);

/// Read the caller id from request headers
pub fn caller_from_headers(headers: &HeaderMap) -> ApiResult<CallerId> {
    let value = headers
        .get(USER_ID_HEADER)
        .ok_or_else(|| ApiError::Unauthenticated(format!("missing {} header", USER_ID_HEADER)))?;
    let value = value
        .to_str()
        .map_err(|_| ApiError::Unauthenticated(format!("unreadable {} header", USER_ID_HEADER)))?;
    let id = Uuid::parse_str(value.trim())
        .map_err(|_| ApiError::Unauthenticated(format!("invalid {} header", USER_ID_HEADER)))?;
    Ok(CallerId(id))
}

/// Authentication middleware
///
/// Applied to every route except health, build info, pricing and public
/// logos.
pub async fn require_caller(mut request: Request, next: Next) -> ApiResult<Response> {
    let caller = caller_from_headers(request.headers())?;
    request.extensions_mut().insert(caller);
    Ok(next.run(request).await)
}

//! Caller identity extraction.
//!
//! Authentication is owned by an upstream gateway; by the time a request
//! reaches this service the caller has been authenticated and their user id
//! is forwarded in the `x-user-id` header. The extractor only validates
//! that the header is present and numeric.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use promptmart_core::types::DbId;

use crate::error::AppError;

/// Header carrying the authenticated caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller, extracted from the `x-user-id` header.
///
/// Handlers that take `Identity` reject unauthenticated requests with 401.
#[derive(Debug, Clone, Copy)]
pub struct Identity {
    pub user_id: DbId,
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| AppError::Unauthorized(format!("missing {USER_ID_HEADER} header")))?;

        let user_id: DbId = header
            .to_str()
            .ok()
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| {
                AppError::Unauthorized(format!("{USER_ID_HEADER} must be a numeric user id"))
            })?;

        Ok(Identity { user_id })
    }
}

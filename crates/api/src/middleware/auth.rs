//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use marro_core::error::CoreError;
use marro_core::types::OwnerId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated agency user extracted from a JWT Bearer token in the
/// `Authorization` header.
///
/// Every owner-scoped handler takes this extractor and passes
/// [`AuthUser::owner_id`] down to the repositories.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    /// The user's id (from `claims.sub`).
    pub owner_id: OwnerId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.auth).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            owner_id: claims.sub,
        })
    }
}

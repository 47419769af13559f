//! Bearer token authentication

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::{debug, warn};

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::user::User;

/// Extractor that requires a valid session token
///
/// Reads `Authorization: Bearer <token>`, verifies signature and expiry,
/// then resolves the subject to a stored user.
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;

        let claims = state.token_issuer.verify(token).map_err(|_| {
            warn!("Rejected invalid or expired token");
            ApiError::unauthorized("invalid or expired token")
        })?;

        let user = state
            .user_service
            .get(claims.user_id())
            .await?
            .ok_or_else(|| {
                warn!(user_id = %claims.user_id(), "Token subject no longer exists");
                ApiError::unauthorized("invalid or expired token")
            })?;

        debug!(user_id = %user.id(), "Authenticated request");

        Ok(RequireUser(user))
    }
}

/// Extract the token from an `Authorization: Bearer` header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let missing = || ApiError::unauthorized("missing bearer token");

    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(missing)?
        .to_str()
        .map_err(|_| ApiError::unauthorized("invalid authorization header"))?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(missing)?;

    Ok(token)
}

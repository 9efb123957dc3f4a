use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;

use super::cookies::AUTH_COOKIE;
use super::jwt::JwtKeys;
use super::repo::User;

/// Resolves the request's credential to a full user row.
///
/// The token is read from the auth cookie first, then from a bearer
/// Authorization header. The subject id is re-checked against the users
/// table so a still-valid token for a deleted account is rejected.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let cookie_token = jar.get(AUTH_COOKIE).map(|c| c.value().to_string());
        let bearer_token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|v| v.to_string());

        let token = cookie_token.or(bearer_token).ok_or_else(|| {
            ApiError::Unauthorized("You are not logged in! Please log in to get access.".into())
        })?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(&token).map_err(|e| {
            warn!(error = %e, "invalid or expired token");
            ApiError::Unauthorized("Invalid or expired token".into())
        })?;

        let user = User::find_by_id(&state.db, claims.sub)
            .await?
            .ok_or_else(|| {
                warn!(user_id = claims.sub, "token for missing user");
                ApiError::Unauthorized(
                    "The user belonging to this token no longer exists.".into(),
                )
            })?;

        Ok(AuthUser(user))
    }
}

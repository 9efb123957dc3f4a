use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument, warn};

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

use super::cookies::{auth_cookie, clear_cookie};
use super::dto::{validate_login, validate_signup, LoginRequest, SignupRequest, UserSummary};
use super::extract::AuthUser;
use super::jwt::JwtKeys;
use super::password::{hash_password, verify_password};
use super::repo::User;

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, CookieJar, Json<ApiResponse<UserSummary>>), ApiError> {
    let errors = validate_signup(&payload);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    if User::exists(&state.db, &payload.username, &payload.email).await? {
        warn!(email = %payload.email, "signup for existing user");
        return Err(ApiError::Conflict("User already exists".into()));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, &payload.username, &payload.email, &hash).await?;

    let token = JwtKeys::from_ref(&state).sign(user.id)?;
    let jar = jar.add(auth_cookie(&state.config.cookie, token));

    info!(user_id = user.id, username = %user.username, "user signed up");
    Ok((
        StatusCode::CREATED,
        jar,
        Json(ApiResponse::data(user.into())),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<UserSummary>>), ApiError> {
    let errors = validate_login(&payload);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    // Unknown email and wrong password answer identically so the endpoint
    // cannot be used to enumerate accounts.
    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login unknown email");
            ApiError::Unauthorized("Invalid email or password".into())
        })?;

    let ok = verify_password(&payload.password, &user.password_hash)?;
    if !ok {
        warn!(user_id = user.id, "login invalid password");
        return Err(ApiError::Unauthorized("Invalid email or password".into()));
    }

    let token = JwtKeys::from_ref(&state).sign(user.id)?;
    let jar = jar.add(auth_cookie(&state.config.cookie, token));

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok((jar, Json(ApiResponse::data(user.into()))))
}

/// Clears the cookie only; the token itself stays valid until expiry.
#[instrument(skip(state))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<ApiResponse<()>>) {
    let jar = jar.add(clear_cookie(&state.config.cookie));
    (jar, Json(ApiResponse::message("Logged out successfully")))
}

#[instrument(skip_all)]
pub async fn me(AuthUser(user): AuthUser) -> Json<ApiResponse<UserSummary>> {
    Json(ApiResponse::data(user.into()))
}

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::{info, instrument, warn};

use crate::auth::extract::AuthUser;
use crate::db::Lifecycle;
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

use super::dto::CategoryRequest;
use super::repo::{self, Category};

#[instrument(skip(state, user), fields(user_id = user.0.id))]
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<Category>>>, ApiError> {
    let categories = repo::list_active(&state.db, user.0.id).await?;
    Ok(Json(ApiResponse::list(categories)))
}

#[instrument(skip(state, user), fields(user_id = user.0.id))]
pub async fn list_archived(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<Category>>>, ApiError> {
    let categories = repo::list_archived(&state.db, user.0.id).await?;
    Ok(Json(ApiResponse::list(categories)))
}

#[instrument(skip(state, user), fields(user_id = user.0.id))]
pub async fn get_one(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Category>>, ApiError> {
    let category = repo::find(&state.db, user.0.id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".into()))?;
    Ok(Json(ApiResponse::data(category)))
}

#[instrument(skip(state, user, payload), fields(user_id = user.0.id))]
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Category>>), ApiError> {
    let name = payload.validate().map_err(ApiError::Validation)?;

    if repo::name_in_use(&state.db, user.0.id, &name, None).await? {
        return Err(ApiError::Conflict(
            "Category with this name already exists".into(),
        ));
    }

    let category = repo::insert(&state.db, user.0.id, &name).await?;
    info!(category_id = category.id, "category created");
    Ok((StatusCode::CREATED, Json(ApiResponse::data(category))))
}

#[instrument(skip(state, user, payload), fields(user_id = user.0.id))]
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryRequest>,
) -> Result<Json<ApiResponse<Category>>, ApiError> {
    let name = payload.validate().map_err(ApiError::Validation)?;

    // An archived category is indistinguishable from a missing one here;
    // the client only ever sees the 404.
    repo::find_in(&state.db, user.0.id, id, Lifecycle::Active)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found or is archived".into()))?;

    if repo::name_in_use(&state.db, user.0.id, &name, Some(id)).await? {
        return Err(ApiError::Conflict(
            "Category with this name already exists".into(),
        ));
    }

    let category = repo::rename(&state.db, user.0.id, id, &name).await?;
    Ok(Json(ApiResponse::data(category)))
}

#[instrument(skip(state, user), fields(user_id = user.0.id))]
pub async fn archive(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    repo::find_in(&state.db, user.0.id, id, Lifecycle::Active)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found or already archived".into()))?;

    let in_use = repo::active_note_count(&state.db, id).await?;
    if in_use > 0 {
        warn!(category_id = id, in_use, "archive refused, category in use");
        return Err(ApiError::Conflict(format!(
            "Cannot delete category. It is being used by {in_use} active note(s)."
        )));
    }

    repo::archive(&state.db, user.0.id, id).await?;
    info!(category_id = id, "category archived");
    Ok(Json(ApiResponse::message("Category archived successfully")))
}

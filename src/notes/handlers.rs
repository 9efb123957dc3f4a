use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use sqlx::SqlitePool;
use tracing::{info, instrument};

use crate::auth::extract::AuthUser;
use crate::db::Lifecycle;
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

use super::dto::{BookmarkState, NoteRequest, NoteWithCategories, PinState};
use super::repo::{self, Note};

async fn annotate(db: &SqlitePool, note: Note) -> Result<NoteWithCategories, sqlx::Error> {
    let categories = repo::categories_for(db, note.id).await?;
    Ok(NoteWithCategories { note, categories })
}

async fn annotate_all(
    db: &SqlitePool,
    notes: Vec<Note>,
) -> Result<Vec<NoteWithCategories>, sqlx::Error> {
    let mut annotated = Vec::with_capacity(notes.len());
    for note in notes {
        annotated.push(annotate(db, note).await?);
    }
    Ok(annotated)
}

#[instrument(skip(state, user, payload), fields(user_id = user.0.id))]
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<NoteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<NoteWithCategories>>), ApiError> {
    let errors = payload.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let note_id = repo::create(
        &state.db,
        user.0.id,
        &payload.title,
        payload.content.as_deref(),
        payload.color(),
        payload.category_ids(),
    )
    .await?;

    let note = repo::find(&state.db, user.0.id, note_id, Lifecycle::Active)
        .await?
        .ok_or_else(|| ApiError::NotFound("Note not found".into()))?;
    let annotated = annotate(&state.db, note).await?;

    info!(note_id, "note created");
    Ok((StatusCode::CREATED, Json(ApiResponse::data(annotated))))
}

#[instrument(skip(state, user), fields(user_id = user.0.id))]
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<NoteWithCategories>>>, ApiError> {
    let notes = repo::list_active(&state.db, user.0.id).await?;
    let annotated = annotate_all(&state.db, notes).await?;
    Ok(Json(ApiResponse::list(annotated)))
}

#[instrument(skip(state, user), fields(user_id = user.0.id))]
pub async fn list_bookmarked(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<NoteWithCategories>>>, ApiError> {
    let notes = repo::list_bookmarked(&state.db, user.0.id).await?;
    let annotated = annotate_all(&state.db, notes).await?;
    Ok(Json(ApiResponse::list(annotated)))
}

#[instrument(skip(state, user), fields(user_id = user.0.id))]
pub async fn list_archived(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<NoteWithCategories>>>, ApiError> {
    let notes = repo::list_archived(&state.db, user.0.id).await?;
    let annotated = annotate_all(&state.db, notes).await?;
    Ok(Json(ApiResponse::list(annotated)))
}

/// Active lookup first, then archived, so the trash view can open a note.
#[instrument(skip(state, user), fields(user_id = user.0.id))]
pub async fn get_one(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<NoteWithCategories>>, ApiError> {
    let note = match repo::find(&state.db, user.0.id, id, Lifecycle::Active).await? {
        Some(note) => note,
        None => repo::find(&state.db, user.0.id, id, Lifecycle::Archived)
            .await?
            .ok_or_else(|| ApiError::NotFound("Note not found".into()))?,
    };
    let annotated = annotate(&state.db, note).await?;
    Ok(Json(ApiResponse::data(annotated)))
}

#[instrument(skip(state, user, payload), fields(user_id = user.0.id))]
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<NoteRequest>,
) -> Result<Json<ApiResponse<NoteWithCategories>>, ApiError> {
    let errors = payload.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let updated = repo::update(
        &state.db,
        user.0.id,
        id,
        &payload.title,
        payload.content.as_deref(),
        payload.color(),
        payload.category_ids(),
    )
    .await?;
    if !updated {
        return Err(ApiError::NotFound("Note not found or is archived".into()));
    }

    let note = repo::find(&state.db, user.0.id, id, Lifecycle::Active)
        .await?
        .ok_or_else(|| ApiError::NotFound("Note not found".into()))?;
    let annotated = annotate(&state.db, note).await?;
    Ok(Json(ApiResponse::data(annotated)))
}

#[instrument(skip(state, user), fields(user_id = user.0.id))]
pub async fn toggle_pin(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<PinState>>, ApiError> {
    let note = repo::find(&state.db, user.0.id, id, Lifecycle::Active)
        .await?
        .ok_or_else(|| ApiError::NotFound("Note not found".into()))?;

    let pinned = !note.pinned;
    repo::set_pinned(&state.db, user.0.id, id, pinned).await?;

    let message = if pinned {
        "Note pinned successfully"
    } else {
        "Note unpinned successfully"
    };
    Ok(Json(ApiResponse::data_with_message(
        PinState { pinned },
        message,
    )))
}

#[instrument(skip(state, user), fields(user_id = user.0.id))]
pub async fn toggle_bookmark(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<BookmarkState>>, ApiError> {
    let note = repo::find(&state.db, user.0.id, id, Lifecycle::Active)
        .await?
        .ok_or_else(|| ApiError::NotFound("Note not found".into()))?;

    let bookmarked = !note.bookmarked;
    repo::set_bookmarked(&state.db, user.0.id, id, bookmarked).await?;

    let message = if bookmarked {
        "Note bookmarked successfully"
    } else {
        "Note removed from bookmarks"
    };
    Ok(Json(ApiResponse::data_with_message(
        BookmarkState { bookmarked },
        message,
    )))
}

#[instrument(skip(state, user), fields(user_id = user.0.id))]
pub async fn archive(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let affected = repo::archive(&state.db, user.0.id, id).await?;
    if affected == 0 {
        return Err(ApiError::NotFound(
            "Note not found or already archived".into(),
        ));
    }
    info!(note_id = id, "note archived");
    Ok(Json(ApiResponse::message("Note archived successfully")))
}

#[instrument(skip(state, user), fields(user_id = user.0.id))]
pub async fn unarchive(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<NoteWithCategories>>, ApiError> {
    let affected = repo::restore(&state.db, user.0.id, id).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Archived note not found".into()));
    }

    let note = repo::find(&state.db, user.0.id, id, Lifecycle::Active)
        .await?
        .ok_or_else(|| ApiError::NotFound("Note not found".into()))?;
    let annotated = annotate(&state.db, note).await?;

    info!(note_id = id, "note restored from archive");
    Ok(Json(ApiResponse::data_with_message(
        annotated,
        "Note unarchived successfully",
    )))
}

/// Purge is only reachable from the archived state; an active note must be
/// archived first.
#[instrument(skip(state, user), fields(user_id = user.0.id))]
pub async fn purge(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let purged = repo::purge(&state.db, user.0.id, id).await?;
    if !purged {
        return Err(ApiError::NotFound("Archived note not found".into()));
    }
    info!(note_id = id, "note permanently deleted");
    Ok(Json(ApiResponse::message("Note permanently deleted")))
}

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Sqlite, SqlitePool, Transaction};

use crate::db::{now_utc, Lifecycle};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: Option<String>,
    pub user_id: i64,
    pub background_color: String,
    pub pinned: bool,
    pub bookmarked: bool,
    pub is_deleted: bool,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

/// Category as attached to a note in responses: id and name only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CategoryRef {
    pub id: i64,
    pub name: String,
}

pub async fn find(
    db: &SqlitePool,
    user_id: i64,
    note_id: i64,
    lifecycle: Lifecycle,
) -> Result<Option<Note>, sqlx::Error> {
    sqlx::query_as::<_, Note>(
        r#"
        SELECT id, title, content, user_id, background_color, pinned, bookmarked,
               is_deleted, created_at, updated_at, deleted_at
        FROM notes
        WHERE id = ? AND user_id = ? AND is_deleted = ?
        "#,
    )
    .bind(note_id)
    .bind(user_id)
    .bind(lifecycle.flag())
    .fetch_optional(db)
    .await
}

/// Active notes, pinned first, then most recently updated. The client
/// partitions pinned/unpinned itself and depends on this exact order.
pub async fn list_active(db: &SqlitePool, user_id: i64) -> Result<Vec<Note>, sqlx::Error> {
    sqlx::query_as::<_, Note>(
        r#"
        SELECT id, title, content, user_id, background_color, pinned, bookmarked,
               is_deleted, created_at, updated_at, deleted_at
        FROM notes
        WHERE user_id = ? AND is_deleted = 0
        ORDER BY pinned DESC, updated_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn list_bookmarked(db: &SqlitePool, user_id: i64) -> Result<Vec<Note>, sqlx::Error> {
    sqlx::query_as::<_, Note>(
        r#"
        SELECT id, title, content, user_id, background_color, pinned, bookmarked,
               is_deleted, created_at, updated_at, deleted_at
        FROM notes
        WHERE user_id = ? AND is_deleted = 0 AND bookmarked = 1
        ORDER BY updated_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn list_archived(db: &SqlitePool, user_id: i64) -> Result<Vec<Note>, sqlx::Error> {
    sqlx::query_as::<_, Note>(
        r#"
        SELECT id, title, content, user_id, background_color, pinned, bookmarked,
               is_deleted, created_at, updated_at, deleted_at
        FROM notes
        WHERE user_id = ? AND is_deleted = 1
        ORDER BY deleted_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn categories_for(
    db: &SqlitePool,
    note_id: i64,
) -> Result<Vec<CategoryRef>, sqlx::Error> {
    sqlx::query_as::<_, CategoryRef>(
        r#"
        SELECT c.id, c.name
        FROM note_categories nc
        JOIN categories c ON nc.category_id = c.id
        WHERE nc.note_id = ?
        "#,
    )
    .bind(note_id)
    .fetch_all(db)
    .await
}

/// Inserts the note row and its category links in one transaction.
/// Returns the new note id.
pub async fn create(
    db: &SqlitePool,
    user_id: i64,
    title: &str,
    content: Option<&str>,
    background_color: &str,
    category_ids: &[i64],
) -> Result<i64, sqlx::Error> {
    let mut tx = db.begin().await?;
    let now = now_utc();

    let result = sqlx::query(
        r#"
        INSERT INTO notes (title, content, user_id, background_color, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(user_id)
    .bind(background_color)
    .bind(&now)
    .bind(&now)
    .execute(&mut *tx)
    .await?;

    let note_id = result.last_insert_rowid();
    insert_links(&mut tx, note_id, category_ids).await?;

    tx.commit().await?;
    Ok(note_id)
}

/// Updates title/content/color and replaces the full category link set
/// (delete-all then insert-current), all in one transaction. Returns false
/// when no active note matched.
pub async fn update(
    db: &SqlitePool,
    user_id: i64,
    note_id: i64,
    title: &str,
    content: Option<&str>,
    background_color: &str,
    category_ids: &[i64],
) -> Result<bool, sqlx::Error> {
    let mut tx = db.begin().await?;

    let existing: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM notes WHERE id = ? AND user_id = ? AND is_deleted = 0")
            .bind(note_id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
    if existing.is_none() {
        return Ok(false);
    }

    sqlx::query(
        r#"
        UPDATE notes SET title = ?, content = ?, background_color = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(background_color)
    .bind(now_utc())
    .bind(note_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM note_categories WHERE note_id = ?")
        .bind(note_id)
        .execute(&mut *tx)
        .await?;
    insert_links(&mut tx, note_id, category_ids).await?;

    tx.commit().await?;
    Ok(true)
}

async fn insert_links(
    tx: &mut Transaction<'_, Sqlite>,
    note_id: i64,
    category_ids: &[i64],
) -> Result<(), sqlx::Error> {
    for category_id in category_ids {
        sqlx::query("INSERT INTO note_categories (note_id, category_id) VALUES (?, ?)")
            .bind(note_id)
            .bind(category_id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

pub async fn set_pinned(
    db: &SqlitePool,
    user_id: i64,
    note_id: i64,
    pinned: bool,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE notes SET pinned = ?, updated_at = ? WHERE id = ? AND user_id = ?")
        .bind(pinned)
        .bind(now_utc())
        .bind(note_id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn set_bookmarked(
    db: &SqlitePool,
    user_id: i64,
    note_id: i64,
    bookmarked: bool,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE notes SET bookmarked = ?, updated_at = ? WHERE id = ? AND user_id = ?")
        .bind(bookmarked)
        .bind(now_utc())
        .bind(note_id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(())
}

/// Active -> Archived. Returns affected row count; zero means the note is
/// absent, foreign, or already archived.
pub async fn archive(db: &SqlitePool, user_id: i64, note_id: i64) -> Result<u64, sqlx::Error> {
    let now = now_utc();
    let result = sqlx::query(
        r#"
        UPDATE notes SET is_deleted = 1, deleted_at = ?, updated_at = ?
        WHERE id = ? AND user_id = ? AND is_deleted = 0
        "#,
    )
    .bind(&now)
    .bind(&now)
    .bind(note_id)
    .bind(user_id)
    .execute(db)
    .await?;
    Ok(result.rows_affected())
}

/// Archived -> Active. Clears both soft-delete fields together; the bumped
/// `updated_at` puts the restored note back at the top of the active list.
pub async fn restore(db: &SqlitePool, user_id: i64, note_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE notes SET is_deleted = 0, deleted_at = NULL, updated_at = ?
        WHERE id = ? AND user_id = ? AND is_deleted = 1
        "#,
    )
    .bind(now_utc())
    .bind(note_id)
    .bind(user_id)
    .execute(db)
    .await?;
    Ok(result.rows_affected())
}

/// Archived -> Purged. Removes the category links and the note row in one
/// transaction. Returns false when no archived note matched.
pub async fn purge(db: &SqlitePool, user_id: i64, note_id: i64) -> Result<bool, sqlx::Error> {
    let mut tx = db.begin().await?;

    let existing: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM notes WHERE id = ? AND user_id = ? AND is_deleted = 1")
            .bind(note_id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
    if existing.is_none() {
        return Ok(false);
    }

    sqlx::query("DELETE FROM note_categories WHERE note_id = ?")
        .bind(note_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM notes WHERE id = ? AND user_id = ? AND is_deleted = 1")
        .bind(note_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(true)
}

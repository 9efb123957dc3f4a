use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use crate::db::{now_utc, Lifecycle};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub user_id: i64,
    pub is_deleted: bool,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

/// Active categories, newest first.
pub async fn list_active(db: &SqlitePool, user_id: i64) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        r#"
        SELECT id, name, user_id, is_deleted, created_at, updated_at, deleted_at
        FROM categories
        WHERE user_id = ? AND is_deleted = 0
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

/// Archived categories, most recently archived first.
pub async fn list_archived(db: &SqlitePool, user_id: i64) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        r#"
        SELECT id, name, user_id, is_deleted, created_at, updated_at, deleted_at
        FROM categories
        WHERE user_id = ? AND is_deleted = 1
        ORDER BY deleted_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

/// Lookup regardless of lifecycle; used by the single-category read.
pub async fn find(
    db: &SqlitePool,
    user_id: i64,
    category_id: i64,
) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        r#"
        SELECT id, name, user_id, is_deleted, created_at, updated_at, deleted_at
        FROM categories
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(category_id)
    .bind(user_id)
    .fetch_optional(db)
    .await
}

pub async fn find_in(
    db: &SqlitePool,
    user_id: i64,
    category_id: i64,
    lifecycle: Lifecycle,
) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        r#"
        SELECT id, name, user_id, is_deleted, created_at, updated_at, deleted_at
        FROM categories
        WHERE id = ? AND user_id = ? AND is_deleted = ?
        "#,
    )
    .bind(category_id)
    .bind(user_id)
    .bind(lifecycle.flag())
    .fetch_optional(db)
    .await
}

/// True if the user already has an active category with this name.
/// `exclude_id` skips the row being renamed.
pub async fn name_in_use(
    db: &SqlitePool,
    user_id: i64,
    name: &str,
    exclude_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    let row: Option<(i64,)> = match exclude_id {
        Some(id) => {
            sqlx::query_as(
                r#"
                SELECT id FROM categories
                WHERE name = ? AND user_id = ? AND id != ? AND is_deleted = 0
                "#,
            )
            .bind(name)
            .bind(user_id)
            .bind(id)
            .fetch_optional(db)
            .await?
        }
        None => {
            sqlx::query_as(
                "SELECT id FROM categories WHERE name = ? AND user_id = ? AND is_deleted = 0",
            )
            .bind(name)
            .bind(user_id)
            .fetch_optional(db)
            .await?
        }
    };
    Ok(row.is_some())
}

pub async fn insert(db: &SqlitePool, user_id: i64, name: &str) -> Result<Category, sqlx::Error> {
    let now = now_utc();
    sqlx::query_as::<_, Category>(
        r#"
        INSERT INTO categories (name, user_id, created_at, updated_at)
        VALUES (?, ?, ?, ?)
        RETURNING id, name, user_id, is_deleted, created_at, updated_at, deleted_at
        "#,
    )
    .bind(name)
    .bind(user_id)
    .bind(&now)
    .bind(&now)
    .fetch_one(db)
    .await
}

pub async fn rename(
    db: &SqlitePool,
    user_id: i64,
    category_id: i64,
    name: &str,
) -> Result<Category, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        r#"
        UPDATE categories SET name = ?, updated_at = ?
        WHERE id = ? AND user_id = ?
        RETURNING id, name, user_id, is_deleted, created_at, updated_at, deleted_at
        "#,
    )
    .bind(name)
    .bind(now_utc())
    .bind(category_id)
    .bind(user_id)
    .fetch_one(db)
    .await
}

/// Count of non-archived notes still linked to the category. Archiving is
/// refused while this is non-zero.
pub async fn active_note_count(db: &SqlitePool, category_id: i64) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM note_categories nc
        JOIN notes n ON nc.note_id = n.id
        WHERE nc.category_id = ? AND n.is_deleted = 0
        "#,
    )
    .bind(category_id)
    .fetch_one(db)
    .await?;
    Ok(count)
}

pub async fn archive(
    db: &SqlitePool,
    user_id: i64,
    category_id: i64,
) -> Result<u64, sqlx::Error> {
    let now = now_utc();
    let result = sqlx::query(
        r#"
        UPDATE categories SET is_deleted = 1, deleted_at = ?, updated_at = ?
        WHERE id = ? AND user_id = ? AND is_deleted = 0
        "#,
    )
    .bind(&now)
    .bind(&now)
    .bind(category_id)
    .bind(user_id)
    .execute(db)
    .await?;
    Ok(result.rows_affected())
}

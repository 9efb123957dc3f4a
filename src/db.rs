use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use chrono::{SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

/// Connect to the SQLite database, creating the file (and its parent
/// directory) if needed, then run pending migrations.
pub async fn init_pool(database_url: &str) -> anyhow::Result<SqlitePool> {
    if let Some(path) = database_url.strip_prefix("sqlite:") {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent).ok();
        }
    }

    let options = SqliteConnectOptions::from_str(database_url)
        .context("invalid database URL")?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .context("connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("run migrations")?;

    Ok(pool)
}

/// Soft-delete state a row is in. Every note/category query is scoped to
/// exactly one of these; "archived" rows are invisible to active queries
/// and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Active,
    Archived,
}

impl Lifecycle {
    /// Value of the `is_deleted` column for rows in this state.
    pub fn flag(self) -> bool {
        matches!(self, Lifecycle::Archived)
    }
}

/// Current UTC time as an RFC 3339 string with fixed microsecond precision.
///
/// Timestamps are stored as TEXT; the fixed width keeps lexicographic
/// order identical to chronological order for the ORDER BY clauses.
pub fn now_utc() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

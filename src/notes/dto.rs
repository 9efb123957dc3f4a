use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::FieldError;

use super::repo::{CategoryRef, Note};

pub const DEFAULT_COLOR: &str = "#ffffff";

/// Body shared by note create and update.
#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub categories: Option<Vec<i64>>,
    #[serde(default)]
    pub background_color: Option<String>,
}

/// Note annotated with its linked categories, as every read returns it.
#[derive(Debug, Serialize)]
pub struct NoteWithCategories {
    #[serde(flatten)]
    pub note: Note,
    pub categories: Vec<CategoryRef>,
}

#[derive(Debug, Serialize)]
pub struct PinState {
    pub pinned: bool,
}

#[derive(Debug, Serialize)]
pub struct BookmarkState {
    pub bookmarked: bool,
}

lazy_static! {
    static ref HEX_COLOR_RE: Regex =
        Regex::new(r"^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$").expect("valid regex");
}

impl NoteRequest {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push(FieldError::new("title", "Title is required"));
        }
        if let Some(color) = self.background_color.as_deref() {
            if !color.is_empty() && !HEX_COLOR_RE.is_match(color) {
                errors.push(FieldError::new(
                    "background_color",
                    "Background color must be a valid hex color",
                ));
            }
        }
        errors
    }

    /// Requested color, falling back to white when absent or empty.
    pub fn color(&self) -> &str {
        match self.background_color.as_deref() {
            Some("") | None => DEFAULT_COLOR,
            Some(color) => color,
        }
    }

    pub fn category_ids(&self) -> &[i64] {
        self.categories.as_deref().unwrap_or(&[])
    }
}

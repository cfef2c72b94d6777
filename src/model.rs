//! Book record and the payload types that flow between handlers and storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// One persisted book.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub description: String,
    pub genre: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fully populated fields for an insert or a full replace. Built by the validator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub description: String,
    pub genre: String,
}

impl NewBook {
    /// Every field set, so applying it replaces the whole record.
    pub fn into_changes(self) -> BookChanges {
        BookChanges {
            title: Some(self.title),
            author: Some(self.author),
            description: Some(self.description),
            genre: Some(self.genre),
        }
    }
}

/// Per-field changes; `None` keeps the stored value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BookChanges {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
}

impl BookChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.description.is_none() && self.genre.is_none()
    }

    /// Apply onto a stored record and bump `updated_at`.
    pub fn apply(&self, book: &mut Book, now: DateTime<Utc>) {
        if let Some(ref t) = self.title {
            book.title = t.clone();
        }
        if let Some(ref a) = self.author {
            book.author = a.clone();
        }
        if let Some(ref d) = self.description {
            book.description = d.clone();
        }
        if let Some(ref g) = self.genre {
            book.genre = g.clone();
        }
        book.updated_at = now;
    }
}

/// Equality constraints for list and update-by-filter. Supplied fields are ANDed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct BookFilter {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
}

impl BookFilter {
    pub fn by_title(title: impl Into<String>) -> Self {
        BookFilter {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn matches(&self, book: &Book) -> bool {
        self.title.as_ref().map_or(true, |t| *t == book.title)
            && self.author.as_ref().map_or(true, |a| *a == book.author)
            && self.genre.as_ref().map_or(true, |g| *g == book.genre)
    }

    /// Column/value pairs for the constraints that are set.
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        let mut out = Vec::new();
        if let Some(ref t) = self.title {
            out.push(("title", t.as_str()));
        }
        if let Some(ref a) = self.author {
            out.push(("author", a.as_str()));
        }
        if let Some(ref g) = self.genre {
            out.push(("genre", g.as_str()));
        }
        out
    }
}

/// Parse a path segment as a book id. Malformed input is distinct from not-found.
pub fn parse_id(id_str: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id_str.trim())
        .map_err(|_| AppError::MalformedInput(format!("invalid book id: {}", id_str)))
}

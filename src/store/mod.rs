//! Storage seam for the book collection. Handlers only see `dyn BookStore`.

mod memory;
mod postgres;

pub use memory::MemoryBookStore;
pub use postgres::{ensure_database_exists, PgBookStore};

use crate::error::AppError;
use crate::model::{Book, BookChanges, BookFilter, NewBook};
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait BookStore: Send + Sync {
    /// Insert a record. Empty title is a validation error; a duplicate title is a conflict
    /// when the store enforces uniqueness.
    async fn create(&self, book: NewBook) -> Result<Book, AppError>;

    /// All records matching the filter, in insertion order. Empty is not an error.
    async fn find_all(&self, filter: &BookFilter) -> Result<Vec<Book>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Book>, AppError>;

    /// Merge `changes` into the record; returns the post-update record.
    async fn update_by_id(&self, id: Uuid, changes: &BookChanges) -> Result<Option<Book>, AppError>;

    /// Like `update_by_id` but for the first record matching the filter.
    async fn update_by_filter(&self, filter: &BookFilter, changes: &BookChanges) -> Result<Option<Book>, AppError>;

    /// Returns the removed record.
    async fn delete_by_id(&self, id: Uuid) -> Result<Option<Book>, AppError>;

    /// Returns how many records were removed.
    async fn delete_all(&self) -> Result<u64, AppError>;

    /// Cheap liveness probe for readiness checks.
    async fn ping(&self) -> Result<(), AppError>;
}

fn require_title(title: &str) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::Validation("title is required".into()));
    }
    Ok(())
}

fn duplicate_title(title: &str) -> AppError {
    AppError::Conflict(format!("a book with title '{}' already exists", title))
}

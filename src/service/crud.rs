//! Book operations: validate against the policy, call the store, turn misses into `NotFound`.

use crate::config::ValidationPolicy;
use crate::error::AppError;
use crate::model::{Book, BookFilter};
use crate::service::RequestValidator;
use crate::store::BookStore;
use serde_json::{Map, Value};
use uuid::Uuid;

pub struct BookService<'a> {
    store: &'a dyn BookStore,
    policy: &'a ValidationPolicy,
}

impl<'a> BookService<'a> {
    pub fn new(store: &'a dyn BookStore, policy: &'a ValidationPolicy) -> Self {
        BookService { store, policy }
    }

    pub async fn list(&self, filter: &BookFilter) -> Result<Vec<Book>, AppError> {
        self.store.find_all(filter).await
    }

    pub async fn read(&self, id: Uuid) -> Result<Book, AppError> {
        self.store.find_by_id(id).await?.ok_or_else(|| not_found_id(id))
    }

    pub async fn create(&self, body: &Map<String, Value>) -> Result<Book, AppError> {
        let book = RequestValidator::validate_full(body, self.policy)?;
        let created = self.store.create(book).await?;
        tracing::info!(id = %created.id, title = %created.title, "book created");
        Ok(created)
    }

    /// Full replace. A missing id is reported before the body is validated; the body must
    /// carry every field.
    pub async fn replace(&self, id: Uuid, body: &Map<String, Value>) -> Result<Book, AppError> {
        self.read(id).await?;
        let book = RequestValidator::validate_replace(body)?;
        self.store
            .update_by_id(id, &book.into_changes())
            .await?
            .ok_or_else(|| not_found_id(id))
    }

    /// Partial update of the first book with this title.
    pub async fn patch_by_title(&self, title: &str, body: &Map<String, Value>) -> Result<Book, AppError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("title is required".into()));
        }
        let changes = RequestValidator::validate_partial(body)?;
        self.store
            .update_by_filter(&BookFilter::by_title(title), &changes)
            .await?
            .ok_or_else(|| not_found_title(title))
    }

    /// `{title, newAuthor}`: set the author of the first book with this title.
    pub async fn change_author(&self, body: &Map<String, Value>) -> Result<Book, AppError> {
        let (title, author) = RequestValidator::validate_author_change(body)?;
        let changes = crate::model::BookChanges {
            author: Some(author),
            ..Default::default()
        };
        self.store
            .update_by_filter(&BookFilter::by_title(title.as_str()), &changes)
            .await?
            .ok_or_else(|| not_found_title(&title))
    }

    pub async fn delete(&self, id: Uuid) -> Result<Book, AppError> {
        let removed = self.store.delete_by_id(id).await?.ok_or_else(|| not_found_id(id))?;
        tracing::info!(id = %removed.id, "book deleted");
        Ok(removed)
    }

    pub async fn delete_all(&self) -> Result<u64, AppError> {
        let n = self.store.delete_all().await?;
        tracing::info!(count = n, "all books deleted");
        Ok(n)
    }
}

fn not_found_id(id: Uuid) -> AppError {
    AppError::NotFound(format!("Book with id: {} not found.", id))
}

fn not_found_title(title: &str) -> AppError {
    AppError::NotFound(format!("Book with title: {} not found.", title))
}

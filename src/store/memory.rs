//! Process-local book store. Insertion order is the vector order.

use super::{duplicate_title, require_title, BookStore};
use crate::error::AppError;
use crate::model::{Book, BookChanges, BookFilter, NewBook};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryBookStore {
    books: RwLock<Vec<Book>>,
    unique_titles: bool,
}

impl MemoryBookStore {
    pub fn new(unique_titles: bool) -> Self {
        MemoryBookStore {
            books: RwLock::new(Vec::new()),
            unique_titles,
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Book>>, AppError> {
        self.books
            .read()
            .map_err(|_| AppError::Storage("book store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Book>>, AppError> {
        self.books
            .write()
            .map_err(|_| AppError::Storage("book store lock poisoned".into()))
    }

    /// Conflict if another record (not `idx`) already has the title the changes would set.
    fn check_title_change(&self, books: &[Book], idx: usize, changes: &BookChanges) -> Result<(), AppError> {
        let Some(ref title) = changes.title else {
            return Ok(());
        };
        require_title(title)?;
        if self.unique_titles
            && books
                .iter()
                .enumerate()
                .any(|(i, b)| i != idx && b.title == *title)
        {
            return Err(duplicate_title(title));
        }
        Ok(())
    }

    fn update_at(&self, books: &mut [Book], idx: usize, changes: &BookChanges) -> Result<Book, AppError> {
        self.check_title_change(books, idx, changes)?;
        let book = &mut books[idx];
        changes.apply(book, Utc::now());
        Ok(book.clone())
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn create(&self, new: NewBook) -> Result<Book, AppError> {
        require_title(&new.title)?;
        let mut books = self.write()?;
        if self.unique_titles && books.iter().any(|b| b.title == new.title) {
            return Err(duplicate_title(&new.title));
        }
        let now = Utc::now();
        let book = Book {
            id: Uuid::new_v4(),
            title: new.title,
            author: new.author,
            description: new.description,
            genre: new.genre,
            created_at: now,
            updated_at: now,
        };
        books.push(book.clone());
        Ok(book)
    }

    async fn find_all(&self, filter: &BookFilter) -> Result<Vec<Book>, AppError> {
        let books = self.read()?;
        Ok(books.iter().filter(|b| filter.matches(b)).cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Book>, AppError> {
        let books = self.read()?;
        Ok(books.iter().find(|b| b.id == id).cloned())
    }

    async fn update_by_id(&self, id: Uuid, changes: &BookChanges) -> Result<Option<Book>, AppError> {
        let mut books = self.write()?;
        match books.iter().position(|b| b.id == id) {
            Some(idx) => self.update_at(&mut books, idx, changes).map(Some),
            None => Ok(None),
        }
    }

    async fn update_by_filter(&self, filter: &BookFilter, changes: &BookChanges) -> Result<Option<Book>, AppError> {
        let mut books = self.write()?;
        match books.iter().position(|b| filter.matches(b)) {
            Some(idx) => self.update_at(&mut books, idx, changes).map(Some),
            None => Ok(None),
        }
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<Option<Book>, AppError> {
        let mut books = self.write()?;
        Ok(books.iter().position(|b| b.id == id).map(|idx| books.remove(idx)))
    }

    async fn delete_all(&self) -> Result<u64, AppError> {
        let mut books = self.write()?;
        let n = books.len() as u64;
        books.clear();
        Ok(n)
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.read().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_book(title: &str, genre: &str) -> NewBook {
        NewBook {
            title: title.into(),
            author: "someone".into(),
            description: "something".into(),
            genre: genre.into(),
        }
    }

    #[tokio::test]
    async fn create_rejects_empty_title() {
        let store = MemoryBookStore::new(false);
        let err = store.create(new_book("  ", "x")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(store.find_all(&BookFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn uniqueness_is_configurable() {
        let strict = MemoryBookStore::new(true);
        strict.create(new_book("Dune", "sci-fi")).await.unwrap();
        let err = strict.create(new_book("Dune", "sci-fi")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let open = MemoryBookStore::new(false);
        open.create(new_book("Dune", "sci-fi")).await.unwrap();
        open.create(new_book("Dune", "sci-fi")).await.unwrap();
        assert_eq!(open.find_all(&BookFilter::default()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn renaming_onto_existing_title_conflicts() {
        let store = MemoryBookStore::new(true);
        store.create(new_book("A", "x")).await.unwrap();
        let b = store.create(new_book("B", "x")).await.unwrap();
        let changes = BookChanges {
            title: Some("A".into()),
            ..Default::default()
        };
        let err = store.update_by_id(b.id, &changes).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // Keeping its own title is not a conflict.
        let same = BookChanges {
            title: Some("B".into()),
            ..Default::default()
        };
        assert!(store.update_by_id(b.id, &same).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn update_by_filter_touches_first_match_only() {
        let store = MemoryBookStore::new(false);
        let first = store.create(new_book("Twin", "a")).await.unwrap();
        let second = store.create(new_book("Twin", "b")).await.unwrap();
        let changes = BookChanges {
            genre: Some("z".into()),
            ..Default::default()
        };
        let updated = store
            .update_by_filter(&BookFilter::by_title("Twin"), &changes)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, first.id);
        let untouched = store.find_by_id(second.id).await.unwrap().unwrap();
        assert_eq!(untouched.genre, "b");
    }

    #[tokio::test]
    async fn genre_filter_keeps_insertion_order() {
        let store = MemoryBookStore::new(false);
        store.create(new_book("1", "horror")).await.unwrap();
        store.create(new_book("2", "romance")).await.unwrap();
        store.create(new_book("3", "horror")).await.unwrap();
        let filter = BookFilter {
            genre: Some("horror".into()),
            ..Default::default()
        };
        let titles: Vec<String> = store
            .find_all(&filter)
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["1", "3"]);
    }

    #[tokio::test]
    async fn delete_by_id_then_all() {
        let store = MemoryBookStore::new(false);
        let a = store.create(new_book("a", "x")).await.unwrap();
        store.create(new_book("b", "x")).await.unwrap();
        assert!(store.delete_by_id(a.id).await.unwrap().is_some());
        assert!(store.delete_by_id(a.id).await.unwrap().is_none());
        assert!(store.find_by_id(a.id).await.unwrap().is_none());
        assert_eq!(store.delete_all().await.unwrap(), 1);
        assert_eq!(store.delete_all().await.unwrap(), 0);
    }
}

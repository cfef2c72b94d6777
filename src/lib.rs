//! Bookshelf API: CRUD REST service for book records.

pub mod authz;
pub mod config;
pub mod error;
pub mod extractors;
pub mod migration;
pub mod model;
pub mod response;
pub mod sql;
pub mod state;
pub mod store;
pub mod service;
pub mod handlers;
pub mod routes;

pub use authz::{authorize, Action, Decision, Principal};
pub use config::{AuthGate, Settings, StoreKind, ValidationPolicy};
pub use error::{AppError, ConfigError};
pub use migration::apply_migrations;
pub use model::{Book, BookChanges, BookFilter, NewBook};
pub use routes::{app, book_routes, common_routes};
pub use service::BookService;
pub use state::AppState;
pub use store::{ensure_database_exists, BookStore, MemoryBookStore, PgBookStore};

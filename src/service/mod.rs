//! BookService: policy-aware book operations on top of the store.

mod crud;
mod validation;
pub use crud::BookService;
pub use validation::RequestValidator;

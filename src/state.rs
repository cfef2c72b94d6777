//! Shared application state for all routes.

use crate::config::{AuthGate, ValidationPolicy};
use crate::store::BookStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BookStore>,
    pub policy: Arc<ValidationPolicy>,
    pub auth_gate: AuthGate,
}

impl AppState {
    pub fn new(store: Arc<dyn BookStore>, policy: ValidationPolicy, auth_gate: AuthGate) -> Self {
        AppState {
            store,
            policy: Arc::new(policy),
            auth_gate,
        }
    }
}

//! Authorization decision and the gate middleware in front of mutating book routes.
//!
//! The decision is transport-agnostic: callers build a [`Principal`] from whatever carries
//! the role claim and ask [`authorize`] about an [`Action`].

use crate::config::AuthGate;
use crate::error::AppError;
use crate::extractors::principal_from_headers;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};

pub const ADMIN_ROLE: &str = "admin";

/// The caller as seen by the gate: an optional role claim.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Principal {
    role: Option<String>,
}

impl Principal {
    pub fn new(role: Option<String>) -> Self {
        Principal { role }
    }

    pub fn anonymous() -> Self {
        Principal::default()
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(ADMIN_ROLE)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

impl Action {
    pub fn from_method(method: &Method) -> Self {
        match *method {
            Method::POST => Action::Create,
            Method::PUT | Method::PATCH => Action::Update,
            Method::DELETE => Action::Delete,
            _ => Action::Read,
        }
    }

    pub fn is_mutation(self) -> bool {
        !matches!(self, Action::Read)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// Reads are open; mutations need the admin role.
pub fn authorize(principal: &Principal, action: Action) -> Decision {
    if !action.is_mutation() || principal.is_admin() {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

/// Middleware: when the gate is active, reject mutating requests from non-admins before the handler runs.
pub async fn authorization_gate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if state.auth_gate == AuthGate::Open {
        return Ok(next.run(request).await);
    }
    let action = Action::from_method(request.method());
    let principal = principal_from_headers(request.headers());
    match authorize(&principal, action) {
        Decision::Allow => Ok(next.run(request).await),
        Decision::Deny => {
            tracing::warn!(?action, role = ?principal.role(), path = %request.uri().path(), "authorization denied");
            Err(AppError::Forbidden(
                "You are not authorized to access this route".into(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_are_always_allowed() {
        assert_eq!(authorize(&Principal::anonymous(), Action::Read), Decision::Allow);
    }

    #[test]
    fn mutations_need_admin() {
        let reader = Principal::new(Some("reader".into()));
        let admin = Principal::new(Some(ADMIN_ROLE.into()));
        for action in [Action::Create, Action::Update, Action::Delete] {
            assert_eq!(authorize(&Principal::anonymous(), action), Decision::Deny);
            assert_eq!(authorize(&reader, action), Decision::Deny);
            assert_eq!(authorize(&admin, action), Decision::Allow);
        }
    }

    #[test]
    fn methods_map_to_actions() {
        assert_eq!(Action::from_method(&Method::GET), Action::Read);
        assert_eq!(Action::from_method(&Method::POST), Action::Create);
        assert_eq!(Action::from_method(&Method::PUT), Action::Update);
        assert_eq!(Action::from_method(&Method::PATCH), Action::Update);
        assert_eq!(Action::from_method(&Method::DELETE), Action::Delete);
    }
}

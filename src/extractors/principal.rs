//! Extract the caller's role claim from the `auth` cookie or the `X-Role` header.

use crate::authz::Principal;
use axum::http::{header::COOKIE, HeaderMap};

/// Cookie carrying the role claim.
pub const ROLE_COOKIE: &str = "auth";
/// Header alternative for clients that do not send cookies.
pub const ROLE_HEADER: &str = "X-Role";

pub fn principal_from_headers(headers: &HeaderMap) -> Principal {
    let role = cookie_value(headers, ROLE_COOKIE).or_else(|| {
        headers
            .get(ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    });
    Principal::new(role)
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| k.trim() == name)
        .map(|(_, v)| v.trim().trim_matches('"').to_string())
        .filter(|v| !v.is_empty())
}

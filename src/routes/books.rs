//! Book routes. `/books/:key` is shared: PATCH reads the segment as a title, the other methods as an id.

use crate::authz::authorization_gate;
use crate::handlers::{change_author, create, delete, delete_all, list, patch_by_title, read, replace};
use crate::state::AppState;
use axum::{middleware, routing::get, Router};

pub fn book_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/books",
            get(list).post(create).patch(change_author).delete(delete_all),
        )
        .route(
            "/books/:key",
            get(read).put(replace).delete(delete).patch(patch_by_title),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), authorization_gate))
        .with_state(state)
}

pub mod books;
pub mod common;

pub use books::book_routes;
pub use common::common_routes;

use crate::state::AppState;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// The full application router. `verbose` adds per-request trace spans.
pub fn app(state: AppState, body_limit_bytes: usize, verbose: bool) -> Router {
    let router = Router::new()
        .merge(common_routes(state.clone()))
        .merge(book_routes(state))
        .layer(RequestBodyLimitLayer::new(body_limit_bytes));
    if verbose {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

//! HTTP surface of the query core.

pub mod dispatch;
pub mod handlers;
pub mod response;
mod service;
pub mod state;

pub use dispatch::{DispatchError, DispatchResult, Dispatcher};
pub use response::{ErrorBody, ResponseMapper};
pub use service::ApiService;
pub use state::ApiState;

use axum::{
    Router,
    routing::{get, post},
};

/// Build the router, nesting the query routes under `prefix`.
///
/// `/ping` is served at the root as well as under the prefix. An empty or
/// "/" prefix mounts everything at the root.
pub fn router(state: ApiState, prefix: &str) -> Router {
    let routes = Router::new()
        .route("/ping", get(handlers::ping))
        .route("/search", post(handlers::search))
        .route("/traces/:id", get(handlers::trace_by_id))
        .route("/tags", get(handlers::available_tags))
        .route("/tags/values", get(handlers::tags_values));

    let prefix = prefix.trim_end_matches('/');
    let app = if prefix.is_empty() {
        routes
    } else {
        Router::new().route("/ping", get(handlers::ping)).nest(prefix, routes)
    };

    app.with_state(state)
}

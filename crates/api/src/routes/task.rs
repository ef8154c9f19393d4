//! Route definitions for the `/tasks` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::task;
use crate::state::AppState;

/// Routes mounted at `/tasks`.
///
/// ```text
/// GET    /{id}          -> get_by_id
/// DELETE /{id}          -> delete
/// PUT    /{id}/status   -> update_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(task::get_by_id).delete(task::delete))
        .route("/{id}/status", put(task::update_status))
}

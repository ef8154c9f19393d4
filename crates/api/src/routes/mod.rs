pub mod health;
pub mod project;
pub mod task;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                                 create
/// /projects/created                         projects created by the caller
/// /projects/associated                      projects the caller joined
/// /projects/join                            join with an invite code
/// /projects/{id}                            get (?include_tasks), delete
/// /projects/{id}/members                    creator + collaborators
/// /projects/{id}/tasks                      list (?status, ?assigned_only), create
///
/// /tasks/{id}                               get, delete
/// /tasks/{id}/status                        update status (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/tasks", task::router())
}

//! Route definitions for the `/projects` resource.
//!
//! Also nests project-scoped task routes under `/projects/{project_id}/tasks`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{project, task};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// POST   /                       -> create
/// GET    /created                -> list_created
/// GET    /associated             -> list_associated
/// POST   /join                   -> join
/// GET    /{id}                   -> get_info
/// DELETE /{id}                   -> delete
/// GET    /{id}/members           -> list_members
///
/// GET    /{project_id}/tasks     -> list_by_project
/// POST   /{project_id}/tasks     -> create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(project::create))
        .route("/created", get(project::list_created))
        .route("/associated", get(project::list_associated))
        .route("/join", post(project::join))
        .route("/{id}", get(project::get_info).delete(project::delete))
        .route("/{id}/members", get(project::list_members))
        .route(
            "/{id}/tasks",
            get(task::list_by_project).post(task::create),
        )
}

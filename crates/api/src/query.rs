//! Query parameter types for API handlers.

use serde::Deserialize;

/// `GET /projects/{id}?include_tasks=`.
#[derive(Debug, Deserialize)]
pub struct ProjectInfoParams {
    #[serde(default)]
    pub include_tasks: bool,
}

/// `GET /projects/{id}/tasks?status=&assigned_only=`.
///
/// An absent or empty `status` means every status.
#[derive(Debug, Deserialize)]
pub struct TaskListParams {
    pub status: Option<String>,
    #[serde(default)]
    pub assigned_only: bool,
}

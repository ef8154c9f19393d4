//! Task entity model and DTOs.

use cpm_core::identity::UserIdentity;
use cpm_core::task_filter::FilterableTask;
use cpm_core::task_status::TaskStatus;
use cpm_core::types::{DbId, Timestamp};
use cpm_core::validation::not_blank;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A task row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    /// Rich text (HTML) produced by the client editor.
    pub description: String,
    pub price: Option<f64>,
    pub due_date: Option<Timestamp>,
    #[sqlx(rename = "status_id", try_from = "i16")]
    pub status: TaskStatus,
    /// Present only when `status` is Done.
    pub solution_description: Option<String>,
    pub created_by_email: String,
    pub created_by_name: String,
    pub assignee_email: Option<String>,
    pub assignee_name: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Task {
    pub fn is_assignee(&self, user: &UserIdentity) -> bool {
        self.assignee_email
            .as_deref()
            .is_some_and(|email| user.same_email(email))
    }

    pub fn is_creator(&self, user: &UserIdentity) -> bool {
        user.same_email(&self.created_by_email)
    }
}

impl FilterableTask for Task {
    fn status(&self) -> TaskStatus {
        self.status
    }

    fn assignee_email(&self) -> Option<&str> {
        self.assignee_email.as_deref()
    }
}

/// DTO for creating a task under a project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTask {
    #[validate(custom(function = "not_blank"), length(max = 200))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    pub due_date: Option<Timestamp>,
    /// Must belong to a project member; resolved to a full identity by the handler.
    pub assignee_email: Option<String>,
}

/// Insert payload once creator and assignee identities are resolved.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub project_id: DbId,
    pub name: String,
    pub description: String,
    pub price: Option<f64>,
    pub due_date: Option<Timestamp>,
    pub created_by: UserIdentity,
    pub assignee: Option<UserIdentity>,
}

/// DTO for `PUT /tasks/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTaskStatus {
    pub status: TaskStatus,
    pub solution: Option<String>,
}

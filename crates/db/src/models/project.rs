//! Project entity model and DTOs.

use cpm_core::aggregation::ProjectAggregate;
use cpm_core::identity::UserIdentity;
use cpm_core::types::{DbId, Timestamp};
use cpm_core::validation::not_blank;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::collaborator::ProjectMember;
use crate::models::task::Task;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub invite_code: String,
    pub created_by_email: String,
    pub created_by_name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    pub fn created_by(&self) -> UserIdentity {
        UserIdentity::new(&self.created_by_email, &self.created_by_name)
    }

    pub fn is_creator(&self, user: &UserIdentity) -> bool {
        user.same_email(&self.created_by_email)
    }
}

/// DTO for creating a new project. The creator comes from the caller's identity.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(custom(function = "not_blank"), length(max = 200))]
    pub name: String,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
}

/// A project with its collaborator count, as read by the list queries.
#[derive(Debug, Clone, FromRow)]
pub struct ProjectWithCounts {
    #[sqlx(flatten)]
    pub project: Project,
    pub collaborators_count: i64,
}

/// A project listing entry with task statistics.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    #[serde(flatten)]
    pub project: Project,
    pub collaborators_count: i64,
    #[serde(flatten)]
    pub aggregate: ProjectAggregate,
}

/// Full project view: members, and tasks when requested.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetails {
    #[serde(flatten)]
    pub project: Project,
    pub members: Vec<ProjectMember>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<Task>>,
    #[serde(flatten)]
    pub aggregate: ProjectAggregate,
}

//! Project collaborator model and DTOs.

use cpm_core::types::{DbId, Timestamp};
use cpm_core::validation::not_blank;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `project_collaborators` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Collaborator {
    pub id: DbId,
    pub project_id: DbId,
    pub user_email: String,
    pub user_name: String,
    pub joined_at: Timestamp,
}

/// DTO for joining a project with its invite code.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct JoinProject {
    #[validate(custom(function = "not_blank"))]
    pub invite_code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Creator,
    Collaborator,
}

/// Anyone who can see and work on a project's tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectMember {
    pub email: String,
    pub name: String,
    pub role: MemberRole,
}

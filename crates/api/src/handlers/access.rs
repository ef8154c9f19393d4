//! Project membership checks shared by project and task handlers.
//!
//! A member is the project's creator or any collaborator who joined with
//! the invite code. Only members may read a project or touch its tasks.

use cpm_core::error::CoreError;
use cpm_core::identity::{emails_match, UserIdentity};
use cpm_core::types::DbId;
use cpm_db::models::collaborator::{Collaborator, MemberRole, ProjectMember};
use cpm_db::models::project::Project;
use cpm_db::repositories::{CollaboratorRepo, ProjectRepo};
use cpm_db::DbPool;

use crate::error::{AppError, AppResult};

/// Load a project or fail with 404.
pub async fn find_project(pool: &DbPool, id: DbId) -> AppResult<Project> {
    ProjectRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
}

/// Load a project and make sure `user` is one of its members.
pub async fn require_member(
    pool: &DbPool,
    project_id: DbId,
    user: &UserIdentity,
) -> AppResult<Project> {
    let project = find_project(pool, project_id).await?;
    if project.is_creator(user) {
        return Ok(project);
    }

    match CollaboratorRepo::find(pool, project_id, &user.email).await? {
        Some(_) => Ok(project),
        None => Err(AppError::Core(CoreError::Forbidden(
            "You are not a member of this project".into(),
        ))),
    }
}

/// The creator followed by collaborators in join order.
pub fn members_of(project: &Project, collaborators: Vec<Collaborator>) -> Vec<ProjectMember> {
    std::iter::once(ProjectMember {
        email: project.created_by_email.clone(),
        name: project.created_by_name.clone(),
        role: MemberRole::Creator,
    })
    .chain(collaborators.into_iter().map(|c| ProjectMember {
        email: c.user_email,
        name: c.user_name,
        role: MemberRole::Collaborator,
    }))
    .collect()
}

/// Find the member whose email matches, ignoring case.
pub fn find_member<'a>(members: &'a [ProjectMember], email: &str) -> Option<&'a ProjectMember> {
    let email = email.trim();
    members.iter().find(|m| emails_match(&m.email, email))
}

//! Repository for the `project_collaborators` table.

use cpm_core::identity::UserIdentity;
use cpm_core::types::DbId;
use sqlx::PgPool;

use crate::models::collaborator::Collaborator;

const COLUMNS: &str = "id, project_id, user_email, user_name, joined_at";

/// Provides membership operations for project collaborators.
pub struct CollaboratorRepo;

impl CollaboratorRepo {
    /// Add `user` to a project. Returns `None` if the user already joined.
    ///
    /// Relies on `uq_project_collaborators_project_user`, so concurrent joins
    /// by the same user still produce a single row.
    pub async fn add(
        pool: &PgPool,
        project_id: DbId,
        user: &UserIdentity,
    ) -> Result<Option<Collaborator>, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_collaborators (project_id, user_email, user_name)
             VALUES ($1, $2, $3)
             ON CONFLICT DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Collaborator>(&query)
            .bind(project_id)
            .bind(&user.email)
            .bind(&user.name)
            .fetch_optional(pool)
            .await
    }

    /// List a project's collaborators in join order.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Collaborator>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_collaborators
             WHERE project_id = $1
             ORDER BY joined_at ASC, id ASC"
        );
        sqlx::query_as::<_, Collaborator>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Find the collaborator row for `email` in a project.
    pub async fn find(
        pool: &PgPool,
        project_id: DbId,
        email: &str,
    ) -> Result<Option<Collaborator>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_collaborators
             WHERE project_id = $1 AND lower(user_email) = lower($2)"
        );
        sqlx::query_as::<_, Collaborator>(&query)
            .bind(project_id)
            .bind(email)
            .fetch_optional(pool)
            .await
    }
}

//! Repository for the `projects` table.

use std::collections::HashMap;

use cpm_core::aggregation::{self, ProjectAggregate, TaskStats};
use cpm_core::identity::UserIdentity;
use cpm_core::task_status::TaskStatus;
use cpm_core::types::{DbId, StatusId};
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project, ProjectSummary, ProjectWithCounts};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, invite_code, created_by_email, created_by_name, \
                       created_at, updated_at";

/// Same columns qualified with the `p` alias, plus the collaborator count.
const SUMMARY_COLUMNS: &str = "p.id, p.name, p.description, p.invite_code, p.created_by_email, \
     p.created_by_name, p.created_at, p.updated_at, \
     (SELECT COUNT(*) FROM project_collaborators c WHERE c.project_id = p.id) \
     AS collaborators_count";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project owned by `creator`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProject,
        creator: &UserIdentity,
        invite_code: &str,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects
                 (name, description, invite_code, created_by_email, created_by_name)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(input.name.trim())
            .bind(input.description.trim())
            .bind(invite_code)
            .bind(&creator.email)
            .bind(&creator.name)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Resolve an invite code to its project.
    pub async fn find_by_invite_code(
        pool: &PgPool,
        invite_code: &str,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE invite_code = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(invite_code)
            .fetch_optional(pool)
            .await
    }

    /// Projects created by `email`, newest first, with task statistics.
    pub async fn list_created_by(
        pool: &PgPool,
        email: &str,
    ) -> Result<Vec<ProjectSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM projects p
             WHERE lower(p.created_by_email) = lower($1)
             ORDER BY p.created_at DESC, p.id DESC"
        );
        let rows = sqlx::query_as::<_, ProjectWithCounts>(&query)
            .bind(email)
            .fetch_all(pool)
            .await?;
        Self::summarize(pool, rows).await
    }

    /// Projects `email` has joined as a collaborator, most recently joined first.
    ///
    /// Projects the user created are not included even if a collaborator row
    /// exists for them.
    pub async fn list_associated_with(
        pool: &PgPool,
        email: &str,
    ) -> Result<Vec<ProjectSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM projects p
             JOIN project_collaborators pc ON pc.project_id = p.id
             WHERE lower(pc.user_email) = lower($1)
               AND lower(p.created_by_email) <> lower($1)
             ORDER BY pc.joined_at DESC, p.id DESC"
        );
        let rows = sqlx::query_as::<_, ProjectWithCounts>(&query)
            .bind(email)
            .fetch_all(pool)
            .await?;
        Self::summarize(pool, rows).await
    }

    /// Compute the task aggregate for a single project.
    pub async fn aggregate(pool: &PgPool, id: DbId) -> Result<ProjectAggregate, sqlx::Error> {
        let mut stats = Self::task_stats(pool, &[id]).await?;
        Ok(aggregation::from_stats(stats.remove(&id).unwrap_or_default()))
    }

    /// Permanently delete a project by ID. Tasks and collaborators cascade.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn summarize(
        pool: &PgPool,
        rows: Vec<ProjectWithCounts>,
    ) -> Result<Vec<ProjectSummary>, sqlx::Error> {
        let ids: Vec<DbId> = rows.iter().map(|r| r.project.id).collect();
        let mut stats = Self::task_stats(pool, &ids).await?;
        tracing::debug!(projects = ids.len(), "Aggregated project task statistics");

        Ok(rows
            .into_iter()
            .map(|row| {
                let project_stats = stats.remove(&row.project.id).unwrap_or_default();
                ProjectSummary {
                    project: row.project,
                    collaborators_count: row.collaborators_count,
                    aggregate: aggregation::from_stats(project_stats),
                }
            })
            .collect())
    }

    /// Count tasks per status for each of the given projects.
    async fn task_stats(
        pool: &PgPool,
        project_ids: &[DbId],
    ) -> Result<HashMap<DbId, TaskStats>, sqlx::Error> {
        if project_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(DbId, StatusId)> =
            sqlx::query_as("SELECT project_id, status_id FROM tasks WHERE project_id = ANY($1)")
                .bind(project_ids)
                .fetch_all(pool)
                .await?;

        let mut stats: HashMap<DbId, TaskStats> = HashMap::new();
        for (project_id, status_id) in rows {
            let status =
                TaskStatus::try_from(status_id).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
            stats.entry(project_id).or_default().record(status);
        }
        Ok(stats)
    }
}

//! Repository for the `tasks` table.

use cpm_core::task_status::StatusChange;
use cpm_core::types::DbId;
use sqlx::PgPool;

use crate::models::task::{NewTask, Task};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, name, description, price, due_date, status_id, \
                       solution_description, created_by_email, created_by_name, \
                       assignee_email, assignee_name, created_at, updated_at";

/// Provides CRUD operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task in the To Do state, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewTask) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (project_id, name, description, price, due_date,
                                created_by_email, created_by_name, assignee_email, assignee_name)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(input.project_id)
            .bind(input.name.trim())
            .bind(&input.description)
            .bind(input.price)
            .bind(input.due_date)
            .bind(&input.created_by.email)
            .bind(&input.created_by.name)
            .bind(input.assignee.as_ref().map(|a| a.email.as_str()))
            .bind(input.assignee.as_ref().map(|a| a.name.as_str()))
            .fetch_one(pool)
            .await
    }

    /// Find a task by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all tasks of a project, oldest first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks WHERE project_id = $1 ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Apply a validated status change.
    ///
    /// Status and solution are written by one statement, and only if the row
    /// is still in `change.from`. Returns `None` when the task is gone or its
    /// status moved underneath us.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        change: &StatusChange,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET status_id = $3, solution_description = $4
             WHERE id = $1 AND status_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(change.from.id())
            .bind(change.to.id())
            .bind(change.solution.as_deref())
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a task by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

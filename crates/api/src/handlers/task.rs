//! Handlers for tasks: project-scoped listing/creation and `/tasks/{id}`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cpm_core::error::CoreError;
use cpm_core::identity::UserIdentity;
use cpm_core::task_filter::{count_tasks, TaskCounts, TaskFilter};
use cpm_core::task_status::plan_transition;
use cpm_core::types::DbId;
use cpm_db::models::task::{CreateTask, NewTask, Task, UpdateTaskStatus};
use cpm_db::repositories::{CollaboratorRepo, TaskRepo};
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::access::{find_member, members_of, require_member};
use crate::middleware::auth::AuthUser;
use crate::query::TaskListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Filtered task list plus counters over the whole project.
#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
    pub counts: TaskCounts,
}

async fn find_task(state: &AppState, id: DbId) -> AppResult<Task> {
    TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))
}

/// GET /api/v1/projects/{project_id}/tasks?status=&assigned_only=
pub async fn list_by_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Query(params): Query<TaskListParams>,
) -> AppResult<Json<DataResponse<TaskListResponse>>> {
    let filter = TaskFilter::from_params(params.status.as_deref(), params.assigned_only)?;
    require_member(&state.pool, project_id, &auth.identity).await?;

    let all = TaskRepo::list_by_project(&state.pool, project_id).await?;
    let counts = count_tasks(&all, &auth.identity);
    let tasks = filter.apply(&all, &auth.identity).into_iter().cloned().collect();

    Ok(Json(DataResponse {
        data: TaskListResponse { tasks, counts },
    }))
}

/// POST /api/v1/projects/{project_id}/tasks
///
/// The assignee, if given, must be a member of the project.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<DataResponse<Task>>)> {
    input.validate()?;
    let project = require_member(&state.pool, project_id, &auth.identity).await?;

    let assignee = match input
        .assignee_email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
    {
        None => None,
        Some(email) => {
            let collaborators = CollaboratorRepo::list_by_project(&state.pool, project_id).await?;
            let members = members_of(&project, collaborators);
            let member = find_member(&members, email).ok_or_else(|| {
                AppError::Core(CoreError::Validation(format!(
                    "Assignee {email} is not a member of this project"
                )))
            })?;
            Some(UserIdentity::new(&member.email, &member.name))
        }
    };

    let new_task = NewTask {
        project_id,
        name: input.name,
        description: input.description,
        price: input.price,
        due_date: input.due_date,
        created_by: auth.identity.clone(),
        assignee,
    };
    let task = TaskRepo::create(&state.pool, &new_task).await?;

    tracing::info!(
        task_id = task.id,
        project_id,
        email = %auth.identity.email,
        subject = %auth.subject,
        "Task created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// GET /api/v1/tasks/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Task>>> {
    let task = find_task(&state, id).await?;
    require_member(&state.pool, task.project_id, &auth.identity).await?;
    Ok(Json(DataResponse { data: task }))
}

/// DELETE /api/v1/tasks/{id}
///
/// Allowed for the task's creator and the project's creator.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let task = find_task(&state, id).await?;
    let project = require_member(&state.pool, task.project_id, &auth.identity).await?;

    if !task.is_creator(&auth.identity) && !project.is_creator(&auth.identity) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the task creator or the project creator can delete this task".into(),
        )));
    }

    if TaskRepo::delete(&state.pool, id).await? {
        tracing::info!(
            task_id = id,
            email = %auth.identity.email,
            subject = %auth.subject,
            "Task deleted"
        );
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Task", id }))
    }
}

/// PUT /api/v1/tasks/{id}/status
///
/// Applies a lifecycle transition and returns the persisted task. A rejected
/// transition leaves the stored task untouched, so clients can fall back to
/// the last status they received.
pub async fn update_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTaskStatus>,
) -> AppResult<Json<DataResponse<Task>>> {
    let task = find_task(&state, id).await?;
    require_member(&state.pool, task.project_id, &auth.identity).await?;

    if !task.is_assignee(&auth.identity) && !task.is_creator(&auth.identity) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the assignee or the task creator can change its status".into(),
        )));
    }

    let change = plan_transition(task.status, input.status, input.solution.as_deref())?;

    let updated = match TaskRepo::update_status(&state.pool, id, &change).await? {
        Some(updated) => updated,
        None => {
            // Gone, or another request moved the status first.
            find_task(&state, id).await?;
            return Err(AppError::Core(CoreError::Conflict(
                "Task status was changed by another request; reload and retry".into(),
            )));
        }
    };

    tracing::info!(
        task_id = id,
        from = %change.from,
        to = %change.to,
        email = %auth.identity.email,
        subject = %auth.subject,
        "Task status changed"
    );
    Ok(Json(DataResponse { data: updated }))
}

//! Handlers for the `/projects` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cpm_core::error::CoreError;
use cpm_core::invite::{generate_invite_code, normalize_invite_code};
use cpm_core::types::DbId;
use cpm_db::models::collaborator::{JoinProject, ProjectMember};
use cpm_db::models::project::{CreateProject, Project, ProjectDetails, ProjectSummary};
use cpm_db::repositories::{CollaboratorRepo, ProjectRepo, TaskRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::access::{find_project, members_of, require_member};
use crate::middleware::auth::AuthUser;
use crate::query::ProjectInfoParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/projects
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    input.validate()?;

    let invite_code = generate_invite_code();
    let project = ProjectRepo::create(&state.pool, &input, &auth.identity, &invite_code).await?;

    tracing::info!(
        project_id = project.id,
        email = %auth.identity.email,
        subject = %auth.subject,
        "Project created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects/created
pub async fn list_created(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ProjectSummary>>>> {
    let projects = ProjectRepo::list_created_by(&state.pool, &auth.identity.email).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/associated
pub async fn list_associated(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ProjectSummary>>>> {
    let projects = ProjectRepo::list_associated_with(&state.pool, &auth.identity.email).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// POST /api/v1/projects/join
///
/// Joins the project identified by `invite_code`. Returns 404 if the code
/// resolves to no project and 409 if the caller is already a member.
pub async fn join(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<JoinProject>,
) -> AppResult<StatusCode> {
    input.validate()?;

    let not_found = || {
        AppError::Core(CoreError::NotFoundByKey {
            entity: "Project",
            key: "invite code",
            value: input.invite_code.clone(),
        })
    };

    let code = normalize_invite_code(&input.invite_code).ok_or_else(not_found)?;
    let project = ProjectRepo::find_by_invite_code(&state.pool, code)
        .await?
        .ok_or_else(not_found)?;

    if project.is_creator(&auth.identity) {
        return Err(AppError::Core(CoreError::Conflict(
            "You are the creator of this project".into(),
        )));
    }

    CollaboratorRepo::add(&state.pool, project.id, &auth.identity)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "You are already a collaborator on this project".into(),
            ))
        })?;

    tracing::info!(
        project_id = project.id,
        email = %auth.identity.email,
        subject = %auth.subject,
        "User joined project"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/projects/{id}?include_tasks=
pub async fn get_info(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<ProjectInfoParams>,
) -> AppResult<Json<DataResponse<ProjectDetails>>> {
    let project = require_member(&state.pool, id, &auth.identity).await?;
    let collaborators = CollaboratorRepo::list_by_project(&state.pool, id).await?;
    let aggregate = ProjectRepo::aggregate(&state.pool, id).await?;

    let tasks = if params.include_tasks {
        Some(TaskRepo::list_by_project(&state.pool, id).await?)
    } else {
        None
    };

    let members = members_of(&project, collaborators);
    Ok(Json(DataResponse {
        data: ProjectDetails {
            project,
            members,
            tasks,
            aggregate,
        },
    }))
}

/// GET /api/v1/projects/{id}/members
pub async fn list_members(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ProjectMember>>>> {
    let project = require_member(&state.pool, id, &auth.identity).await?;
    let collaborators = CollaboratorRepo::list_by_project(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: members_of(&project, collaborators),
    }))
}

/// DELETE /api/v1/projects/{id}
///
/// Only the creator may delete a project. Tasks and collaborators go with it.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let project = find_project(&state.pool, id).await?;
    if !project.is_creator(&auth.identity) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the project creator can delete it".into(),
        )));
    }

    if ProjectRepo::delete(&state.pool, id).await? {
        tracing::info!(
            project_id = id,
            email = %auth.identity.email,
            subject = %auth.subject,
            "Project deleted"
        );
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
    }
}

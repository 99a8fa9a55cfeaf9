//! Handlers for the `/projects` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use marro_core::error::CoreError;
use marro_core::lifecycle::{validate_schedule, ProjectStatus};
use marro_core::timeline::generate_timeline_now;
use marro_core::types::DbId;
use marro_db::models::project::{CreateProject, Project, UpdateProject};
use marro_db::repositories::ProjectRepo;
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::ClientFilterParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// A newly created project and the id of its generated timeline.
///
/// `timeline_id` is `None` when the timeline write failed; the backfill pass
/// fills the gap later.
#[derive(Debug, Serialize)]
pub struct CreatedProject {
    #[serde(flatten)]
    pub project: Project,
    pub timeline_id: Option<DbId>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Project",
        id,
    })
}

/// POST /api/v1/projects
///
/// Status defaults to `planning` and progress defaults from the status. The
/// default timeline is generated right after the insert; a failure there does
/// not fail the request.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<CreatedProject>>)> {
    input.validate()?;
    let status = match &input.status {
        Some(status) => status.parse::<ProjectStatus>()?,
        None => ProjectStatus::default(),
    };
    let progress = input.progress.unwrap_or_else(|| status.default_progress());
    validate_schedule(input.start_date, input.end_date)?;

    let project = ProjectRepo::create(
        &state.pool,
        auth.owner_id,
        &input,
        status.as_str(),
        progress,
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Client",
        id: input.client_id,
    }))?;
    tracing::info!(project_id = project.id, client_id = project.client_id, "Project created");

    let skeleton = generate_timeline_now(project.id, project.start_date, status);
    let timeline_id = match state.timelines.put_timeline(auth.owner_id, &skeleton).await {
        Ok(id) => Some(id),
        Err(e) => {
            tracing::warn!(
                project_id = project.id,
                error = %e,
                "Default timeline not created, leaving it to backfill"
            );
            None
        }
    };

    let created = CreatedProject {
        project,
        timeline_id,
    };
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/projects
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ClientFilterParams>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects = ProjectRepo::list(&state.pool, auth.owner_id, params.client_id).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = ProjectRepo::find_by_id(&state.pool, auth.owner_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: project }))
}

/// PUT /api/v1/projects/{id}
///
/// Status and progress are stored as given; neither rewrites the other or
/// the project's timeline.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    input.validate()?;
    if let Some(status) = &input.status {
        status.parse::<ProjectStatus>()?;
    }

    let existing = ProjectRepo::find_by_id(&state.pool, auth.owner_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    validate_schedule(
        input.start_date.or(existing.start_date),
        input.end_date.or(existing.end_date),
    )?;

    let project = ProjectRepo::update(&state.pool, auth.owner_id, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/v1/projects/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ProjectRepo::soft_delete(&state.pool, auth.owner_id, id).await? {
        tracing::info!(project_id = id, "Project deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

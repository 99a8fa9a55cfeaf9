//! Handlers for project timelines, their phases and tasks, and the backfill
//! pass.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use marro_core::backfill::{reconcile, BackfillReport};
use marro_core::error::CoreError;
use marro_core::lifecycle::PhaseStatus;
use marro_core::store::StoredTimeline;
use marro_core::timeline::{completion_percent, generate_timeline_now, validate_due_date};
use marro_core::types::{today_utc, DbId, OwnerId};
use marro_db::models::project::Project;
use marro_db::models::timeline::{
    ReplaceTimeline, TimelinePhase, TimelineTask, TimelineWithPhases, UpdateTimelinePhase,
    UpdateTimelineTask,
};
use marro_db::repositories::{ProjectRepo, TimelineRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// A stored timeline with its completed-task percentage.
#[derive(Debug, Serialize)]
pub struct TimelineView {
    #[serde(flatten)]
    pub timeline: TimelineWithPhases,
    pub completion_percent: u8,
}

impl TimelineView {
    pub fn new(timeline: TimelineWithPhases) -> Result<Self, CoreError> {
        let completion_percent = completion_percent(&timeline.to_skeleton()?);
        Ok(Self {
            timeline,
            completion_percent,
        })
    }
}

async fn find_project(state: &AppState, owner: OwnerId, id: DbId) -> AppResult<Project> {
    ProjectRepo::find_by_id(&state.pool, owner, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
}

async fn find_timeline(
    state: &AppState,
    owner: OwnerId,
    project_id: DbId,
) -> AppResult<TimelineWithPhases> {
    TimelineRepo::find_for_project(&state.pool, owner, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Timeline for project",
            id: project_id,
        }))
}

/// Reject a blank name in a partial update.
fn check_name(name: Option<&str>, what: &str) -> Result<(), CoreError> {
    match name {
        Some(name) if name.trim().is_empty() => {
            Err(CoreError::Validation(format!("{what} name must not be empty")))
        }
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Project timeline
// ---------------------------------------------------------------------------

/// GET /api/v1/projects/{id}/timeline
pub async fn get_for_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<TimelineView>>> {
    find_project(&state, auth.owner_id, project_id).await?;
    let timeline = find_timeline(&state, auth.owner_id, project_id).await?;
    Ok(Json(DataResponse {
        data: TimelineView::new(timeline)?,
    }))
}

/// POST /api/v1/projects/{id}/timeline
///
/// Generates the default timeline for a project that has none. A project
/// that already has one is left untouched and the request fails with 409.
pub async fn generate_for_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<StoredTimeline>>)> {
    let project = find_project(&state, auth.owner_id, project_id).await?;

    if let Some(existing) = state
        .timelines
        .timeline_for_project(auth.owner_id, project_id)
        .await?
    {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Project {project_id} already has timeline {}",
            existing.id
        ))));
    }

    let summary = project.summary()?;
    let timeline = generate_timeline_now(summary.id, summary.start_date, summary.status);
    let id = state.timelines.put_timeline(auth.owner_id, &timeline).await?;
    tracing::info!(project_id, timeline_id = id, "Timeline generated");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: StoredTimeline { id, timeline },
        }),
    ))
}

/// PUT /api/v1/projects/{id}/timeline
///
/// Replaces every phase and task. Phases keep the request order.
pub async fn replace_for_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<ReplaceTimeline>,
) -> AppResult<Json<DataResponse<TimelineView>>> {
    let phases = input.into_phases()?;
    find_project(&state, auth.owner_id, project_id).await?;
    let existing = find_timeline(&state, auth.owner_id, project_id).await?;

    TimelineRepo::replace_phases(&state.pool, existing.timeline.id, &phases).await?;
    tracing::info!(
        project_id,
        timeline_id = existing.timeline.id,
        phases = phases.len(),
        "Timeline replaced"
    );

    let timeline = find_timeline(&state, auth.owner_id, project_id).await?;
    Ok(Json(DataResponse {
        data: TimelineView::new(timeline)?,
    }))
}

// ---------------------------------------------------------------------------
// Owner-wide operations
// ---------------------------------------------------------------------------

/// GET /api/v1/timelines
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<StoredTimeline>>>> {
    let timelines = state.timelines.list_timelines(auth.owner_id).await?;
    Ok(Json(DataResponse { data: timelines }))
}

/// POST /api/v1/timelines/backfill
///
/// Gives every project of the caller that has no timeline the default one.
/// Safe to repeat.
pub async fn backfill(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<BackfillReport>>> {
    let report = reconcile(state.timelines.as_ref(), auth.owner_id, today_utc()).await?;
    Ok(Json(DataResponse { data: report }))
}

// ---------------------------------------------------------------------------
// Phases and tasks
// ---------------------------------------------------------------------------

/// PATCH /api/v1/timelines/phases/{id}
pub async fn update_phase(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTimelinePhase>,
) -> AppResult<Json<DataResponse<TimelinePhase>>> {
    check_name(input.name.as_deref(), "Phase")?;
    if let Some(status) = &input.status {
        status.parse::<PhaseStatus>()?;
    }

    let not_found = || {
        AppError::Core(CoreError::NotFound {
            entity: "Timeline phase",
            id,
        })
    };
    TimelineRepo::find_phase(&state.pool, auth.owner_id, id)
        .await?
        .ok_or_else(not_found)?;

    let phase = TimelineRepo::update_phase(&state.pool, id, &input)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(DataResponse { data: phase }))
}

/// PATCH /api/v1/timelines/tasks/{id}
///
/// A new due date must stay inside the task's phase window.
pub async fn update_task(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTimelineTask>,
) -> AppResult<Json<DataResponse<TimelineTask>>> {
    check_name(input.name.as_deref(), "Task")?;

    let not_found = || {
        AppError::Core(CoreError::NotFound {
            entity: "Timeline task",
            id,
        })
    };
    let phase = TimelineRepo::find_task_phase(&state.pool, auth.owner_id, id)
        .await?
        .ok_or_else(not_found)?;
    if let Some(due) = input.due_date {
        validate_due_date(phase.start_date, phase.end_date, due)?;
    }

    let task = TimelineRepo::update_task(&state.pool, id, &input)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(DataResponse { data: task }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_are_rejected() {
        assert!(check_name(Some("  "), "Task").is_err());
        assert!(check_name(Some("Kickoff"), "Task").is_ok());
        assert!(check_name(None, "Task").is_ok());
    }
}

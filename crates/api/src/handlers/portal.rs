//! Read-only client portal handlers.
//!
//! These routes are not authenticated: a client reaches them through the
//! portal link the agency shares. They only ever read.

use axum::extract::{Path, Query, State};
use axum::Json;
use marro_core::portal::portal_url;
use marro_db::models::client::Client;
use marro_db::models::project::Project;
use marro_db::repositories::{ClientRepo, ProjectRepo, TimelineRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::timeline::TimelineView;
use crate::query::ClientFilterParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// A project as shown in the portal, with its timeline when one exists.
#[derive(Debug, Serialize)]
pub struct PortalProject {
    #[serde(flatten)]
    pub project: Project,
    pub timeline: Option<TimelineView>,
}

/// Everything the portal page renders for one client.
#[derive(Debug, Serialize)]
pub struct PortalView {
    pub client: Client,
    pub portal_url: String,
    pub projects: Vec<PortalProject>,
}

/// GET /api/v1/portal/{slug}
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<PortalView>>> {
    let client = ClientRepo::find_by_portal_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No client portal at '{slug}'")))?;

    let projects = ProjectRepo::list_for_client(&state.pool, client.id).await?;
    let project_ids: Vec<_> = projects.iter().map(|p| p.id).collect();
    let mut timelines = TimelineRepo::list_for_projects(&state.pool, &project_ids).await?;

    let mut portal_projects = Vec::with_capacity(projects.len());
    for project in projects {
        // First timeline per project, matching the agency view.
        let timeline = match timelines
            .iter()
            .position(|t| t.timeline.project_id == project.id)
        {
            Some(index) => Some(TimelineView::new(timelines.remove(index))?),
            None => None,
        };
        portal_projects.push(PortalProject { project, timeline });
    }

    let view = PortalView {
        portal_url: portal_url(&state.config.portal_base_url, &client.portal_slug),
        client,
        projects: portal_projects,
    };
    Ok(Json(DataResponse { data: view }))
}

/// GET /api/v1/portal/projects?client_id=
pub async fn list_projects(
    State(state): State<AppState>,
    Query(params): Query<ClientFilterParams>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let client_id = params
        .client_id
        .ok_or_else(|| AppError::BadRequest("client_id is required".into()))?;
    let projects = ProjectRepo::list_for_client(&state.pool, client_id).await?;
    Ok(Json(DataResponse { data: projects }))
}

//! Handlers for the `/clients` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use marro_core::error::CoreError;
use marro_core::lifecycle::ClientStatus;
use marro_core::portal::{company_slug, portal_url};
use marro_core::types::DbId;
use marro_db::models::client::{Client, CreateClient, UpdateClient};
use marro_db::models::project::Project;
use marro_db::repositories::{ClientRepo, ProjectRepo};
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// A client row plus its public portal link.
#[derive(Debug, Serialize)]
pub struct ClientView {
    #[serde(flatten)]
    pub client: Client,
    pub portal_url: String,
}

impl ClientView {
    pub fn new(client: Client, base_url: &str) -> Self {
        let portal_url = portal_url(base_url, &client.portal_slug);
        Self { client, portal_url }
    }
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Client",
        id,
    })
}

/// POST /api/v1/clients
///
/// The portal slug is derived from the company name and never changes
/// afterwards. A company whose slug is taken by a live client gets the next
/// free numbered variant (`acme-2`).
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateClient>,
) -> AppResult<(StatusCode, Json<DataResponse<ClientView>>)> {
    input.validate()?;
    let status = match &input.status {
        Some(status) => status.parse::<ClientStatus>()?,
        None => ClientStatus::default(),
    };
    let slug = company_slug(&input.company)?;

    let client = ClientRepo::create(&state.pool, auth.owner_id, &input, status.as_str(), &slug)
        .await?;
    tracing::info!(client_id = client.id, portal_slug = %client.portal_slug, "Client created");

    let view = ClientView::new(client, &state.config.portal_base_url);
    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

/// GET /api/v1/clients
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ClientView>>>> {
    let clients = ClientRepo::list(&state.pool, auth.owner_id).await?;
    let views = clients
        .into_iter()
        .map(|c| ClientView::new(c, &state.config.portal_base_url))
        .collect();
    Ok(Json(DataResponse { data: views }))
}

/// GET /api/v1/clients/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ClientView>>> {
    let client = ClientRepo::find_by_id(&state.pool, auth.owner_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let view = ClientView::new(client, &state.config.portal_base_url);
    Ok(Json(DataResponse { data: view }))
}

/// PUT /api/v1/clients/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateClient>,
) -> AppResult<Json<DataResponse<ClientView>>> {
    input.validate()?;
    if let Some(status) = &input.status {
        status.parse::<ClientStatus>()?;
    }

    let client = ClientRepo::update(&state.pool, auth.owner_id, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    let view = ClientView::new(client, &state.config.portal_base_url);
    Ok(Json(DataResponse { data: view }))
}

/// DELETE /api/v1/clients/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ClientRepo::soft_delete(&state.pool, auth.owner_id, id).await? {
        tracing::info!(client_id = id, "Client deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// GET /api/v1/clients/{id}/projects
pub async fn list_projects(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    ClientRepo::find_by_id(&state.pool, auth.owner_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let projects = ProjectRepo::list(&state.pool, auth.owner_id, Some(id)).await?;
    Ok(Json(DataResponse { data: projects }))
}

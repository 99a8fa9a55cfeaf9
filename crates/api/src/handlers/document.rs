//! Handlers for document records under `/clients/{id}/documents`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use marro_core::error::CoreError;
use marro_core::types::DbId;
use marro_db::models::document::{CreateDocument, Document};
use marro_db::repositories::{ClientRepo, DocumentRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

async fn ensure_client(state: &AppState, auth: AuthUser, client_id: DbId) -> AppResult<()> {
    ClientRepo::find_by_id(&state.pool, auth.owner_id, client_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id: client_id,
        }))?;
    Ok(())
}

/// GET /api/v1/clients/{id}/documents
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(client_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Document>>>> {
    ensure_client(&state, auth, client_id).await?;
    let documents = DocumentRepo::list_for_client(&state.pool, auth.owner_id, client_id).await?;
    Ok(Json(DataResponse { data: documents }))
}

/// POST /api/v1/clients/{id}/documents
///
/// Records metadata only. A `project_id` must name a live project of the
/// same client.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(client_id): Path<DbId>,
    Json(input): Json<CreateDocument>,
) -> AppResult<(StatusCode, Json<DataResponse<Document>>)> {
    input.validate()?;
    ensure_client(&state, auth, client_id).await?;

    let document = DocumentRepo::create(&state.pool, auth.owner_id, client_id, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Project",
                id: input.project_id.unwrap_or_default(),
            })
        })?;
    tracing::info!(document_id = document.id, client_id, "Document recorded");

    Ok((StatusCode::CREATED, Json(DataResponse { data: document })))
}

/// DELETE /api/v1/clients/{id}/documents/{document_id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((client_id, document_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if DocumentRepo::soft_delete(&state.pool, auth.owner_id, client_id, document_id).await? {
        tracing::info!(document_id, client_id, "Document deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Document",
            id: document_id,
        }))
    }
}

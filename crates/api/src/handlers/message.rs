//! Handlers for the `/messages` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use marro_core::error::CoreError;
use marro_core::lifecycle::{MessageKind, MessageStatus};
use marro_core::types::DbId;
use marro_db::models::message::{CreateMessage, Message, UpdateMessage};
use marro_db::repositories::{ClientRepo, MessageRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::ClientFilterParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Message",
        id,
    })
}

/// POST /api/v1/messages
///
/// Status defaults to `unread`. The client must be the caller's and a
/// `project_id` must belong to that client.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateMessage>,
) -> AppResult<(StatusCode, Json<DataResponse<Message>>)> {
    input.validate()?;
    let kind = input.kind.parse::<MessageKind>()?;
    let status = match &input.status {
        Some(status) => status.parse::<MessageStatus>()?,
        None => MessageStatus::default(),
    };

    ClientRepo::find_by_id(&state.pool, auth.owner_id, input.client_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id: input.client_id,
        }))?;

    let message = MessageRepo::create(
        &state.pool,
        auth.owner_id,
        &input,
        kind.as_str(),
        status.as_str(),
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: input.project_id.unwrap_or_default(),
        })
    })?;
    tracing::info!(
        message_id = message.id,
        client_id = message.client_id,
        %kind,
        "Message created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: message })))
}

/// GET /api/v1/messages
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ClientFilterParams>,
) -> AppResult<Json<DataResponse<Vec<Message>>>> {
    let messages = MessageRepo::list(&state.pool, auth.owner_id, params.client_id).await?;
    Ok(Json(DataResponse { data: messages }))
}

/// GET /api/v1/messages/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Message>>> {
    let message = MessageRepo::find_by_id(&state.pool, auth.owner_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: message }))
}

/// PATCH /api/v1/messages/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMessage>,
) -> AppResult<Json<DataResponse<Message>>> {
    input.validate()?;
    if let Some(status) = &input.status {
        status.parse::<MessageStatus>()?;
    }

    let message = MessageRepo::update(&state.pool, auth.owner_id, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: message }))
}

/// DELETE /api/v1/messages/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if MessageRepo::soft_delete(&state.pool, auth.owner_id, id).await? {
        tracing::info!(message_id = id, "Message deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

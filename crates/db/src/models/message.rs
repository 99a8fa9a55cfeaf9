//! Messages exchanged between an agency and its clients.

use marro_core::types::{DbId, OwnerId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `messages` table.
///
/// `kind` travels as `type` on the wire.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Message {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub owner_id: OwnerId,
    pub client_id: DbId,
    pub project_id: Option<DbId>,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    pub attachments: Vec<String>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a message.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMessage {
    pub client_id: DbId,
    /// Must belong to `client_id` when set.
    pub project_id: Option<DbId>,
    #[validate(length(min = 1, max = 10_000))]
    pub content: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Defaults to `unread` if omitted.
    pub status: Option<String>,
    #[serde(default)]
    pub attachments: Vec<String>,
}

/// DTO for updating a message. Only content and read state change; the
/// client, project, and type are fixed at creation.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateMessage {
    #[validate(length(min = 1, max = 10_000))]
    pub content: Option<String>,
    pub status: Option<String>,
}

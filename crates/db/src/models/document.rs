//! Document metadata records attached to clients and, optionally, projects.

use marro_core::types::{DbId, OwnerId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `documents` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Document {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub owner_id: OwnerId,
    pub client_id: DbId,
    pub project_id: Option<DbId>,
    pub name: String,
    pub size_bytes: i64,
    pub content_type: String,
    pub url: String,
    pub is_contract: bool,
    #[serde(skip_serializing)]
    pub deleted_at: Option<Timestamp>,
    pub uploaded_at: Timestamp,
}

/// DTO for recording a document against a client. The client comes from the
/// request path.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDocument {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Must belong to the same client when set.
    pub project_id: Option<DbId>,
    #[validate(range(min = 0))]
    pub size_bytes: i64,
    #[validate(length(min = 1, max = 255))]
    pub content_type: String,
    #[validate(url)]
    pub url: String,
    #[serde(default)]
    pub is_contract: bool,
}

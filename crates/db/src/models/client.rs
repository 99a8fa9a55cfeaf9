//! Client entity model and DTOs.

use marro_core::types::{DbId, OwnerId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A client row from the `clients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Client {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub owner_id: OwnerId,
    pub name: String,
    pub email: String,
    pub company: String,
    pub status: String,
    pub portal_slug: String,
    pub profile_picture: Option<String>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new client. The portal slug is derived server-side.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClient {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 200))]
    pub company: String,
    /// Defaults to `pending` if omitted.
    pub status: Option<String>,
    #[validate(url)]
    pub profile_picture: Option<String>,
}

/// DTO for updating an existing client. All fields are optional.
///
/// Changing `company` does not move the portal slug, so links already shared
/// with the client keep working.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateClient {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub company: Option<String>,
    pub status: Option<String>,
    #[validate(url)]
    pub profile_picture: Option<String>,
}

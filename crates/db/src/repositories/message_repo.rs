//! Repository for the `messages` table.

use marro_core::types::{DbId, OwnerId};
use sqlx::PgPool;

use crate::models::message::{CreateMessage, Message, UpdateMessage};

const COLUMNS: &str = "id, owner_id, client_id, project_id, content, kind, status, \
    attachments, deleted_at, created_at, updated_at";

/// Provides owner-scoped CRUD operations for messages.
pub struct MessageRepo;

impl MessageRepo {
    /// Insert a message for one of `owner`'s live clients.
    ///
    /// `kind` and `status` are parsed by the caller. Returns `None` if the
    /// client is not `owner`'s or `project_id` is not one of its live projects.
    pub async fn create(
        pool: &PgPool,
        owner: OwnerId,
        input: &CreateMessage,
        kind: &str,
        status: &str,
    ) -> Result<Option<Message>, sqlx::Error> {
        let query = format!(
            "INSERT INTO messages
                (owner_id, client_id, project_id, content, kind, status, attachments)
             SELECT $1, c.id, $3, $4, $5, $6, $7
             FROM clients c
             WHERE c.id = $2 AND c.owner_id = $1 AND c.deleted_at IS NULL
               AND ($3::BIGINT IS NULL OR EXISTS (
                   SELECT 1 FROM projects p
                   WHERE p.id = $3 AND p.client_id = c.id AND p.deleted_at IS NULL
               ))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(owner)
            .bind(input.client_id)
            .bind(input.project_id)
            .bind(&input.content)
            .bind(kind)
            .bind(status)
            .bind(&input.attachments)
            .fetch_optional(pool)
            .await
    }

    /// Find one of `owner`'s messages by id. Excludes soft-deleted rows.
    pub async fn find_by_id(
        pool: &PgPool,
        owner: OwnerId,
        id: DbId,
    ) -> Result<Option<Message>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM messages
             WHERE id = $1 AND owner_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(id)
            .bind(owner)
            .fetch_optional(pool)
            .await
    }

    /// List `owner`'s messages, newest first, optionally for one client.
    pub async fn list(
        pool: &PgPool,
        owner: OwnerId,
        client_id: Option<DbId>,
    ) -> Result<Vec<Message>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM messages
             WHERE owner_id = $1 AND deleted_at IS NULL
               AND ($2::BIGINT IS NULL OR client_id = $2)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(owner)
            .bind(client_id)
            .fetch_all(pool)
            .await
    }

    /// Update a message's content and/or status. Only non-`None` fields are
    /// applied.
    pub async fn update(
        pool: &PgPool,
        owner: OwnerId,
        id: DbId,
        input: &UpdateMessage,
    ) -> Result<Option<Message>, sqlx::Error> {
        let query = format!(
            "UPDATE messages SET
                content = COALESCE($3, content),
                status = COALESCE($4, status)
             WHERE id = $1 AND owner_id = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(id)
            .bind(owner)
            .bind(&input.content)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a message. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(
        pool: &PgPool,
        owner: OwnerId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE messages SET deleted_at = NOW()
             WHERE id = $1 AND owner_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(owner)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

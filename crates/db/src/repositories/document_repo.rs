//! Repository for the `documents` table.

use marro_core::types::{DbId, OwnerId};
use sqlx::PgPool;

use crate::models::document::{CreateDocument, Document};

const COLUMNS: &str = "id, owner_id, client_id, project_id, name, size_bytes, content_type, \
    url, is_contract, deleted_at, uploaded_at";

/// Provides owner-scoped access to document records.
pub struct DocumentRepo;

impl DocumentRepo {
    /// Record a document against one of `owner`'s live clients.
    ///
    /// Returns `None` if the client is not `owner`'s, or if `project_id` is
    /// set and does not name a live project of that client.
    pub async fn create(
        pool: &PgPool,
        owner: OwnerId,
        client_id: DbId,
        input: &CreateDocument,
    ) -> Result<Option<Document>, sqlx::Error> {
        let query = format!(
            "INSERT INTO documents
                (owner_id, client_id, project_id, name, size_bytes, content_type, url,
                 is_contract)
             SELECT $1, c.id, $3, $4, $5, $6, $7, $8
             FROM clients c
             WHERE c.id = $2 AND c.owner_id = $1 AND c.deleted_at IS NULL
               AND ($3::BIGINT IS NULL OR EXISTS (
                   SELECT 1 FROM projects p
                   WHERE p.id = $3 AND p.client_id = c.id AND p.deleted_at IS NULL
               ))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(owner)
            .bind(client_id)
            .bind(input.project_id)
            .bind(&input.name)
            .bind(input.size_bytes)
            .bind(&input.content_type)
            .bind(&input.url)
            .bind(input.is_contract)
            .fetch_optional(pool)
            .await
    }

    /// Documents of one of `owner`'s clients, newest first.
    pub async fn list_for_client(
        pool: &PgPool,
        owner: OwnerId,
        client_id: DbId,
    ) -> Result<Vec<Document>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM documents
             WHERE client_id = $1 AND owner_id = $2 AND deleted_at IS NULL
             ORDER BY uploaded_at DESC, id DESC"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(client_id)
            .bind(owner)
            .fetch_all(pool)
            .await
    }

    /// Soft-delete a document of the given client. Returns `true` if a row
    /// was marked deleted.
    pub async fn soft_delete(
        pool: &PgPool,
        owner: OwnerId,
        client_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE documents SET deleted_at = NOW()
             WHERE id = $1 AND client_id = $2 AND owner_id = $3 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(client_id)
        .bind(owner)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

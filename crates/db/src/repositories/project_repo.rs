//! Repository for the `projects` table.

use marro_core::types::{DbId, OwnerId};
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, client_id, name, description, status, progress, \
    start_date, end_date, budget, deleted_at, created_at, updated_at";

/// Provides owner-scoped CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project under one of `owner`'s clients.
    ///
    /// `status` and `progress` are resolved by the caller. Returns `None` if
    /// the client does not exist, is deleted, or belongs to someone else.
    pub async fn create(
        pool: &PgPool,
        owner: OwnerId,
        input: &CreateProject,
        status: &str,
        progress: i16,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects
                (owner_id, client_id, name, description, status, progress,
                 start_date, end_date, budget)
             SELECT $1, c.id, $3, $4, $5, $6, $7, $8, $9
             FROM clients c
             WHERE c.id = $2 AND c.owner_id = $1 AND c.deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(owner)
            .bind(input.client_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(status)
            .bind(progress)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.budget)
            .fetch_optional(pool)
            .await
    }

    /// Find one of `owner`'s projects by id. Excludes soft-deleted rows.
    pub async fn find_by_id(
        pool: &PgPool,
        owner: OwnerId,
        id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE id = $1 AND owner_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(owner)
            .fetch_optional(pool)
            .await
    }

    /// List `owner`'s projects, most recently created first, optionally
    /// restricted to one client.
    pub async fn list(
        pool: &PgPool,
        owner: OwnerId,
        client_id: Option<DbId>,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE owner_id = $1 AND deleted_at IS NULL
               AND ($2::BIGINT IS NULL OR client_id = $2)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(owner)
            .bind(client_id)
            .fetch_all(pool)
            .await
    }

    /// List a live client's projects regardless of owner. Used by the portal,
    /// so a deleted client yields nothing.
    pub async fn list_for_client(
        pool: &PgPool,
        client_id: DbId,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects p
             WHERE p.client_id = $1 AND p.deleted_at IS NULL
               AND EXISTS (
                   SELECT 1 FROM clients c
                   WHERE c.id = p.client_id AND c.deleted_at IS NULL
               )
             ORDER BY p.created_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(client_id)
            .fetch_all(pool)
            .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if the project does not exist or belongs to someone else.
    pub async fn update(
        pool: &PgPool,
        owner: OwnerId,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                status = COALESCE($5, status),
                progress = COALESCE($6, progress),
                start_date = COALESCE($7, start_date),
                end_date = COALESCE($8, end_date),
                budget = COALESCE($9, budget)
             WHERE id = $1 AND owner_id = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(owner)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.status)
            .bind(input.progress)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.budget)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a project. Its timeline rows are left in place.
    /// Returns `true` if a row was marked deleted.
    pub async fn soft_delete(
        pool: &PgPool,
        owner: OwnerId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET deleted_at = NOW()
             WHERE id = $1 AND owner_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(owner)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

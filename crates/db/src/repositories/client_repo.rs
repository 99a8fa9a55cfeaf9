//! Repository for the `clients` table.

use marro_core::portal::free_slug;
use marro_core::types::{DbId, OwnerId};
use sqlx::PgPool;

use crate::models::client::{Client, CreateClient, UpdateClient};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, name, email, company, status, portal_slug, \
    profile_picture, deleted_at, created_at, updated_at";

/// Slug lookups and inserts tried before a lost race is reported.
const SLUG_ATTEMPTS: u32 = 3;

/// Provides owner-scoped CRUD operations for clients.
pub struct ClientRepo;

impl ClientRepo {
    /// Insert a new client under the first free portal slug derived from
    /// `base_slug`, returning the created row.
    ///
    /// Slugs held by live clients of any owner count as taken. An insert that
    /// loses a race for the chosen slug is retried with a fresh lookup.
    pub async fn create(
        pool: &PgPool,
        owner: OwnerId,
        input: &CreateClient,
        status: &str,
        base_slug: &str,
    ) -> Result<Client, sqlx::Error> {
        let mut attempt = 1;
        loop {
            let taken = Self::slugs_in_use(pool, base_slug).await?;
            let slug = free_slug(base_slug, &taken);
            match Self::insert(pool, owner, input, status, &slug).await {
                Err(sqlx::Error::Database(err))
                    if attempt < SLUG_ATTEMPTS
                        && err.constraint() == Some("uq_clients_portal_slug") =>
                {
                    tracing::debug!(portal_slug = %slug, attempt, "Portal slug taken, retrying");
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    /// Live slugs equal to `base_slug` or starting with `base_slug-`.
    pub async fn slugs_in_use(
        pool: &PgPool,
        base_slug: &str,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT portal_slug FROM clients
             WHERE deleted_at IS NULL
               AND (portal_slug = $1 OR portal_slug LIKE $1 || '-%')",
        )
        .bind(base_slug)
        .fetch_all(pool)
        .await
    }

    async fn insert(
        pool: &PgPool,
        owner: OwnerId,
        input: &CreateClient,
        status: &str,
        portal_slug: &str,
    ) -> Result<Client, sqlx::Error> {
        let query = format!(
            "INSERT INTO clients
                (owner_id, name, email, company, status, portal_slug, profile_picture)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(owner)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.company)
            .bind(status)
            .bind(portal_slug)
            .bind(&input.profile_picture)
            .fetch_one(pool)
            .await
    }

    /// Find one of `owner`'s clients by id. Excludes soft-deleted rows.
    pub async fn find_by_id(
        pool: &PgPool,
        owner: OwnerId,
        id: DbId,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM clients
             WHERE id = $1 AND owner_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(owner)
            .fetch_optional(pool)
            .await
    }

    /// Find a client by portal slug regardless of owner. Used by the
    /// unauthenticated portal.
    pub async fn find_by_portal_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM clients WHERE portal_slug = $1 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List `owner`'s clients, most recently created first.
    pub async fn list(pool: &PgPool, owner: OwnerId) -> Result<Vec<Client>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM clients
             WHERE owner_id = $1 AND deleted_at IS NULL
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(owner)
            .fetch_all(pool)
            .await
    }

    /// Update a client. Only non-`None` fields in `input` are applied; the
    /// portal slug is never changed.
    ///
    /// Returns `None` if the client does not exist or belongs to someone else.
    pub async fn update(
        pool: &PgPool,
        owner: OwnerId,
        id: DbId,
        input: &UpdateClient,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "UPDATE clients SET
                name = COALESCE($3, name),
                email = COALESCE($4, email),
                company = COALESCE($5, company),
                status = COALESCE($6, status),
                profile_picture = COALESCE($7, profile_picture)
             WHERE id = $1 AND owner_id = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(owner)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.company)
            .bind(&input.status)
            .bind(&input.profile_picture)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a client. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(
        pool: &PgPool,
        owner: OwnerId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE clients SET deleted_at = NOW()
             WHERE id = $1 AND owner_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(owner)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

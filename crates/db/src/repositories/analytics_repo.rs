//! Repository for the `analytics` table.

use marro_core::types::OwnerId;
use sqlx::PgPool;

use crate::models::analytics::{AnalyticsEntry, CreateAnalyticsEntry};

const COLUMNS: &str = "id, owner_id, metric, value, period, date, created_at";

/// Append-only storage for an owner's metrics.
pub struct AnalyticsRepo;

impl AnalyticsRepo {
    /// Record a metric. `period` is parsed by the caller.
    pub async fn create(
        pool: &PgPool,
        owner: OwnerId,
        input: &CreateAnalyticsEntry,
        period: &str,
    ) -> Result<AnalyticsEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO analytics (owner_id, metric, value, period, date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AnalyticsEntry>(&query)
            .bind(owner)
            .bind(&input.metric)
            .bind(input.value)
            .bind(period)
            .bind(input.date)
            .fetch_one(pool)
            .await
    }

    /// `owner`'s metrics, most recent date first, optionally for one period.
    pub async fn list(
        pool: &PgPool,
        owner: OwnerId,
        period: Option<&str>,
    ) -> Result<Vec<AnalyticsEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM analytics
             WHERE owner_id = $1 AND ($2::TEXT IS NULL OR period = $2)
             ORDER BY date DESC, id DESC"
        );
        sqlx::query_as::<_, AnalyticsEntry>(&query)
            .bind(owner)
            .bind(period)
            .fetch_all(pool)
            .await
    }
}

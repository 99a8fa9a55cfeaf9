//! Recorded dashboard metrics.

use marro_core::types::{Day, DbId, OwnerId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `analytics` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AnalyticsEntry {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub owner_id: OwnerId,
    pub metric: String,
    pub value: f64,
    pub period: String,
    pub date: Day,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAnalyticsEntry {
    #[validate(length(min = 1, max = 100))]
    pub metric: String,
    pub value: f64,
    pub period: String,
    pub date: Day,
}

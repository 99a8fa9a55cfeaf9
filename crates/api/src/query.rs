//! Shared query parameter types for API handlers.

use marro_core::types::DbId;
use serde::Deserialize;

/// Optional `?client_id=` filter.
///
/// Optional for the agency project list; the portal project list rejects a
/// request without it.
#[derive(Debug, Deserialize)]
pub struct ClientFilterParams {
    pub client_id: Option<DbId>,
}

/// Optional `?period=` filter for analytics listings.
#[derive(Debug, Deserialize)]
pub struct PeriodFilterParams {
    pub period: Option<String>,
}

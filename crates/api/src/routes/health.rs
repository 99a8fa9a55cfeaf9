//! Liveness endpoint mounted at the root, outside `/api/v1`.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// What the service can currently answer from.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` with a reachable database; `degraded` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Owners whose timeline listings survive a database outage. `null`
    /// when the timeline store has no fallback tier.
    pub cached_timeline_owners: Option<usize>,
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = marro_db::health_check(&state.pool).await.is_ok();
    let cached_timeline_owners = state.timelines.cached_owner_count().await;

    if !db_healthy {
        tracing::warn!(?cached_timeline_owners, "Health check: database unreachable");
    }

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        cached_timeline_owners,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

//! Route definitions for owner-wide timeline operations.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::timeline;
use crate::state::AppState;

/// Routes mounted at `/timelines`.
///
/// ```text
/// GET    /                 -> list
/// POST   /backfill         -> backfill
/// PATCH  /phases/{id}      -> update_phase
/// PATCH  /tasks/{id}       -> update_task
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(timeline::list))
        .route("/backfill", post(timeline::backfill))
        .route("/phases/{id}", patch(timeline::update_phase))
        .route("/tasks/{id}", patch(timeline::update_task))
}

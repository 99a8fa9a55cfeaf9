//! Route definitions for the `/analytics` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::analytics;
use crate::state::AppState;

/// Routes mounted at `/analytics`.
///
/// ```text
/// GET    /    -> list (?period=)
/// POST   /    -> create
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(analytics::list).post(analytics::create))
}

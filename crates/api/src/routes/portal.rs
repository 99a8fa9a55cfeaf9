//! Route definitions for the public client portal.

use axum::routing::get;
use axum::Router;

use crate::handlers::portal;
use crate::state::AppState;

/// Routes mounted at `/portal`. No authentication.
///
/// ```text
/// GET    /projects         -> list_projects (?client_id= required)
/// GET    /{slug}           -> get_by_slug
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects", get(portal::list_projects))
        .route("/{slug}", get(portal::get_by_slug))
}

//! Route definitions for the `/projects` resource, including each project's
//! timeline.

use axum::routing::get;
use axum::Router;

use crate::handlers::{project, timeline};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                 -> list
/// POST   /                 -> create
/// GET    /{id}             -> get_by_id
/// PUT    /{id}             -> update
/// DELETE /{id}             -> delete
/// GET    /{id}/timeline    -> timeline::get_for_project
/// POST   /{id}/timeline    -> timeline::generate_for_project
/// PUT    /{id}/timeline    -> timeline::replace_for_project
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route(
            "/{id}/timeline",
            get(timeline::get_for_project)
                .post(timeline::generate_for_project)
                .put(timeline::replace_for_project),
        )
}

//! Route definitions for the `/messages` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::message;
use crate::state::AppState;

/// Routes mounted at `/messages`.
///
/// ```text
/// GET    /          -> list (?client_id=)
/// POST   /          -> create
/// GET    /{id}      -> get_by_id
/// PATCH  /{id}      -> update
/// DELETE /{id}      -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(message::list).post(message::create))
        .route(
            "/{id}",
            get(message::get_by_id)
                .patch(message::update)
                .delete(message::delete),
        )
}

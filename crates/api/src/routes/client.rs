//! Route definitions for the `/clients` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::{client, document};
use crate::state::AppState;

/// Routes mounted at `/clients`.
///
/// ```text
/// GET    /                 -> list
/// POST   /                 -> create
/// GET    /{id}             -> get_by_id
/// PUT    /{id}             -> update
/// DELETE /{id}             -> delete
/// GET    /{id}/projects    -> list_projects
/// GET    /{id}/documents   -> document::list
/// POST   /{id}/documents   -> document::create
/// DELETE /{id}/documents/{document_id} -> document::delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(client::list).post(client::create))
        .route(
            "/{id}",
            get(client::get_by_id)
                .put(client::update)
                .delete(client::delete),
        )
        .route("/{id}/projects", get(client::list_projects))
        .route("/{id}/documents", get(document::list).post(document::create))
        .route("/{id}/documents/{document_id}", delete(document::delete))
}

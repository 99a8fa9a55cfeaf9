pub mod analytics;
pub mod client;
pub mod health;
pub mod message;
pub mod portal;
pub mod project;
pub mod timeline;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /clients                                 list, create
/// /clients/{id}                            get, update, delete
/// /clients/{id}/projects                   projects of one client
/// /clients/{id}/documents                  list, create document records
/// /clients/{id}/documents/{document_id}    delete
///
/// /projects                                list (?client_id=), create
/// /projects/{id}                           get, update, delete
/// /projects/{id}/timeline                  get, generate (POST), replace (PUT)
///
/// /timelines                               list the caller's timelines
/// /timelines/backfill                      generate missing timelines (POST)
/// /timelines/phases/{id}                   update phase (PATCH)
/// /timelines/tasks/{id}                    update task (PATCH)
///
/// /messages                                list (?client_id=), create
/// /messages/{id}                           get, update (PATCH), delete
///
/// /analytics                               list (?period=), create
///
/// /portal/projects                         projects of a client (?client_id=, public)
/// /portal/{slug}                           client portal view (public)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/clients", client::router())
        .nest("/projects", project::router())
        .nest("/timelines", timeline::router())
        .nest("/messages", message::router())
        .nest("/analytics", analytics::router())
        .nest("/portal", portal::router())
}

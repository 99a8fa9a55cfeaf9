use std::sync::Arc;

use marro_core::store::TimelineStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: marro_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Timeline storage used by generation and backfill. In production this
    /// is the database tier in front of an in-memory fallback.
    pub timelines: Arc<dyn TimelineStore>,
}

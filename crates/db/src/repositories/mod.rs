//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! `&PgPool` as the first argument. Queries over agency-owned rows take the
//! owner id and never return another owner's data.

pub mod analytics_repo;
pub mod client_repo;
pub mod document_repo;
pub mod message_repo;
pub mod project_repo;
pub mod timeline_repo;

pub use analytics_repo::AnalyticsRepo;
pub use client_repo::ClientRepo;
pub use document_repo::DocumentRepo;
pub use message_repo::MessageRepo;
pub use project_repo::ProjectRepo;
pub use timeline_repo::TimelineRepo;

//! Persistence seam for projects and timelines.
//!
//! The backfill pass and the HTTP layer only need three things from storage:
//! list an owner's projects, list an owner's timelines, and write a new
//! timeline. [`TimelineStore`] captures exactly that. The database tier lives
//! in the `db` crate; [`MemoryStore`] is the local cache tier and
//! [`TieredStore`] composes the two with a fixed precedence.

mod memory;
mod tiered;

pub use memory::MemoryStore;
pub use tiered::TieredStore;

use async_trait::async_trait;
use serde::Serialize;

use crate::backfill::ProjectSummary;
use crate::error::CoreError;
use crate::timeline::TimelineSkeleton;
use crate::types::{DbId, OwnerId};

/// A timeline as held by a store, with the id that store assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredTimeline {
    pub id: DbId,
    #[serde(flatten)]
    pub timeline: TimelineSkeleton,
}

/// Record access needed by timeline generation. No transactional guarantee
/// is assumed across calls.
#[async_trait]
pub trait TimelineStore: Send + Sync {
    /// Live (not deleted) projects belonging to `owner`.
    async fn list_projects_for_owner(
        &self,
        owner: OwnerId,
    ) -> Result<Vec<ProjectSummary>, CoreError>;

    /// Every timeline referencing one of `owner`'s projects.
    async fn list_timelines(&self, owner: OwnerId) -> Result<Vec<StoredTimeline>, CoreError>;

    /// Persist a new timeline and return its id.
    async fn put_timeline(
        &self,
        owner: OwnerId,
        timeline: &TimelineSkeleton,
    ) -> Result<DbId, CoreError>;

    /// Number of owners whose timelines can be served without a primary tier,
    /// or `None` for a store with no fallback.
    async fn cached_owner_count(&self) -> Option<usize> {
        None
    }

    /// The first timeline referencing `project_id`, if any.
    async fn timeline_for_project(
        &self,
        owner: OwnerId,
        project_id: DbId,
    ) -> Result<Option<StoredTimeline>, CoreError> {
        Ok(self
            .list_timelines(owner)
            .await?
            .into_iter()
            .find(|t| t.timeline.project_id == project_id))
    }
}

//! PostgreSQL tier of the timeline store.

use async_trait::async_trait;
use marro_core::backfill::ProjectSummary;
use marro_core::error::CoreError;
use marro_core::store::{StoredTimeline, TimelineStore};
use marro_core::timeline::TimelineSkeleton;
use marro_core::types::{DbId, OwnerId};

use crate::repositories::{ProjectRepo, TimelineRepo};
use crate::DbPool;

/// [`TimelineStore`] backed by the `projects` and `timelines` tables.
#[derive(Debug, Clone)]
pub struct PgTimelineStore {
    pool: DbPool,
}

impl PgTimelineStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Database failures surface to the store's callers as internal errors.
fn storage_error(err: sqlx::Error) -> CoreError {
    CoreError::Internal(format!("Timeline storage failed: {err}"))
}

#[async_trait]
impl TimelineStore for PgTimelineStore {
    async fn list_projects_for_owner(
        &self,
        owner: OwnerId,
    ) -> Result<Vec<ProjectSummary>, CoreError> {
        ProjectRepo::list(&self.pool, owner, None)
            .await
            .map_err(storage_error)?
            .iter()
            .map(|project| project.summary())
            .collect()
    }

    async fn list_timelines(&self, owner: OwnerId) -> Result<Vec<StoredTimeline>, CoreError> {
        TimelineRepo::list_for_owner(&self.pool, owner)
            .await
            .map_err(storage_error)?
            .iter()
            .map(|stored| {
                Ok(StoredTimeline {
                    id: stored.timeline.id,
                    timeline: stored.to_skeleton()?,
                })
            })
            .collect()
    }

    async fn put_timeline(
        &self,
        owner: OwnerId,
        timeline: &TimelineSkeleton,
    ) -> Result<DbId, CoreError> {
        ProjectRepo::find_by_id(&self.pool, owner, timeline.project_id)
            .await
            .map_err(storage_error)?
            .ok_or(CoreError::NotFound {
                entity: "Project",
                id: timeline.project_id,
            })?;

        let id = TimelineRepo::create(&self.pool, timeline)
            .await
            .map_err(storage_error)?;
        tracing::debug!(project_id = timeline.project_id, timeline_id = id, "Timeline stored");
        Ok(id)
    }

    async fn timeline_for_project(
        &self,
        owner: OwnerId,
        project_id: DbId,
    ) -> Result<Option<StoredTimeline>, CoreError> {
        match TimelineRepo::find_for_project(&self.pool, owner, project_id)
            .await
            .map_err(storage_error)?
        {
            Some(stored) => Ok(Some(StoredTimeline {
                id: stored.timeline.id,
                timeline: stored.to_skeleton()?,
            })),
            None => Ok(None),
        }
    }
}

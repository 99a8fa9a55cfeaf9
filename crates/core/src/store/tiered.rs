//! Primary store with an in-memory fallback.

use async_trait::async_trait;

use super::{MemoryStore, StoredTimeline, TimelineStore};
use crate::backfill::ProjectSummary;
use crate::error::CoreError;
use crate::timeline::TimelineSkeleton;
use crate::types::{DbId, OwnerId};

/// Composes a primary [`TimelineStore`] with a [`MemoryStore`] fallback.
///
/// Precedence is fixed:
///
/// - Reads go to the primary. A successful read replaces the owner's fallback
///   snapshot; results from the two tiers are never merged.
/// - A failed primary read is answered from the fallback snapshot when one
///   exists, otherwise the primary error is returned.
/// - Writes go to the primary only. A successful write is added to an
///   existing fallback snapshot under the primary's id. With no snapshot the
///   fallback stays cold until the next successful read. A failed write
///   propagates and leaves the fallback untouched.
pub struct TieredStore<P> {
    primary: P,
    fallback: MemoryStore,
}

impl<P: TimelineStore> TieredStore<P> {
    pub fn new(primary: P, fallback: MemoryStore) -> Self {
        Self { primary, fallback }
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn fallback(&self) -> &MemoryStore {
        &self.fallback
    }
}

#[async_trait]
impl<P: TimelineStore> TimelineStore for TieredStore<P> {
    async fn list_projects_for_owner(
        &self,
        owner: OwnerId,
    ) -> Result<Vec<ProjectSummary>, CoreError> {
        match self.primary.list_projects_for_owner(owner).await {
            Ok(projects) => {
                self.fallback.replace_projects(owner, projects.clone()).await;
                Ok(projects)
            }
            Err(err) => match self.fallback.cached_projects(owner).await {
                Some(cached) => {
                    tracing::warn!(
                        %owner,
                        error = %err,
                        "Primary store unavailable, serving cached projects"
                    );
                    Ok(cached)
                }
                None => Err(err),
            },
        }
    }

    async fn list_timelines(&self, owner: OwnerId) -> Result<Vec<StoredTimeline>, CoreError> {
        match self.primary.list_timelines(owner).await {
            Ok(timelines) => {
                self.fallback.replace_timelines(owner, timelines.clone()).await;
                Ok(timelines)
            }
            Err(err) => match self.fallback.cached_timelines(owner).await {
                Some(cached) => {
                    tracing::warn!(
                        %owner,
                        error = %err,
                        "Primary store unavailable, serving cached timelines"
                    );
                    Ok(cached)
                }
                None => Err(err),
            },
        }
    }

    async fn put_timeline(
        &self,
        owner: OwnerId,
        timeline: &TimelineSkeleton,
    ) -> Result<DbId, CoreError> {
        let id = self.primary.put_timeline(owner, timeline).await?;
        self.fallback
            .cache_timeline(
                owner,
                StoredTimeline {
                    id,
                    timeline: timeline.clone(),
                },
            )
            .await;
        Ok(id)
    }

    async fn cached_owner_count(&self) -> Option<usize> {
        self.fallback.cached_owner_count().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use assert_matches::assert_matches;
    use uuid::Uuid;

    use super::*;
    use crate::lifecycle::ProjectStatus;
    use crate::timeline::generate_timeline;

    /// Wraps a [`MemoryStore`] and fails every call while `down` is set.
    struct FlakyStore {
        inner: MemoryStore,
        down: AtomicBool,
    }

    impl FlakyStore {
        fn new() -> Self {
            Self {
                inner: MemoryStore::new(),
                down: AtomicBool::new(false),
            }
        }

        fn check(&self) -> Result<(), CoreError> {
            if self.down.load(Ordering::SeqCst) {
                Err(CoreError::Internal("connection refused".into()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl TimelineStore for FlakyStore {
        async fn list_projects_for_owner(
            &self,
            owner: OwnerId,
        ) -> Result<Vec<ProjectSummary>, CoreError> {
            self.check()?;
            self.inner.list_projects_for_owner(owner).await
        }

        async fn list_timelines(&self, owner: OwnerId) -> Result<Vec<StoredTimeline>, CoreError> {
            self.check()?;
            self.inner.list_timelines(owner).await
        }

        async fn put_timeline(
            &self,
            owner: OwnerId,
            timeline: &TimelineSkeleton,
        ) -> Result<DbId, CoreError> {
            self.check()?;
            self.inner.put_timeline(owner, timeline).await
        }
    }

    fn summary(id: DbId) -> ProjectSummary {
        ProjectSummary {
            id,
            start_date: None,
            status: ProjectStatus::Review,
        }
    }

    fn skeleton(project_id: DbId) -> TimelineSkeleton {
        generate_timeline(
            project_id,
            None,
            ProjectStatus::Review,
            "2024-01-01".parse().unwrap(),
        )
    }

    async fn seeded(owner: OwnerId) -> TieredStore<FlakyStore> {
        let primary = FlakyStore::new();
        primary
            .inner
            .replace_projects(owner, vec![summary(1), summary(2)])
            .await;
        TieredStore::new(primary, MemoryStore::new())
    }

    #[tokio::test]
    async fn healthy_primary_refreshes_fallback() {
        let owner = Uuid::new_v4();
        let store = seeded(owner).await;

        let projects = store.list_projects_for_owner(owner).await.unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(store.fallback().cached_projects(owner).await, Some(projects));
    }

    #[tokio::test]
    async fn failed_primary_serves_cached_snapshot() {
        let owner = Uuid::new_v4();
        let store = seeded(owner).await;
        store.list_projects_for_owner(owner).await.unwrap();

        store.primary().down.store(true, Ordering::SeqCst);
        let projects = store.list_projects_for_owner(owner).await.unwrap();
        assert_eq!(projects.len(), 2);
    }

    #[tokio::test]
    async fn failed_primary_without_snapshot_returns_error() {
        let owner = Uuid::new_v4();
        let store = seeded(owner).await;
        store.primary().down.store(true, Ordering::SeqCst);

        let err = store.list_timelines(owner).await.unwrap_err();
        assert_matches!(err, CoreError::Internal(_));
    }

    #[tokio::test]
    async fn snapshot_is_replaced_not_merged() {
        let owner = Uuid::new_v4();
        let store = seeded(owner).await;
        store
            .fallback()
            .replace_projects(owner, vec![summary(1), summary(2), summary(77)])
            .await;

        store.list_projects_for_owner(owner).await.unwrap();
        let cached = store.fallback().cached_projects(owner).await.unwrap();
        assert!(cached.iter().all(|p| p.id != 77));
    }

    #[tokio::test]
    async fn successful_write_is_cached_under_primary_id() {
        let owner = Uuid::new_v4();
        let store = seeded(owner).await;
        store.list_timelines(owner).await.unwrap();

        let id = store.put_timeline(owner, &skeleton(1)).await.unwrap();
        let cached = store.fallback().cached_timelines(owner).await.unwrap();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].id, id);

        store.primary().down.store(true, Ordering::SeqCst);
        let served = store.list_timelines(owner).await.unwrap();
        assert_eq!(served[0].timeline.project_id, 1);
    }

    #[tokio::test]
    async fn write_before_any_read_does_not_become_the_listing() {
        let owner = Uuid::new_v4();
        let store = seeded(owner).await;
        store
            .primary()
            .inner
            .replace_projects(owner, vec![summary(1), summary(2), summary(3)])
            .await;
        store.primary().inner.put_timeline(owner, &skeleton(1)).await.unwrap();
        store.primary().inner.put_timeline(owner, &skeleton(2)).await.unwrap();

        store.put_timeline(owner, &skeleton(3)).await.unwrap();
        assert!(store.fallback().cached_timelines(owner).await.is_none());

        store.primary().down.store(true, Ordering::SeqCst);
        let err = store.list_timelines(owner).await.unwrap_err();
        assert_matches!(err, CoreError::Internal(_));
    }

    #[tokio::test]
    async fn write_extends_snapshot_taken_before_outage() {
        let owner = Uuid::new_v4();
        let store = seeded(owner).await;
        store.primary().inner.put_timeline(owner, &skeleton(1)).await.unwrap();
        store.list_timelines(owner).await.unwrap();

        store.put_timeline(owner, &skeleton(2)).await.unwrap();
        store.primary().down.store(true, Ordering::SeqCst);

        let served = store.list_timelines(owner).await.unwrap();
        let projects: Vec<DbId> = served.iter().map(|t| t.timeline.project_id).collect();
        assert_eq!(projects, vec![1, 2]);
    }

    #[tokio::test]
    async fn cached_owner_count_tracks_fallback_snapshots() {
        let owner = Uuid::new_v4();
        let store = seeded(owner).await;
        assert_eq!(store.cached_owner_count().await, Some(0));

        store.list_timelines(owner).await.unwrap();
        assert_eq!(store.cached_owner_count().await, Some(1));
        assert_eq!(store.primary().cached_owner_count().await, None);
    }

    #[tokio::test]
    async fn failed_write_leaves_fallback_untouched() {
        let owner = Uuid::new_v4();
        let store = seeded(owner).await;
        store.primary().down.store(true, Ordering::SeqCst);

        assert!(store.put_timeline(owner, &skeleton(2)).await.is_err());
        assert!(store.fallback().cached_timelines(owner).await.is_none());
    }
}

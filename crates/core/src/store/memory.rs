//! In-process cache tier.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StoredTimeline, TimelineStore};
use crate::backfill::ProjectSummary;
use crate::error::CoreError;
use crate::timeline::TimelineSkeleton;
use crate::types::{DbId, OwnerId};

/// Per-owner snapshots of projects and timelines held in memory.
///
/// An owner with no snapshot is distinguishable from an owner with an empty
/// one, so a cold cache never masquerades as "no data".
#[derive(Debug)]
pub struct MemoryStore {
    projects: RwLock<HashMap<OwnerId, Vec<ProjectSummary>>>,
    timelines: RwLock<HashMap<OwnerId, Vec<StoredTimeline>>>,
    next_id: AtomicI64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            projects: RwLock::new(HashMap::new()),
            timelines: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Replace `owner`'s project snapshot wholesale.
    pub async fn replace_projects(&self, owner: OwnerId, projects: Vec<ProjectSummary>) {
        self.projects.write().await.insert(owner, projects);
    }

    /// Replace `owner`'s timeline snapshot wholesale.
    pub async fn replace_timelines(&self, owner: OwnerId, timelines: Vec<StoredTimeline>) {
        self.timelines.write().await.insert(owner, timelines);
    }

    /// Cached projects for `owner`, or `None` if nothing was ever cached.
    pub async fn cached_projects(&self, owner: OwnerId) -> Option<Vec<ProjectSummary>> {
        self.projects.read().await.get(&owner).cloned()
    }

    /// Cached timelines for `owner`, or `None` if nothing was ever cached.
    pub async fn cached_timelines(&self, owner: OwnerId) -> Option<Vec<StoredTimeline>> {
        self.timelines.read().await.get(&owner).cloned()
    }

    /// Insert or replace a timeline under an id assigned elsewhere.
    ///
    /// Only an existing snapshot is extended. Without one the write is
    /// dropped, since a single entry is not `owner`'s full list.
    pub async fn cache_timeline(&self, owner: OwnerId, stored: StoredTimeline) {
        let mut timelines = self.timelines.write().await;
        let Some(entries) = timelines.get_mut(&owner) else {
            return;
        };
        match entries.iter_mut().find(|t| t.id == stored.id) {
            Some(existing) => *existing = stored,
            None => entries.push(stored),
        }
    }
}

#[async_trait]
impl TimelineStore for MemoryStore {
    async fn list_projects_for_owner(
        &self,
        owner: OwnerId,
    ) -> Result<Vec<ProjectSummary>, CoreError> {
        Ok(self.cached_projects(owner).await.unwrap_or_default())
    }

    async fn list_timelines(&self, owner: OwnerId) -> Result<Vec<StoredTimeline>, CoreError> {
        Ok(self.cached_timelines(owner).await.unwrap_or_default())
    }

    async fn put_timeline(
        &self,
        owner: OwnerId,
        timeline: &TimelineSkeleton,
    ) -> Result<DbId, CoreError> {
        let owns_project = self
            .projects
            .read()
            .await
            .get(&owner)
            .is_some_and(|projects| projects.iter().any(|p| p.id == timeline.project_id));
        if !owns_project {
            return Err(CoreError::NotFound {
                entity: "Project",
                id: timeline.project_id,
            });
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.timelines
            .write()
            .await
            .entry(owner)
            .or_default()
            .push(StoredTimeline {
                id,
                timeline: timeline.clone(),
            });
        Ok(id)
    }

    async fn cached_owner_count(&self) -> Option<usize> {
        Some(self.timelines.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use uuid::Uuid;

    use super::*;
    use crate::lifecycle::ProjectStatus;
    use crate::timeline::generate_timeline;

    fn summary(id: DbId) -> ProjectSummary {
        ProjectSummary {
            id,
            start_date: None,
            status: ProjectStatus::Planning,
        }
    }

    fn skeleton(project_id: DbId) -> TimelineSkeleton {
        generate_timeline(
            project_id,
            None,
            ProjectStatus::Planning,
            "2024-01-01".parse().unwrap(),
        )
    }

    #[tokio::test]
    async fn put_assigns_increasing_ids() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        store.replace_projects(owner, vec![summary(1), summary(2)]).await;

        let a = store.put_timeline(owner, &skeleton(1)).await.unwrap();
        let b = store.put_timeline(owner, &skeleton(2)).await.unwrap();
        assert!(b > a);
        assert_eq!(store.list_timelines(owner).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn put_rejects_foreign_project() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        store.replace_projects(owner, vec![summary(1)]).await;

        let err = store.put_timeline(owner, &skeleton(99)).await.unwrap_err();
        assert_matches!(err, CoreError::NotFound { entity: "Project", id: 99 });
    }

    #[tokio::test]
    async fn cold_cache_is_distinguishable_from_empty() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        assert!(store.cached_projects(owner).await.is_none());

        store.replace_projects(owner, Vec::new()).await;
        assert_eq!(store.cached_projects(owner).await, Some(Vec::new()));
    }

    #[tokio::test]
    async fn cache_timeline_replaces_by_id() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        store.replace_timelines(owner, Vec::new()).await;
        store
            .cache_timeline(owner, StoredTimeline { id: 40, timeline: skeleton(1) })
            .await;
        store
            .cache_timeline(owner, StoredTimeline { id: 40, timeline: skeleton(2) })
            .await;

        let cached = store.cached_timelines(owner).await.unwrap();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].timeline.project_id, 2);
    }

    #[tokio::test]
    async fn cache_timeline_without_snapshot_stays_cold() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        store
            .cache_timeline(owner, StoredTimeline { id: 7, timeline: skeleton(1) })
            .await;

        assert!(store.cached_timelines(owner).await.is_none());
    }

    #[tokio::test]
    async fn timeline_for_project_uses_listing() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        store.replace_projects(owner, vec![summary(5)]).await;
        let id = store.put_timeline(owner, &skeleton(5)).await.unwrap();

        let found = store.timeline_for_project(owner, 5).await.unwrap();
        assert_eq!(found.map(|t| t.id), Some(id));
        assert!(store.timeline_for_project(owner, 6).await.unwrap().is_none());
    }
}

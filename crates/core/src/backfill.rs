//! Timeline backfill: give every project that lacks a timeline the default one.
//!
//! The pass is keyed purely by project id. Existing timelines are never
//! regenerated or modified, so running it again after a successful run
//! creates nothing. Two callers racing may both write a timeline for the same
//! project; that is not guarded against here.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::lifecycle::ProjectStatus;
use crate::store::TimelineStore;
use crate::timeline::{generate_timeline, TimelineSkeleton};
use crate::types::{Day, DbId, OwnerId};

/// The fields of a project that timeline generation depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: DbId,
    pub start_date: Option<Day>,
    pub status: ProjectStatus,
}

/// Outcome of a [`reconcile`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BackfillReport {
    pub projects_scanned: usize,
    pub timelines_existing: usize,
    /// Ids of the timelines written by this run, in project order.
    pub timelines_created: Vec<DbId>,
}

/// Projects whose id is not referenced by any timeline, each listed once.
pub fn projects_missing_timelines<'a>(
    projects: &'a [ProjectSummary],
    timelines: &[TimelineSkeleton],
) -> Vec<&'a ProjectSummary> {
    let mut covered: HashSet<DbId> = timelines.iter().map(|t| t.project_id).collect();
    projects
        .iter()
        .filter(|p| covered.insert(p.id))
        .collect()
}

/// Generate a default timeline for every project that lacks one.
pub fn plan_backfill(
    projects: &[ProjectSummary],
    timelines: &[TimelineSkeleton],
    today: Day,
) -> Vec<TimelineSkeleton> {
    projects_missing_timelines(projects, timelines)
        .into_iter()
        .map(|p| generate_timeline(p.id, p.start_date, p.status, today))
        .collect()
}

/// Append the planned timelines to `timelines`, leaving existing entries
/// untouched. Returns how many were added.
pub fn merge_backfill(
    timelines: &mut Vec<TimelineSkeleton>,
    projects: &[ProjectSummary],
    today: Day,
) -> usize {
    let planned = plan_backfill(projects, timelines, today);
    let added = planned.len();
    timelines.extend(planned);
    added
}

/// Run the backfill pass for one owner against a store.
///
/// Stops at the first failed write; timelines written before the failure stay
/// written and a later run picks up the rest.
pub async fn reconcile<S>(
    store: &S,
    owner: OwnerId,
    today: Day,
) -> Result<BackfillReport, CoreError>
where
    S: TimelineStore + ?Sized,
{
    let projects = store.list_projects_for_owner(owner).await?;
    let existing: Vec<TimelineSkeleton> = store
        .list_timelines(owner)
        .await?
        .into_iter()
        .map(|stored| stored.timeline)
        .collect();

    let planned = plan_backfill(&projects, &existing, today);
    let mut created = Vec::with_capacity(planned.len());
    for timeline in &planned {
        let id = store.put_timeline(owner, timeline).await?;
        tracing::debug!(project_id = timeline.project_id, timeline_id = id, "Backfilled timeline");
        created.push(id);
    }

    if !created.is_empty() {
        tracing::info!(%owner, created = created.len(), "Timeline backfill complete");
    }

    Ok(BackfillReport {
        projects_scanned: projects.len(),
        timelines_existing: existing.len(),
        timelines_created: created,
    })
}

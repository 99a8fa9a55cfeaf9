//! Repository for the `timelines`, `timeline_phases`, and `timeline_tasks`
//! tables.

use std::collections::HashMap;

use marro_core::timeline::{PhaseSkeleton, TimelineSkeleton};
use marro_core::types::{DbId, OwnerId};
use sqlx::PgPool;

use crate::models::timeline::{
    PhaseWithTasks, Timeline, TimelinePhase, TimelineTask, TimelineWithPhases,
    UpdateTimelinePhase, UpdateTimelineTask,
};

/// Column list for the `timelines` table, aliased `t`.
const COLUMNS: &str = "t.id, t.project_id, t.created_at, t.updated_at";

/// Column list for the `timeline_phases` table, aliased `ph`.
const PHASE_COLUMNS: &str = "ph.id, ph.timeline_id, ph.name, ph.start_date, ph.end_date, \
    ph.status, ph.order_index, ph.created_at, ph.updated_at";

/// Column list for the `timeline_tasks` table, aliased `tk`.
const TASK_COLUMNS: &str = "tk.id, tk.phase_id, tk.name, tk.completed, tk.due_date, \
    tk.order_index, tk.created_at, tk.updated_at";

/// Provides storage for project timelines and their phases and tasks.
pub struct TimelineRepo;

impl TimelineRepo {
    /// Insert a timeline with all of its phases and tasks in one transaction.
    ///
    /// Does not check ownership or whether the project already has a
    /// timeline; callers do.
    pub async fn create(pool: &PgPool, timeline: &TimelineSkeleton) -> Result<DbId, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (timeline_id,): (DbId,) =
            sqlx::query_as("INSERT INTO timelines (project_id) VALUES ($1) RETURNING id")
                .bind(timeline.project_id)
                .fetch_one(&mut *tx)
                .await?;

        Self::insert_phases_inner(&mut tx, timeline_id, &timeline.phases).await?;

        tx.commit().await?;
        Ok(timeline_id)
    }

    /// The first timeline of one of `owner`'s live projects, with children.
    pub async fn find_for_project(
        pool: &PgPool,
        owner: OwnerId,
        project_id: DbId,
    ) -> Result<Option<TimelineWithPhases>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM timelines t
             JOIN projects p ON p.id = t.project_id
             WHERE t.project_id = $1 AND p.owner_id = $2 AND p.deleted_at IS NULL
             ORDER BY t.id
             LIMIT 1"
        );
        let timeline = sqlx::query_as::<_, Timeline>(&query)
            .bind(project_id)
            .bind(owner)
            .fetch_optional(pool)
            .await?;

        match timeline {
            Some(timeline) => Ok(Self::with_children(pool, vec![timeline]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Every timeline attached to one of `owner`'s live projects.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner: OwnerId,
    ) -> Result<Vec<TimelineWithPhases>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM timelines t
             JOIN projects p ON p.id = t.project_id
             WHERE p.owner_id = $1 AND p.deleted_at IS NULL
             ORDER BY t.id"
        );
        let timelines = sqlx::query_as::<_, Timeline>(&query)
            .bind(owner)
            .fetch_all(pool)
            .await?;
        Self::with_children(pool, timelines).await
    }

    /// Every timeline referencing one of `project_ids`. Used by the portal,
    /// whose project list is already scoped to a single client.
    pub async fn list_for_projects(
        pool: &PgPool,
        project_ids: &[DbId],
    ) -> Result<Vec<TimelineWithPhases>, sqlx::Error> {
        if project_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM timelines t
             WHERE t.project_id = ANY($1)
             ORDER BY t.id"
        );
        let timelines = sqlx::query_as::<_, Timeline>(&query)
            .bind(project_ids)
            .fetch_all(pool)
            .await?;
        Self::with_children(pool, timelines).await
    }

    /// Replace every phase and task of a timeline in one transaction.
    pub async fn replace_phases(
        pool: &PgPool,
        timeline_id: DbId,
        phases: &[PhaseSkeleton],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Tasks go with their phases through ON DELETE CASCADE.
        sqlx::query("DELETE FROM timeline_phases WHERE timeline_id = $1")
            .bind(timeline_id)
            .execute(&mut *tx)
            .await?;

        Self::insert_phases_inner(&mut tx, timeline_id, phases).await?;

        sqlx::query("UPDATE timelines SET updated_at = NOW() WHERE id = $1")
            .bind(timeline_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Single phase / task access
    // -----------------------------------------------------------------------

    /// Find a phase belonging to one of `owner`'s live projects.
    pub async fn find_phase(
        pool: &PgPool,
        owner: OwnerId,
        phase_id: DbId,
    ) -> Result<Option<TimelinePhase>, sqlx::Error> {
        let query = format!(
            "SELECT {PHASE_COLUMNS} FROM timeline_phases ph
             JOIN timelines t ON t.id = ph.timeline_id
             JOIN projects p ON p.id = t.project_id
             WHERE ph.id = $1 AND p.owner_id = $2 AND p.deleted_at IS NULL"
        );
        sqlx::query_as::<_, TimelinePhase>(&query)
            .bind(phase_id)
            .bind(owner)
            .fetch_optional(pool)
            .await
    }

    /// Update a phase's name and/or status. Only non-`None` fields are applied.
    ///
    /// Callers check ownership with [`TimelineRepo::find_phase`] first.
    pub async fn update_phase(
        pool: &PgPool,
        phase_id: DbId,
        input: &UpdateTimelinePhase,
    ) -> Result<Option<TimelinePhase>, sqlx::Error> {
        let query = format!(
            "UPDATE timeline_phases ph SET
                name = COALESCE($2, ph.name),
                status = COALESCE($3, ph.status)
             WHERE ph.id = $1
             RETURNING {PHASE_COLUMNS}"
        );
        sqlx::query_as::<_, TimelinePhase>(&query)
            .bind(phase_id)
            .bind(&input.name)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Find the phase containing a task, scoped to `owner`'s live projects.
    pub async fn find_task_phase(
        pool: &PgPool,
        owner: OwnerId,
        task_id: DbId,
    ) -> Result<Option<TimelinePhase>, sqlx::Error> {
        let query = format!(
            "SELECT {PHASE_COLUMNS} FROM timeline_tasks tk
             JOIN timeline_phases ph ON ph.id = tk.phase_id
             JOIN timelines t ON t.id = ph.timeline_id
             JOIN projects p ON p.id = t.project_id
             WHERE tk.id = $1 AND p.owner_id = $2 AND p.deleted_at IS NULL"
        );
        sqlx::query_as::<_, TimelinePhase>(&query)
            .bind(task_id)
            .bind(owner)
            .fetch_optional(pool)
            .await
    }

    /// Update a task. Only non-`None` fields are applied.
    ///
    /// Callers check ownership and the due-date window with
    /// [`TimelineRepo::find_task_phase`] first.
    pub async fn update_task(
        pool: &PgPool,
        task_id: DbId,
        input: &UpdateTimelineTask,
    ) -> Result<Option<TimelineTask>, sqlx::Error> {
        let query = format!(
            "UPDATE timeline_tasks tk SET
                name = COALESCE($2, tk.name),
                completed = COALESCE($3, tk.completed),
                due_date = COALESCE($4, tk.due_date)
             WHERE tk.id = $1
             RETURNING {TASK_COLUMNS}"
        );
        sqlx::query_as::<_, TimelineTask>(&query)
            .bind(task_id)
            .bind(&input.name)
            .bind(input.completed)
            .bind(input.due_date)
            .fetch_optional(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Insert phases and their tasks within an existing transaction, keeping
    /// the slice order in `order_index`.
    async fn insert_phases_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        timeline_id: DbId,
        phases: &[PhaseSkeleton],
    ) -> Result<(), sqlx::Error> {
        for (phase_index, phase) in phases.iter().enumerate() {
            let (phase_id,): (DbId,) = sqlx::query_as(
                "INSERT INTO timeline_phases
                    (timeline_id, name, start_date, end_date, status, order_index)
                 VALUES ($1, $2, $3, $4, $5, $6)
                 RETURNING id",
            )
            .bind(timeline_id)
            .bind(&phase.name)
            .bind(phase.start_date)
            .bind(phase.end_date)
            .bind(phase.status.as_str())
            .bind(phase_index as i32)
            .fetch_one(&mut **tx)
            .await?;

            for (task_index, task) in phase.tasks.iter().enumerate() {
                sqlx::query(
                    "INSERT INTO timeline_tasks (phase_id, name, completed, due_date, order_index)
                     VALUES ($1, $2, $3, $4, $5)",
                )
                .bind(phase_id)
                .bind(&task.name)
                .bind(task.completed)
                .bind(task.due_date)
                .bind(task_index as i32)
                .execute(&mut **tx)
                .await?;
            }
        }
        Ok(())
    }

    /// Load phases and tasks for a batch of timelines with two queries and
    /// nest them, preserving the input order.
    async fn with_children(
        pool: &PgPool,
        timelines: Vec<Timeline>,
    ) -> Result<Vec<TimelineWithPhases>, sqlx::Error> {
        if timelines.is_empty() {
            return Ok(Vec::new());
        }
        let timeline_ids: Vec<DbId> = timelines.iter().map(|t| t.id).collect();

        let phase_query = format!(
            "SELECT {PHASE_COLUMNS} FROM timeline_phases ph
             WHERE ph.timeline_id = ANY($1)
             ORDER BY ph.timeline_id, ph.order_index, ph.id"
        );
        let phases = sqlx::query_as::<_, TimelinePhase>(&phase_query)
            .bind(&timeline_ids)
            .fetch_all(pool)
            .await?;

        let phase_ids: Vec<DbId> = phases.iter().map(|p| p.id).collect();
        let task_query = format!(
            "SELECT {TASK_COLUMNS} FROM timeline_tasks tk
             WHERE tk.phase_id = ANY($1)
             ORDER BY tk.phase_id, tk.order_index, tk.id"
        );
        let tasks = sqlx::query_as::<_, TimelineTask>(&task_query)
            .bind(&phase_ids)
            .fetch_all(pool)
            .await?;

        let mut tasks_by_phase: HashMap<DbId, Vec<TimelineTask>> = HashMap::new();
        for task in tasks {
            tasks_by_phase.entry(task.phase_id).or_default().push(task);
        }

        let mut phases_by_timeline: HashMap<DbId, Vec<PhaseWithTasks>> = HashMap::new();
        for phase in phases {
            let tasks = tasks_by_phase.remove(&phase.id).unwrap_or_default();
            phases_by_timeline
                .entry(phase.timeline_id)
                .or_default()
                .push(PhaseWithTasks { phase, tasks });
        }

        Ok(timelines
            .into_iter()
            .map(|timeline| TimelineWithPhases {
                phases: phases_by_timeline.remove(&timeline.id).unwrap_or_default(),
                timeline,
            })
            .collect())
    }
}

//! Timeline, phase, and task models and DTOs.
//!
//! A timeline is stored as three tables (`timelines`, `timeline_phases`,
//! `timeline_tasks`) and served nested: phases inside the timeline, tasks
//! inside each phase, both ordered by `order_index`.

use marro_core::error::CoreError;
use marro_core::lifecycle::PhaseStatus;
use marro_core::timeline::{validate_phases, PhaseSkeleton, TaskSkeleton, TimelineSkeleton};
use marro_core::types::{Day, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `timelines` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Timeline {
    pub id: DbId,
    pub project_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `timeline_phases` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TimelinePhase {
    pub id: DbId,
    pub timeline_id: DbId,
    pub name: String,
    pub start_date: Day,
    pub end_date: Day,
    pub status: String,
    pub order_index: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `timeline_tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TimelineTask {
    pub id: DbId,
    pub phase_id: DbId,
    pub name: String,
    pub completed: bool,
    pub due_date: Day,
    pub order_index: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A phase with its tasks.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseWithTasks {
    #[serde(flatten)]
    pub phase: TimelinePhase,
    pub tasks: Vec<TimelineTask>,
}

/// A timeline with its phases and their tasks.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineWithPhases {
    #[serde(flatten)]
    pub timeline: Timeline,
    pub phases: Vec<PhaseWithTasks>,
}

impl TimelineWithPhases {
    /// Convert the stored rows back into the core timeline value.
    pub fn to_skeleton(&self) -> Result<TimelineSkeleton, CoreError> {
        let phases = self
            .phases
            .iter()
            .map(|p| {
                let status: PhaseStatus = p.phase.status.parse().map_err(|_| {
                    CoreError::Internal(format!(
                        "Phase {} has unrecognised status '{}'",
                        p.phase.id, p.phase.status
                    ))
                })?;
                Ok(PhaseSkeleton {
                    name: p.phase.name.clone(),
                    start_date: p.phase.start_date,
                    end_date: p.phase.end_date,
                    status,
                    tasks: p
                        .tasks
                        .iter()
                        .map(|t| TaskSkeleton {
                            name: t.name.clone(),
                            completed: t.completed,
                            due_date: t.due_date,
                        })
                        .collect(),
                })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;

        Ok(TimelineSkeleton {
            project_id: self.timeline.project_id,
            phases,
        })
    }
}

/// One task in a [`ReplaceTimeline`] request.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskInput {
    pub name: String,
    #[serde(default)]
    pub completed: bool,
    pub due_date: Day,
}

/// One phase in a [`ReplaceTimeline`] request.
#[derive(Debug, Clone, Deserialize)]
pub struct PhaseInput {
    pub name: String,
    pub start_date: Day,
    pub end_date: Day,
    pub status: String,
    #[serde(default)]
    pub tasks: Vec<TaskInput>,
}

/// DTO replacing every phase and task of a timeline. Phase and task order
/// follow the request order.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplaceTimeline {
    pub phases: Vec<PhaseInput>,
}

impl ReplaceTimeline {
    /// Parse statuses and validate windows, producing core phase values.
    pub fn into_phases(self) -> Result<Vec<PhaseSkeleton>, CoreError> {
        if self.phases.is_empty() {
            return Err(CoreError::Validation(
                "A timeline needs at least one phase".to_string(),
            ));
        }

        let phases = self
            .phases
            .into_iter()
            .map(|p| {
                Ok(PhaseSkeleton {
                    status: p.status.parse()?,
                    name: p.name,
                    start_date: p.start_date,
                    end_date: p.end_date,
                    tasks: p
                        .tasks
                        .into_iter()
                        .map(|t| TaskSkeleton {
                            name: t.name,
                            completed: t.completed,
                            due_date: t.due_date,
                        })
                        .collect(),
                })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;

        validate_phases(&phases)?;
        Ok(phases)
    }
}

/// DTO for updating a single phase. Dates are changed through
/// [`ReplaceTimeline`] so task windows stay consistent.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTimelinePhase {
    pub name: Option<String>,
    pub status: Option<String>,
}

/// DTO for updating a single task.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTimelineTask {
    pub name: Option<String>,
    pub completed: Option<bool>,
    pub due_date: Option<Day>,
}

//! Default project timeline generation.
//!
//! A new project gets a four-phase skeleton laid out from its start date. The
//! layout comes from a phase template (name, day offsets, tasks); the
//! project's lifecycle status only decides which phases and tasks are marked
//! done. Generation is pure: the same `(start_date, status)` always yields the
//! same phase names, windows, and tasks.

use chrono::Days;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::lifecycle::{PhaseStatus, ProjectStatus};
use crate::types::{today_utc, Day, DbId};

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// One task of a phase template, due a fixed number of days after the
/// project start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskTemplate {
    pub name: &'static str,
    pub due_offset_days: u64,
}

/// One phase of a timeline template. Offsets are whole days from the project
/// start date; `end_offset_days` is inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTemplate {
    pub name: &'static str,
    pub start_offset_days: u64,
    pub end_offset_days: u64,
    pub tasks: &'static [TaskTemplate],
}

/// The canonical offset table: 0-7, 7-28, 28-35, 35-42.
pub const DEFAULT_PHASES: [PhaseTemplate; 4] = [
    PhaseTemplate {
        name: "Discovery & Planning",
        start_offset_days: 0,
        end_offset_days: 7,
        tasks: &[
            TaskTemplate {
                name: "Client requirements gathering",
                due_offset_days: 3,
            },
            TaskTemplate {
                name: "Project scope definition",
                due_offset_days: 5,
            },
        ],
    },
    PhaseTemplate {
        name: "Development",
        start_offset_days: 7,
        end_offset_days: 28,
        tasks: &[
            TaskTemplate {
                name: "Core development",
                due_offset_days: 21,
            },
            TaskTemplate {
                name: "Feature implementation",
                due_offset_days: 25,
            },
        ],
    },
    PhaseTemplate {
        name: "Testing & Review",
        start_offset_days: 28,
        end_offset_days: 35,
        tasks: &[
            TaskTemplate {
                name: "Quality assurance testing",
                due_offset_days: 31,
            },
            TaskTemplate {
                name: "Client review & feedback",
                due_offset_days: 34,
            },
        ],
    },
    PhaseTemplate {
        name: "Launch & Delivery",
        start_offset_days: 35,
        end_offset_days: 42,
        tasks: &[
            TaskTemplate {
                name: "Final deployment",
                due_offset_days: 38,
            },
            TaskTemplate {
                name: "Documentation & handover",
                due_offset_days: 41,
            },
        ],
    },
];

// ---------------------------------------------------------------------------
// Generated values
// ---------------------------------------------------------------------------

/// A checklist item inside a phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSkeleton {
    pub name: String,
    pub completed: bool,
    pub due_date: Day,
}

/// A named, time-boxed stage of a timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSkeleton {
    pub name: String,
    pub start_date: Day,
    pub end_date: Day,
    pub status: PhaseStatus,
    pub tasks: Vec<TaskSkeleton>,
}

/// A project timeline before (or independent of) persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineSkeleton {
    pub project_id: DbId,
    pub phases: Vec<PhaseSkeleton>,
}

impl TimelineSkeleton {
    /// Total number of tasks across all phases.
    pub fn task_count(&self) -> usize {
        self.phases.iter().map(|p| p.tasks.len()).sum()
    }

    /// Number of completed tasks across all phases.
    pub fn completed_task_count(&self) -> usize {
        self.phases
            .iter()
            .flat_map(|p| &p.tasks)
            .filter(|t| t.completed)
            .count()
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Add whole days to a date, saturating at the calendar maximum.
fn offset_date(start: Day, days: u64) -> Day {
    start.checked_add_days(Days::new(days)).unwrap_or(Day::MAX)
}

/// Status of phase `index` for a project in `status`.
fn phase_status(index: usize, status: ProjectStatus) -> PhaseStatus {
    match status.active_phase() {
        None => PhaseStatus::Completed,
        Some(active) if index < active => PhaseStatus::Completed,
        Some(active) if index == active => PhaseStatus::InProgress,
        Some(_) => PhaseStatus::Pending,
    }
}

/// Build a timeline from an arbitrary phase template.
///
/// A missing `start_date` is replaced by `today`.
pub fn generate_with_template(
    template: &[PhaseTemplate],
    project_id: DbId,
    start_date: Option<Day>,
    status: ProjectStatus,
    today: Day,
) -> TimelineSkeleton {
    let start = start_date.unwrap_or(today);

    let phases = template
        .iter()
        .enumerate()
        .map(|(index, phase)| {
            let status = phase_status(index, status);
            let completed = status == PhaseStatus::Completed;
            PhaseSkeleton {
                name: phase.name.to_string(),
                start_date: offset_date(start, phase.start_offset_days),
                end_date: offset_date(start, phase.end_offset_days),
                status,
                tasks: phase
                    .tasks
                    .iter()
                    .map(|task| TaskSkeleton {
                        name: task.name.to_string(),
                        completed,
                        due_date: offset_date(start, task.due_offset_days),
                    })
                    .collect(),
            }
        })
        .collect();

    TimelineSkeleton { project_id, phases }
}

/// Build the default four-phase timeline for a project.
pub fn generate_timeline(
    project_id: DbId,
    start_date: Option<Day>,
    status: ProjectStatus,
    today: Day,
) -> TimelineSkeleton {
    generate_with_template(&DEFAULT_PHASES, project_id, start_date, status, today)
}

/// [`generate_timeline`] with "today" taken from the UTC clock.
pub fn generate_timeline_now(
    project_id: DbId,
    start_date: Option<Day>,
    status: ProjectStatus,
) -> TimelineSkeleton {
    generate_timeline(project_id, start_date, status, today_utc())
}

// ---------------------------------------------------------------------------
// Derived values and validation
// ---------------------------------------------------------------------------

/// Percentage of completed tasks, rounded down. A timeline without tasks
/// reports 0.
///
/// Display only: the project's own `progress` field is never derived from it.
pub fn completion_percent(timeline: &TimelineSkeleton) -> u8 {
    let total = timeline.task_count();
    if total == 0 {
        return 0;
    }
    let done = timeline.completed_task_count();
    // done <= total, so the quotient is at most 100.
    u8::try_from(done * 100 / total).unwrap_or(100)
}

/// Validate user-edited phases: names present, windows ordered, and every
/// task due inside its phase window.
pub fn validate_phases(phases: &[PhaseSkeleton]) -> Result<(), CoreError> {
    for (index, phase) in phases.iter().enumerate() {
        let position = index + 1;
        if phase.name.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "Phase {position} must have a name"
            )));
        }
        if phase.start_date > phase.end_date {
            return Err(CoreError::Validation(format!(
                "Phase '{}' ends ({}) before it starts ({})",
                phase.name, phase.end_date, phase.start_date
            )));
        }
        for task in &phase.tasks {
            if task.name.trim().is_empty() {
                return Err(CoreError::Validation(format!(
                    "Every task in phase '{}' must have a name",
                    phase.name
                )));
            }
            validate_due_date(phase.start_date, phase.end_date, task.due_date)?;
        }
    }
    Ok(())
}

/// Validate that a task due date falls inside `[start, end]`.
pub fn validate_due_date(start: Day, end: Day, due: Day) -> Result<(), CoreError> {
    if (start..=end).contains(&due) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Task due date {due} is outside its phase window {start}..{end}"
        )))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

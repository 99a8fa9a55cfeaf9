//! Project entity model and DTOs.

use marro_core::backfill::ProjectSummary;
use marro_core::error::CoreError;
use marro_core::lifecycle::ProjectStatus;
use marro_core::types::{Day, DbId, OwnerId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub owner_id: OwnerId,
    pub client_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub progress: i16,
    pub start_date: Option<Day>,
    pub end_date: Option<Day>,
    pub budget: Option<f64>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    /// Parsed lifecycle status. The column is CHECK-constrained, so a parse
    /// failure means the schema and code disagree.
    pub fn lifecycle_status(&self) -> Result<ProjectStatus, CoreError> {
        self.status.parse().map_err(|_| {
            CoreError::Internal(format!(
                "Project {} has unrecognised status '{}'",
                self.id, self.status
            ))
        })
    }

    /// The fields timeline generation depends on.
    pub fn summary(&self) -> Result<ProjectSummary, CoreError> {
        Ok(ProjectSummary {
            id: self.id,
            start_date: self.start_date,
            status: self.lifecycle_status()?,
        })
    }
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    pub client_id: DbId,
    /// Defaults to `planning` if omitted.
    pub status: Option<String>,
    /// Defaults from the status if omitted.
    #[validate(range(min = 0, max = 100))]
    pub progress: Option<i16>,
    pub start_date: Option<Day>,
    pub end_date: Option<Day>,
    #[validate(range(min = 0.0))]
    pub budget: Option<f64>,
}

/// DTO for updating an existing project. All fields are optional.
///
/// `status` and `progress` are independent: changing one never rewrites the
/// other or the project's timeline.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProject {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    #[validate(range(min = 0, max = 100))]
    pub progress: Option<i16>,
    pub start_date: Option<Day>,
    pub end_date: Option<Day>,
    #[validate(range(min = 0.0))]
    pub budget: Option<f64>,
}

//! Lifecycle vocabularies for clients, projects, and timeline phases.
//!
//! Each status is stored as TEXT in the database and travels as the same
//! lowercase kebab-case string over the API. Parsing an unknown string is a
//! validation error rather than a silent default.

use crate::error::CoreError;
use crate::types::Day;

macro_rules! define_text_status {
    (
        $(#[$meta:meta])*
        $name:ident ($label:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            serde::Serialize, serde::Deserialize,
        )]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant ),+
        }

        impl $name {
            /// Every variant, in lifecycle order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The string stored in the database and used on the wire.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok($name::$variant), )+
                    other => Err(CoreError::Validation(format!(
                        "Unknown {}: '{other}'. Valid values: {}",
                        $label,
                        [$($text),+].join(", ")
                    ))),
                }
            }
        }
    };
}

define_text_status! {
    /// Coarse project lifecycle driving which timeline phases are complete.
    ProjectStatus ("project status") {
        Planning = "planning",
        InProgress = "in-progress",
        Review = "review",
        Completed = "completed",
    }
}

define_text_status! {
    /// Progress marker of a single timeline phase.
    PhaseStatus ("phase status") {
        Pending = "pending",
        InProgress = "in-progress",
        Completed = "completed",
    }
}

define_text_status! {
    /// Relationship state between an agency and one of its clients.
    ClientStatus ("client status") {
        Active = "active",
        Inactive = "inactive",
        Pending = "pending",
    }
}

define_text_status! {
    /// What a message between agency and client is about.
    MessageKind ("message type") {
        Update = "update",
        Feedback = "feedback",
        Approval = "approval",
        Question = "question",
    }
}

define_text_status! {
    /// Read state of a message.
    MessageStatus ("message status") {
        Unread = "unread",
        Read = "read",
        Responded = "responded",
    }
}

define_text_status! {
    /// Granularity of a recorded analytics metric.
    MetricPeriod ("metric period") {
        Daily = "daily",
        Weekly = "weekly",
        Monthly = "monthly",
    }
}

impl ProjectStatus {
    /// Index of the phase currently being worked on, or `None` once the
    /// project is completed and every phase is done.
    pub fn active_phase(self) -> Option<usize> {
        match self {
            Self::Planning => Some(0),
            Self::InProgress => Some(1),
            Self::Review => Some(2),
            Self::Completed => None,
        }
    }

    /// Progress percentage suggested for a new project in this status.
    ///
    /// Only used when the caller does not supply a progress value; the two
    /// fields are edited independently afterwards.
    pub fn default_progress(self) -> i16 {
        match self {
            Self::Planning => 0,
            Self::InProgress => 50,
            Self::Review => 80,
            Self::Completed => 100,
        }
    }
}

impl Default for ProjectStatus {
    fn default() -> Self {
        Self::Planning
    }
}

impl Default for ClientStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl Default for MessageStatus {
    fn default() -> Self {
        Self::Unread
    }
}

/// Largest accepted progress percentage.
pub const MAX_PROGRESS: i16 = 100;

/// Validate that a progress percentage lies within `0..=100`.
pub fn validate_progress(progress: i16) -> Result<(), CoreError> {
    if (0..=MAX_PROGRESS).contains(&progress) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Progress must be between 0 and {MAX_PROGRESS}, got {progress}"
        )))
    }
}

/// Validate that a project's end date, when both are set, is not before its
/// start date.
pub fn validate_schedule(start: Option<Day>, end: Option<Day>) -> Result<(), CoreError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(CoreError::Validation(format!(
            "End date {end} is before start date {start}"
        ))),
        _ => Ok(()),
    }
}

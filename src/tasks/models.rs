//! Model types for the task tracker.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Task status.
///
/// Statuses only move forward along `Pending -> InProgress -> Completed`;
/// the transition operations on the service enforce this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Task has been created but not started (default).
    #[default]
    #[serde(rename = "PENDIENTE")]
    Pending,
    /// Task is being worked on.
    #[serde(rename = "EN_PROGRESO")]
    InProgress,
    /// Task is finished.
    #[serde(rename = "COMPLETADA")]
    Completed,
}

impl TaskStatus {
    /// Parse a status from its wire string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not one of the three statuses.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, InvalidStatus> {
        match s {
            "PENDIENTE" => Ok(Self::Pending),
            "EN_PROGRESO" => Ok(Self::InProgress),
            "COMPLETADA" => Ok(Self::Completed),
            _ => Err(InvalidStatus(s.to_string())),
        }
    }

    /// Get the wire string for the status. This is also the value stored
    /// in the `status` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDIENTE",
            Self::InProgress => "EN_PROGRESO",
            Self::Completed => "COMPLETADA",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid status string is provided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidStatus(pub String);

impl std::fmt::Display for InvalidStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid status: '{}' (must be one of: PENDIENTE, EN_PROGRESO, COMPLETADA)",
            self.0
        )
    }
}

impl std::error::Error for InvalidStatus {}

/// Sentinel id for a task that has not been persisted yet.
///
/// The store assigns the real id on insert; this value never appears on
/// the wire for a stored task.
pub const UNASSIGNED_ID: i64 = 0;

/// A stored task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier, assigned by the store on insert.
    pub id: i64,
    /// Short title describing the task.
    pub title: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Date the task was created. Stamped once, never updated.
    pub creation_date: NaiveDate,
    /// Optional due date. No relationship to `creation_date` is enforced.
    pub due_date: Option<NaiveDate>,
    /// Current status.
    pub status: TaskStatus,
}

impl Task {
    /// Check if the task has been persisted (has a store-assigned id).
    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        self.id != UNASSIGNED_ID
    }
}

/// An incoming task body for create and update requests.
///
/// `id`, `creation_date` and `status` are optional so the service can
/// detect client attempts to set them: create ignores all three, update
/// rejects a mismatching `id` and any non-null `creation_date`/`status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    /// Client-supplied id, ignored on create and cross-checked on update.
    #[serde(default)]
    pub id: Option<i64>,
    /// Short title describing the task. Required.
    pub title: String,
    /// Optional longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// Creation date. Must be absent or null on update.
    #[serde(default)]
    pub creation_date: Option<NaiveDate>,
    /// Optional due date.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Status. Must be absent or null on update.
    #[serde(default)]
    pub status: Option<TaskStatus>,
}

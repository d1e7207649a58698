//! Task models: active tasks and the append-only completion log.

use serde::{Deserialize, Serialize};

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Task status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

/// A task inside the user's active list.
///
/// Ids are millisecond timestamps taken at creation, unique within one
/// user's list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: String,
    pub subject: String,
    pub priority: Priority,
    pub status: TaskStatus,
    pub created_at: String,
}

/// Derived from a [`Task`] at the moment of completion. Append-only;
/// never mutated or removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedTaskRecord {
    pub task_id: i64,
    pub title: String,
    pub subject: String,
    pub completed_at: String,
    /// `YYYY-MM-DD`
    pub day_completed: String,
}

//! Active task list reconciliation.
//!
//! Completion runs a small per-task state machine:
//!
//! ```text
//! pending ──mark_complete──▶ pending-removal ──commit_removal──▶ removed
//!                                   │
//!                             abort_removal
//!                                   ▼
//!                                pending
//! ```
//!
//! While a task is pending removal it stays addressable (the UI renders it
//! mid-transition) but cannot be completed again. The caller performs the
//! remote compound write between `mark_complete` and `commit_removal`, and
//! aborts on failure so the task survives locally and can be retried.
//! Invariant: a task id is in at most one of {active list, completed list}
//! once the write resolves.

use chrono::{DateTime, Utc};

use crate::models::{CompletedTaskRecord, Task, TaskStatus};
use crate::time_utils::{day_key, format_utc_rfc3339};

/// In-memory mirror of the remote `tasks` array field.
#[derive(Debug, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
    pending_removal: Vec<i64>,
}

impl TaskList {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            pending_removal: Vec::new(),
        }
    }

    /// All tasks still addressable, including those marked for removal.
    pub fn active(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn is_pending_removal(&self, id: i64) -> bool {
        self.pending_removal.contains(&id)
    }

    /// Append a new task.
    pub fn add(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Mark a pending task complete and derive its completion record.
    ///
    /// Returns `None` for unknown ids, tasks already marked, and tasks
    /// already completed; re-invocation during the removal window is a
    /// no-op rather than a double completion.
    pub fn mark_complete(&mut self, id: i64, now: DateTime<Utc>) -> Option<CompletedTaskRecord> {
        let task = self.tasks.iter().find(|t| t.id == id)?;
        if task.status == TaskStatus::Completed || self.is_pending_removal(id) {
            return None;
        }

        self.pending_removal.push(id);
        Some(CompletedTaskRecord {
            task_id: task.id,
            title: task.title.clone(),
            subject: task.subject.clone(),
            completed_at: format_utc_rfc3339(now),
            day_completed: day_key(now),
        })
    }

    /// The remote write resolved: evict the task from the active list.
    pub fn commit_removal(&mut self, id: i64) -> Option<Task> {
        self.pending_removal.retain(|&p| p != id);
        let idx = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(idx))
    }

    /// The remote write failed: the task returns to `pending` untouched
    /// so the caller can retry.
    pub fn abort_removal(&mut self, id: i64) {
        self.pending_removal.retain(|&p| p != id);
    }
}

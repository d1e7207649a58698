// SPDX-License-Identifier: MIT

//! Task routes: list, add, complete.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{CompletedTaskRecord, Priority, Task, TaskStatus};
use crate::reconcile::TaskList;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/tasks", get(list_tasks))
        .route("/api/tasks", post(add_task))
        .route("/api/tasks/{id}/complete", post(complete_task))
}

#[derive(Serialize)]
pub struct TasksResponse {
    pub tasks: Vec<Task>,
}

/// List active tasks. A missing document renders as an empty list, the
/// screen just shows its default state.
async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<TasksResponse>> {
    let tasks = match state.db.get_profile(&user.uid).await {
        Ok(Some(profile)) => profile.tasks,
        Ok(None) => Vec::new(),
        Err(e) => {
            tracing::error!(uid = %user.uid, error = %e, "Error fetching tasks");
            Vec::new()
        }
    };

    Ok(Json(TasksResponse { tasks }))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddTaskRequest {
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1))]
    pub due_date: String,
    #[validate(length(min = 1))]
    pub subject: String,
    pub priority: Priority,
}

#[derive(Serialize)]
pub struct AddTaskResponse {
    pub task: Task,
    pub tasks: Vec<Task>,
}

/// Create a task and union-append it to the active list.
async fn add_task(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<AddTaskRequest>,
) -> Result<Json<AddTaskResponse>> {
    payload
        .validate()
        .map_err(|_| AppError::Validation("Please fill in all required fields".to_string()))?;

    let profile = state
        .db
        .get_profile(&user.uid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.uid)))?;

    let now = chrono::Utc::now();
    let task = Task {
        id: now.timestamp_millis(),
        title: payload.title,
        description: payload.description,
        due_date: payload.due_date,
        subject: payload.subject,
        priority: payload.priority,
        status: TaskStatus::Pending,
        created_at: format_utc_rfc3339(now),
    };

    let mut list = TaskList::new(profile.tasks);
    list.add(task.clone());

    state.db.append_task(&user.uid, &task).await?;
    tracing::debug!(uid = %user.uid, task_id = task.id, "Task added");

    Ok(Json(AddTaskResponse {
        task,
        tasks: list.active().to_vec(),
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteTaskResponse {
    pub record: CompletedTaskRecord,
    pub tasks: Vec<Task>,
}

/// Complete a task.
///
/// The in-memory list marks the task for removal, the compound write is
/// awaited, and only its outcome decides whether the task leaves the
/// active list. A failed write leaves the task pending so the client can
/// retry.
async fn complete_task(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<CompleteTaskResponse>> {
    let profile = state
        .db
        .get_profile(&user.uid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.uid)))?;

    let mut list = TaskList::new(profile.tasks);
    let now = chrono::Utc::now();

    let task = list
        .get(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Task {} not found", id)))?;
    let record = list
        .mark_complete(id, now)
        .ok_or_else(|| AppError::NotFound(format!("Task {} not found", id)))?;

    match state.db.complete_task(&user.uid, &task, &record).await {
        Ok(()) => {
            let _ = list.commit_removal(id);
            tracing::info!(uid = %user.uid, task_id = id, "Task completed");
            Ok(Json(CompleteTaskResponse {
                record,
                tasks: list.active().to_vec(),
            }))
        }
        Err(e) => {
            list.abort_removal(id);
            tracing::error!(uid = %user.uid, task_id = id, error = %e, "Error updating task status");
            Err(e)
        }
    }
}

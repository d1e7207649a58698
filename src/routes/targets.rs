// SPDX-License-Identifier: MIT

//! Study target routes: list, add, toggle, delete.
//!
//! Every mutation rewrites the whole `targets` array; the response body
//! is the list that was sent, which is what the remote holds until
//! another writer interleaves.

use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::db::fields;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::Target;
use crate::reconcile::TargetList;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/targets", get(list_targets))
        .route("/api/targets", post(add_target))
        .route("/api/targets/{id}/toggle", post(toggle_target))
        .route("/api/targets/{id}", delete(delete_target))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetsResponse {
    pub targets: Vec<Target>,
    pub completed_count: usize,
}

fn respond(list: &TargetList) -> Json<TargetsResponse> {
    Json(TargetsResponse {
        targets: list.all().to_vec(),
        completed_count: list.completed_count(),
    })
}

/// Whole-list rewrite of the `targets` field.
#[derive(Serialize)]
struct TargetsWrite<'a> {
    targets: &'a [Target],
}

async fn write_targets(state: &AppState, uid: &str, list: &TargetList) -> Result<()> {
    state
        .db
        .update_fields(uid, [fields::TARGETS], &TargetsWrite { targets: list.all() })
        .await
}

/// List study targets. Missing document renders as an empty list.
async fn list_targets(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<TargetsResponse>> {
    let targets = match state.db.get_profile(&user.uid).await {
        Ok(Some(profile)) => profile.targets,
        Ok(None) => Vec::new(),
        Err(e) => {
            tracing::error!(uid = %user.uid, error = %e, "Error fetching targets");
            Vec::new()
        }
    };

    Ok(respond(&TargetList::new(targets)))
}

#[derive(Deserialize, Validate)]
pub struct AddTargetRequest {
    #[validate(length(min = 1))]
    pub text: String,
}

/// Create a target.
async fn add_target(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<AddTargetRequest>,
) -> Result<Json<TargetsResponse>> {
    payload
        .validate()
        .map_err(|_| AppError::Validation("Target text must not be empty".to_string()))?;

    let profile = state
        .db
        .get_profile(&user.uid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.uid)))?;

    let mut list = TargetList::new(profile.targets);
    list.add(&payload.text, chrono::Utc::now())
        .ok_or_else(|| AppError::Validation("Target text must not be empty".to_string()))?;

    write_targets(&state, &user.uid, &list).await?;
    Ok(respond(&list))
}

/// Toggle a target's completed flag.
async fn toggle_target(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<TargetsResponse>> {
    let profile = state
        .db
        .get_profile(&user.uid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.uid)))?;

    let mut list = TargetList::new(profile.targets);
    if !list.toggle(id) {
        return Err(AppError::NotFound(format!("Target {} not found", id)));
    }

    write_targets(&state, &user.uid, &list).await?;
    Ok(respond(&list))
}

/// Delete a target.
async fn delete_target(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<TargetsResponse>> {
    let profile = state
        .db
        .get_profile(&user.uid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.uid)))?;

    let mut list = TargetList::new(profile.targets);
    if !list.delete(id) {
        return Err(AppError::NotFound(format!("Target {} not found", id)));
    }

    write_targets(&state, &user.uid, &list).await?;
    Ok(respond(&list))
}

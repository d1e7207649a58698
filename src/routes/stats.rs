// SPDX-License-Identifier: MIT

//! Statistics route: pure aggregation over the fetched document.

use axum::{extract::State, routing::get, Extension, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::reconcile::stats::{
    category_counts, daily_focus, weekly_performance, CategoryCount, DailyFocus, WeeklyBucket,
};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/stats", get(get_stats))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub weekly: Vec<WeeklyBucket>,
    pub focus: Vec<DailyFocus>,
    pub categories: Vec<CategoryCount>,
}

/// Study statistics for the current user.
///
/// A missing or unreadable document renders empty charts, the screen
/// keeps its default state.
async fn get_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<StatsResponse>> {
    let profile = match state.db.get_profile(&user.uid).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!(uid = %user.uid, error = %e, "Error fetching statistics");
            None
        }
    };

    let Some(profile) = profile else {
        return Ok(Json(StatsResponse {
            weekly: Vec::new(),
            focus: Vec::new(),
            categories: Vec::new(),
        }));
    };

    let today = chrono::Utc::now();
    Ok(Json(StatsResponse {
        weekly: weekly_performance(&profile.tasks, &profile.completed_tasks, today),
        focus: daily_focus(&profile.focus_sessions),
        categories: category_counts(&profile.tasks),
    }))
}

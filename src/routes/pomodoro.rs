// SPDX-License-Identifier: MIT

//! Pomodoro routes.
//!
//! The server hosts one timer per user and advances it lazily: every
//! request catches the countdown up by the whole seconds elapsed since
//! the previous one. Expiries collected during catch-up append their
//! focus sessions remotely; a failed append is logged and the timer
//! proceeds regardless, the countdown never suspends anything else.

use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::FocusSession;
use crate::reconcile::{Mode, Pomodoro};
use crate::AppState;

/// Per-user timers, keyed by uid.
pub type PomodoroRegistry = Arc<DashMap<String, PomodoroEntry>>;

#[derive(Debug, Clone)]
pub struct PomodoroEntry {
    pub timer: Pomodoro,
    pub last_tick: DateTime<Utc>,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/pomodoro", get(snapshot))
        .route("/api/pomodoro/start", post(start))
        .route("/api/pomodoro/pause", post(pause))
        .route("/api/pomodoro/reset", post(reset))
        .route("/api/pomodoro/adjust", post(adjust))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroSnapshot {
    pub mode: Mode,
    pub remaining_secs: u32,
    pub running: bool,
    pub session_minutes: u32,
    pub break_minutes: u32,
    pub sessions_completed_today: u32,
    /// True when an expiry fired since the last request; the client plays
    /// the notification sound.
    pub chimed: bool,
}

fn snapshot_of(timer: &Pomodoro, chimed: bool) -> PomodoroSnapshot {
    PomodoroSnapshot {
        mode: timer.mode(),
        remaining_secs: timer.remaining_secs(),
        running: timer.is_running(),
        session_minutes: timer.session_minutes(),
        break_minutes: timer.break_minutes(),
        sessions_completed_today: timer.sessions_completed(),
        chimed,
    }
}

/// Fetch the user's timer, creating one seeded from their persisted
/// preferences on first use.
async fn ensure_timer(state: &AppState, uid: &str) {
    if state.pomodoros.contains_key(uid) {
        return;
    }

    // Best-effort: a missing or unreadable profile falls back to defaults
    let prefs = match state.db.get_profile(uid).await {
        Ok(Some(profile)) => profile.preferences,
        Ok(None) => Default::default(),
        Err(e) => {
            tracing::warn!(uid, error = %e, "Preferences unavailable, using timer defaults");
            Default::default()
        }
    };

    state.pomodoros.entry(uid.to_string()).or_insert(PomodoroEntry {
        timer: Pomodoro::new(prefs.focus_time, prefs.break_time),
        last_tick: Utc::now(),
    });
}

/// Advance the timer by wall-clock elapsed seconds and collect any focus
/// sessions completed along the way. The dashmap guard is dropped before
/// any remote write.
fn advance_timer(
    state: &AppState,
    uid: &str,
    mutate: impl FnOnce(&mut Pomodoro) -> Result<()>,
) -> (Result<PomodoroSnapshot>, Vec<FocusSession>) {
    let now = Utc::now();
    let Some(mut entry) = state.pomodoros.get_mut(uid) else {
        return (
            Err(AppError::NotFound("Timer not initialized".to_string())),
            Vec::new(),
        );
    };

    let elapsed = now
        .signed_duration_since(entry.last_tick)
        .num_seconds()
        .max(0) as u64;
    let transitions = entry.timer.advance(elapsed, now);
    entry.last_tick = now;

    let chimed = transitions.iter().any(|t| t.chime);
    let completed: Vec<FocusSession> = transitions.into_iter().filter_map(|t| t.completed).collect();

    // Sessions completed during catch-up are recorded even when the
    // requested mutation is rejected.
    let snapshot = match mutate(&mut entry.timer) {
        Ok(()) => Ok(snapshot_of(&entry.timer, chimed)),
        Err(e) => Err(e),
    };
    (snapshot, completed)
}

/// Record completed focus sessions; failures are logged, never surfaced.
async fn record_sessions(state: &AppState, uid: &str, sessions: Vec<FocusSession>) {
    for session in sessions {
        if let Err(e) = state.db.append_focus_session(uid, &session).await {
            tracing::error!(uid, error = %e, "Error updating session data");
        }
    }
}

async fn run(
    state: Arc<AppState>,
    uid: String,
    mutate: impl FnOnce(&mut Pomodoro) -> Result<()>,
) -> Result<Json<PomodoroSnapshot>> {
    ensure_timer(&state, &uid).await;
    let (snapshot, completed) = advance_timer(&state, &uid, mutate);
    record_sessions(&state, &uid, completed).await;
    snapshot.map(Json)
}

async fn snapshot(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<PomodoroSnapshot>> {
    run(state, user.uid, |_| Ok(())).await
}

async fn start(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<PomodoroSnapshot>> {
    run(state, user.uid, |timer| {
        timer.start();
        Ok(())
    })
    .await
}

async fn pause(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<PomodoroSnapshot>> {
    run(state, user.uid, |timer| {
        timer.pause();
        Ok(())
    })
    .await
}

async fn reset(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<PomodoroSnapshot>> {
    run(state, user.uid, |timer| {
        timer.reset();
        Ok(())
    })
    .await
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustKind {
    Session,
    Break,
}

#[derive(Deserialize)]
pub struct AdjustRequest {
    pub kind: AdjustKind,
    pub delta: i32,
}

async fn adjust(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<AdjustRequest>,
) -> Result<Json<PomodoroSnapshot>> {
    run(state, user.uid, move |timer| {
        let adjusted = match payload.kind {
            AdjustKind::Session => timer.adjust_session(payload.delta),
            AdjustKind::Break => timer.adjust_break(payload.delta),
        };
        adjusted
            .map(|_| ())
            .ok_or_else(|| AppError::Validation("Cannot adjust while the timer is running".to_string()))
    })
    .await
}

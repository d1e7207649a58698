// SPDX-License-Identifier: MIT

//! Profile routes: student setup, the profile summary, settings, and the
//! daily quote.

use axum::{
    extract::State,
    routing::{get, post, put},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::gate::{self, Screen};
use crate::middleware::auth::AuthUser;
use crate::models::{Notifications, Preferences, UserProfile};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/setup", post(setup))
        .route("/api/me", get(get_me))
        .route("/api/quote", get(get_quote))
        .route("/api/settings", get(get_settings))
        .route("/api/settings", put(save_settings))
}

// ─── Student Setup ───────────────────────────────────────────

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetupRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub display_name: String,
    #[validate(length(min = 1))]
    pub school: String,
    #[validate(length(min = 1))]
    pub grade: String,
    #[validate(length(min = 1))]
    pub country: String,
    #[validate(length(min = 1))]
    pub subjects: Vec<String>,
}

#[derive(Serialize)]
pub struct SetupResponse {
    pub uid: String,
    pub next: &'static str,
}

/// Create the profile document at setup completion. Runs once: an
/// existing document short-circuits to the dashboard untouched.
async fn setup(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    jar: CookieJar,
    Json(payload): Json<SetupRequest>,
) -> Result<(CookieJar, Json<SetupResponse>)> {
    payload.validate().map_err(|_| {
        AppError::Validation(
            "Please fill in all fields and select at least one subject".to_string(),
        )
    })?;

    if state.db.get_profile(&user.uid).await?.is_none() {
        let profile = UserProfile::new_from_setup(
            user.uid.clone(),
            payload.email,
            payload.display_name,
            payload.school,
            payload.grade,
            payload.country,
            payload.subjects,
            chrono::Utc::now(),
        );

        state.db.set_profile(&profile).await?;
        tracing::info!(uid = %user.uid, "Profile created");
    }

    let jar = gate::set_flag(jar, gate::ACCOUNT_SETUP);
    Ok((
        jar,
        Json(SetupResponse {
            uid: user.uid,
            next: Screen::Dashboard.path(),
        }),
    ))
}

// ─── Profile Summary ─────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub display_name: String,
    pub school: String,
    pub grade: String,
    pub total_tasks: usize,
    pub completed_tasks: u32,
    pub focus_sessions: usize,
}

/// Get the current user's profile summary.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProfileSummary>> {
    let profile = state
        .db
        .get_profile(&user.uid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.uid)))?;

    Ok(Json(ProfileSummary {
        display_name: profile.display_name,
        school: profile.school,
        grade: profile.grade,
        total_tasks: profile.tasks.len(),
        completed_tasks: profile.total_tasks_completed,
        focus_sessions: profile.focus_sessions.len(),
    }))
}

// ─── Quote ───────────────────────────────────────────────────

#[derive(Serialize)]
pub struct QuoteResponse {
    pub quote: String,
}

/// A short inspirational string; degrades to the fallback, never fails.
async fn get_quote(State(state): State<Arc<AppState>>) -> Json<QuoteResponse> {
    Json(QuoteResponse {
        quote: state.quotes.random_quote().await,
    })
}

// ─── Settings ────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub display_name: String,
    pub email: String,
    pub school: String,
    pub grade: String,
    pub notifications: Notifications,
    pub preferences: Preferences,
}

/// Current settings: local defaults overlaid with any persisted values.
async fn get_settings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SettingsResponse>> {
    let profile = state
        .db
        .get_profile(&user.uid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.uid)))?;

    Ok(Json(SettingsResponse {
        display_name: profile.display_name,
        email: profile.email,
        school: profile.school,
        grade: profile.grade,
        notifications: profile.notifications,
        preferences: profile.preferences,
    }))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaveSettingsRequest {
    #[validate(length(min = 1))]
    pub display_name: String,
    pub school: String,
    pub grade: String,
    pub notifications: Notifications,
    #[validate(nested)]
    pub preferences: PreferencesPayload,
    /// Provider-issued token; when present the display name is pushed to
    /// the identity provider as well.
    #[serde(default)]
    pub id_token: Option<String>,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesPayload {
    pub dark_mode: bool,
    #[validate(range(min = 1, max = 60))]
    pub focus_time: u32,
    #[validate(range(min = 1, max = 60))]
    pub break_time: u32,
    #[validate(range(min = 1))]
    pub daily_goal: u32,
}

/// Persist settings onto the profile document.
async fn save_settings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<SaveSettingsRequest>,
) -> Result<Json<SettingsResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let profile = state
        .db
        .get_profile(&user.uid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.uid)))?;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct SettingsWrite<'a> {
        display_name: &'a str,
        school: &'a str,
        grade: &'a str,
        notifications: &'a Notifications,
        preferences: Preferences,
        updated_at: String,
    }

    let preferences = Preferences {
        dark_mode: payload.preferences.dark_mode,
        focus_time: payload.preferences.focus_time,
        break_time: payload.preferences.break_time,
        daily_goal: payload.preferences.daily_goal,
    };

    let write = SettingsWrite {
        display_name: &payload.display_name,
        school: &payload.school,
        grade: &payload.grade,
        notifications: &payload.notifications,
        preferences: preferences.clone(),
        updated_at: format_utc_rfc3339(chrono::Utc::now()),
    };

    state
        .db
        .update_fields(
            &user.uid,
            [
                "displayName",
                "school",
                "grade",
                "notifications",
                "preferences",
                "updatedAt",
            ],
            &write,
        )
        .await?;

    // Display name also lives on the provider profile; a failure here is
    // logged, the document stays authoritative for the app.
    if let Some(id_token) = &payload.id_token {
        if let Err(e) = state
            .identity
            .update_display_name(id_token, &payload.display_name)
            .await
        {
            tracing::warn!(uid = %user.uid, error = %e, "Provider display-name update failed");
        }
    }

    Ok(Json(SettingsResponse {
        display_name: payload.display_name,
        email: profile.email,
        school: payload.school,
        grade: payload.grade,
        notifications: payload.notifications,
        preferences,
    }))
}

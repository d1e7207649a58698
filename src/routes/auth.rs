// SPDX-License-Identifier: MIT

//! Account routes: onboarding, signup, login, logout, and the navigation
//! gate.
//!
//! On a successful provider sign-in/sign-up the service mints its own
//! session JWT and sets the flag cookies; logout clears them. The gate
//! endpoint re-derives the target screen from (identity, flags) on every
//! call.

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::gate::{self, Screen, SessionFlags};
use crate::middleware::auth::{create_jwt, Claims, SESSION_COOKIE};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/onboard", post(onboard))
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/gate", get(gate_decision))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub uid: String,
    pub display_name: String,
    /// Path of the screen the client should show next.
    pub next: &'static str,
}

#[derive(Serialize)]
pub struct NextResponse {
    pub next: &'static str,
}

// ─── Onboarding ──────────────────────────────────────────────

/// The welcome screen's "get started" action.
async fn onboard(jar: CookieJar) -> (CookieJar, Json<NextResponse>) {
    let jar = gate::set_flag(jar, gate::ONBOARDED);
    (
        jar,
        Json(NextResponse {
            next: Screen::CreateAccount.path(),
        }),
    )
}

// ─── Signup ──────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Create an account with the identity provider and open a session.
async fn signup(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<SignupRequest>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    payload
        .validate()
        .map_err(|_| AppError::Validation("Please fill in all fields".to_string()))?;

    let identity = state
        .identity
        .sign_up(&payload.email, &payload.password)
        .await?;

    state
        .identity
        .update_display_name(&identity.id_token, &payload.name)
        .await?;

    tracing::info!(uid = %identity.uid, "Account created");

    let jar = open_session(jar, &identity.uid, &state.config.jwt_signing_key)?;
    let jar = gate::set_flag(jar, gate::ACCOUNT_CREATED);
    let jar = gate::set_flag(jar, gate::LOGGED_IN);

    Ok((
        jar,
        Json(AuthResponse {
            uid: identity.uid,
            display_name: payload.name,
            next: Screen::SetupStudent.path(),
        }),
    ))
}

// ─── Login ───────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Sign in and open a session.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    payload
        .validate()
        .map_err(|_| AppError::Validation("Please fill in all fields".to_string()))?;

    let identity = state
        .identity
        .sign_in(&payload.email, &payload.password)
        .await?;

    tracing::info!(uid = %identity.uid, "Signed in");

    let jar = open_session(jar, &identity.uid, &state.config.jwt_signing_key)?;
    let jar = gate::set_flag(jar, gate::LOGGED_IN);

    Ok((
        jar,
        Json(AuthResponse {
            uid: identity.uid,
            display_name: identity.display_name,
            next: Screen::SetupStudent.path(),
        }),
    ))
}

// ─── Logout ──────────────────────────────────────────────────

/// Close the session and clear the flag cookies. The onboarding flag
/// survives; the welcome tour does not replay for a returning user.
async fn logout(jar: CookieJar) -> (CookieJar, Json<NextResponse>) {
    let mut session = Cookie::new(SESSION_COOKIE, "");
    session.set_path("/");
    let jar = jar.remove(session);
    let jar = gate::clear_flags_at_logout(jar);

    (
        jar,
        Json(NextResponse {
            next: Screen::Welcome.path(),
        }),
    )
}

// ─── Navigation Gate ─────────────────────────────────────────

#[derive(Deserialize)]
pub struct GateQuery {
    path: String,
}

/// Decide where the client should land for a requested path.
async fn gate_decision(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(params): Query<GateQuery>,
) -> Result<Json<NextResponse>> {
    let requested = Screen::from_path(&params.path)
        .ok_or_else(|| AppError::NotFound(format!("Unknown screen: {}", params.path)))?;

    let flags = SessionFlags::from_jar(&jar);
    let signed_in = session_uid(&jar, &state.config.jwt_signing_key).is_some();

    Ok(Json(NextResponse {
        next: gate::next_screen(signed_in, flags, requested).path(),
    }))
}

/// Extract the uid from a valid session cookie, if any.
fn session_uid(jar: &CookieJar, signing_key: &[u8]) -> Option<String> {
    let token = jar.get(SESSION_COOKIE)?.value();
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(token, &key, &validation)
        .ok()
        .map(|data| data.claims.sub)
}

fn open_session(jar: CookieJar, uid: &str, signing_key: &[u8]) -> Result<CookieJar> {
    let token = create_jwt(uid, signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    Ok(jar.add(cookie))
}

// SPDX-License-Identifier: MIT

//! AI study assistant route.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::AppState;

/// Chat reply shown when the completion endpoint fails.
const APOLOGY: &str = "Sorry, I encountered an error. Please try again.";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/assistant", post(ask))
}

#[derive(Deserialize, Validate)]
pub struct AskRequest {
    #[validate(length(min = 1))]
    pub prompt: String,
}

#[derive(Serialize)]
pub struct AskResponse {
    /// HTML-bearing free-text completion.
    pub reply: String,
}

/// Generate a completion for the user's prompt. Endpoint failures become
/// the canned apology inside the chat, never an error status.
async fn ask(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    payload
        .validate()
        .map_err(|_| AppError::Validation("Prompt must not be empty".to_string()))?;

    let reply = match state.assistant.generate(&payload.prompt).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!(error = %e, "Assistant error");
            APOLOGY.to_string()
        }
    };

    Ok(Json(AskResponse { reply }))
}

// SPDX-License-Identifier: MIT

//! Scholarly API Server
//!
//! Backend for the Scholarly student productivity app: accounts, student
//! profiles, tasks, study targets, pomodoro accounting, statistics and
//! the AI study assistant.

use scholarly::{
    config::Config,
    db::FirestoreDb,
    services::{AssistantClient, IdentityClient, QuoteClient},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Scholarly API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Upstream clients
    let identity = IdentityClient::new(
        config.identity_base_url.clone(),
        config.identity_api_key.clone(),
    );
    let assistant = AssistantClient::new(
        config.assistant_base_url.clone(),
        config.assistant_model.clone(),
        config.assistant_api_key.clone(),
    );
    let quotes = QuoteClient::new(config.quote_url.clone());
    tracing::info!("Upstream clients initialized");

    // Per-user pomodoro timers, shared across requests on this instance
    let pomodoros = Arc::new(dashmap::DashMap::new());

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        identity,
        assistant,
        quotes,
        pomodoros,
    });

    // Build router
    let app = scholarly::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("scholarly=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}

// SPDX-License-Identifier: MIT

use scholarly::config::Config;
use scholarly::db::FirestoreDb;
use scholarly::routes::create_router;
use scholarly::services::{AssistantClient, IdentityClient, QuoteClient};
use scholarly::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db_offline();

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
    let pomodoros = Arc::new(dashmap::DashMap::new());

    let state = Arc::new(AppState {
        config,
        db,
        identity,
        assistant,
        quotes,
        pomodoros,
    });

    (create_router(state.clone()), state)
}

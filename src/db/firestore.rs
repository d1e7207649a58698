// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations on the user document.
//!
//! The entire persistence vocabulary of the application:
//! - get / set of the `users/{uid}` document
//! - field-restricted partial updates
//! - de-duplicating array union appends
//! - numeric field increments
//! - the compound task-completion transform
//!
//! No transactions, no listeners; every caller follows read-modify-write
//! and assumes it holds the freshest copy of the document.

use serde::Serialize;

use crate::db::{collections, fields};
use crate::error::AppError;
use crate::models::{CompletedTaskRecord, FocusSession, Task, UserProfile};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated
        // connection to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Document Operations ─────────────────────────────────────

    /// Get a user's profile document.
    pub async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(uid)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Overwrite-or-create the profile document.
    pub async fn set_profile(&self, profile: &UserProfile) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&profile.uid)
            .object(profile)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Partial update restricted to the named field paths of `object`.
    ///
    /// Fails with `NotFound` if the document does not exist; updates never
    /// create documents, that is `set_profile`'s job.
    pub async fn update_fields<T, I>(&self, uid: &str, paths: I, object: &T) -> Result<(), AppError>
    where
        T: Serialize + Sync + Send,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        if self.get_profile(uid).await?.is_none() {
            return Err(AppError::NotFound(format!("User document {} not found", uid)));
        }

        let paths: Vec<String> = paths.into_iter().map(|p| p.as_ref().to_string()).collect();

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(paths)
            .in_col(collections::USERS)
            .document_id(uid)
            .object(object)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Field Transforms ────────────────────────────────────────

    /// De-duplicating union append of a focus session.
    pub async fn append_focus_session(
        &self,
        uid: &str,
        session: &FocusSession,
    ) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(uid)
            .transforms(|t| {
                t.fields([t
                    .field(fields::FOCUS_SESSIONS)
                    .append_missing_elements([session.clone()])])
            })
            .only_transform()
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// De-duplicating union append of a task to the active list.
    pub async fn append_task(&self, uid: &str, task: &Task) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(uid)
            .transforms(|t| {
                t.fields([t.field(fields::TASKS).append_missing_elements([task.clone()])])
            })
            .only_transform()
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Numeric increment of the completed-task counter.
    pub async fn increment_tasks_completed(&self, uid: &str, delta: i64) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(uid)
            .transforms(|t| t.fields([t.field(fields::TOTAL_TASKS_COMPLETED).increment(delta)]))
            .only_transform()
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Compound task-completion write.
    ///
    /// Removes the task from the active array, union-appends the derived
    /// record to the completed array, and increments the counter in one
    /// transform-only update, so a task id is never observable in both
    /// lists. The store still treats these as separate field transforms.
    pub async fn complete_task(
        &self,
        uid: &str,
        task: &Task,
        record: &CompletedTaskRecord,
    ) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(uid)
            .transforms(|t| {
                t.fields([
                    t.field(fields::TASKS).remove_all_from_array([task.clone()]),
                    t.field(fields::COMPLETED_TASKS)
                        .append_missing_elements([record.clone()]),
                    t.field(fields::TOTAL_TASKS_COMPLETED).increment(1),
                ])
            })
            .only_transform()
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::debug!(uid, task_id = task.id, "Task completion written");
        Ok(())
    }
}

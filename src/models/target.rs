//! Study target model.

use serde::{Deserialize, Serialize};

/// A free-text study goal. Stored as an unordered list inside the
/// profile; toggled and deleted by rewriting the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub id: i64,
    pub text: String,
    pub completed: bool,
    pub created_at: String,
}

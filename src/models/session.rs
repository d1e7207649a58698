//! Focus session model.

use serde::{Deserialize, Serialize};

/// One completed (non-break) pomodoro interval. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusSession {
    /// `YYYY-MM-DD`
    pub date: String,
    /// Minutes
    pub duration: u32,
    pub completed_at: String,
}

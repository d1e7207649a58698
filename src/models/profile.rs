//! User profile document.
//!
//! Everything the application persists lives in this one record, keyed by
//! the identity provider's uid. Array and counter fields default so that
//! documents written by older clients (or partially, by field updates)
//! deserialize without erasing anything.

use serde::{Deserialize, Serialize};

use crate::models::{CompletedTaskRecord, FocusSession, Target, Task};
use crate::time_utils::format_utc_rfc3339;

/// User profile stored in Firestore at `users/{uid}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Identity provider uid (also used as document ID)
    pub uid: String,
    pub email: String,
    pub display_name: String,
    pub school: String,
    pub grade: String,
    pub country: String,
    pub subjects: Vec<String>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub completed_tasks: Vec<CompletedTaskRecord>,
    #[serde(default)]
    pub targets: Vec<Target>,
    #[serde(default)]
    pub focus_sessions: Vec<FocusSession>,
    #[serde(default)]
    pub total_tasks_completed: u32,
    #[serde(default)]
    pub notifications: Notifications,
    #[serde(default)]
    pub preferences: Preferences,
    pub created_at: String,
    pub updated_at: String,
}

impl UserProfile {
    /// Build the initial document at setup completion.
    pub fn new_from_setup(
        uid: String,
        email: String,
        display_name: String,
        school: String,
        grade: String,
        country: String,
        subjects: Vec<String>,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        let now = format_utc_rfc3339(now);
        Self {
            uid,
            email,
            display_name,
            school,
            grade,
            country,
            subjects,
            tasks: Vec::new(),
            completed_tasks: Vec::new(),
            targets: Vec::new(),
            focus_sessions: Vec::new(),
            total_tasks_completed: 0,
            notifications: Notifications::default(),
            preferences: Preferences::default(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Notification flags. All enabled by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notifications {
    #[serde(default = "default_true")]
    pub email: bool,
    #[serde(default = "default_true")]
    pub task_reminders: bool,
    #[serde(default = "default_true")]
    pub study_reminders: bool,
}

impl Default for Notifications {
    fn default() -> Self {
        Self {
            email: true,
            task_reminders: true,
            study_reminders: true,
        }
    }
}

/// Preference values. Defaults are supplied locally; a partial persisted
/// object must not erase them, hence the per-field serde defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default = "default_focus_time")]
    pub focus_time: u32,
    #[serde(default = "default_break_time")]
    pub break_time: u32,
    #[serde(default = "default_daily_goal")]
    pub daily_goal: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            dark_mode: false,
            focus_time: default_focus_time(),
            break_time: default_break_time(),
            daily_goal: default_daily_goal(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_focus_time() -> u32 {
    25
}

fn default_break_time() -> u32 {
    5
}

fn default_daily_goal() -> u32 {
    4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_preferences_keep_defaults() {
        // A persisted object missing dailyGoal must still contain the
        // local default after the merge.
        let prefs: Preferences =
            serde_json::from_str(r#"{"darkMode":true,"focusTime":30}"#).unwrap();

        assert!(prefs.dark_mode);
        assert_eq!(prefs.focus_time, 30);
        assert_eq!(prefs.break_time, 5);
        assert_eq!(prefs.daily_goal, 4);
    }

    #[test]
    fn test_partial_notifications_keep_defaults() {
        let n: Notifications = serde_json::from_str(r#"{"email":false}"#).unwrap();

        assert!(!n.email);
        assert!(n.task_reminders);
        assert!(n.study_reminders);
    }

    #[test]
    fn test_profile_with_missing_lists_deserializes_empty() {
        let profile: UserProfile = serde_json::from_str(
            r#"{
                "uid": "u1",
                "email": "a@b.com",
                "displayName": "A",
                "school": "X",
                "grade": "10th Grade",
                "country": "India",
                "subjects": ["Physics"],
                "createdAt": "2024-01-01T00:00:00Z",
                "updatedAt": "2024-01-01T00:00:00Z"
            }"#,
        )
        .unwrap();

        assert!(profile.tasks.is_empty());
        assert!(profile.completed_tasks.is_empty());
        assert_eq!(profile.total_tasks_completed, 0);
        assert_eq!(profile.preferences, Preferences::default());
    }

    #[test]
    fn test_new_from_setup_exact_fields() {
        let now = chrono::Utc::now();
        let profile = UserProfile::new_from_setup(
            "uid-1".into(),
            "a@b.com".into(),
            "Asha".into(),
            "X".into(),
            "10th Grade".into(),
            "India".into(),
            vec!["Physics".into()],
            now,
        );

        assert_eq!(profile.school, "X");
        assert_eq!(profile.grade, "10th Grade");
        assert_eq!(profile.country, "India");
        assert_eq!(profile.subjects, vec!["Physics".to_string()]);
        assert_eq!(profile.created_at, profile.updated_at);
    }
}

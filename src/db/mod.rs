//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    /// One document per user, keyed by identity uid.
    pub const USERS: &str = "users";
}

/// Field paths inside the user document.
pub mod fields {
    pub const TASKS: &str = "tasks";
    pub const COMPLETED_TASKS: &str = "completedTasks";
    pub const TARGETS: &str = "targets";
    pub const FOCUS_SESSIONS: &str = "focusSessions";
    pub const TOTAL_TASKS_COMPLETED: &str = "totalTasksCompleted";
}

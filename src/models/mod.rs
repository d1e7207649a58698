// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod profile;
pub mod session;
pub mod target;
pub mod task;

pub use profile::{Notifications, Preferences, UserProfile};
pub use session::FocusSession;
pub use target::Target;
pub use task::{CompletedTaskRecord, Priority, Task, TaskStatus};

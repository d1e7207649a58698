//! Study target list reconciliation.
//!
//! Targets have no per-item update primitive: every mutation rewrites the
//! whole `targets` array remotely. The list returned by [`TargetList::all`]
//! after a mutation is exactly what was sent, which is also exactly what
//! the remote holds only until another writer interleaves (last-write-wins,
//! accepted).

use chrono::{DateTime, Utc};

use crate::models::Target;
use crate::time_utils::format_utc_rfc3339;

/// In-memory mirror of the remote `targets` array field.
#[derive(Debug, Default)]
pub struct TargetList {
    targets: Vec<Target>,
}

impl TargetList {
    pub fn new(targets: Vec<Target>) -> Self {
        Self { targets }
    }

    /// The full list, in storage order. This is also the whole-list write
    /// payload after a mutation.
    pub fn all(&self) -> &[Target] {
        &self.targets
    }

    pub fn completed_count(&self) -> usize {
        self.targets.iter().filter(|t| t.completed).count()
    }

    /// Create a new target from trimmed free text.
    pub fn add(&mut self, text: &str, now: DateTime<Utc>) -> Option<&Target> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.targets.push(Target {
            id: now.timestamp_millis(),
            text: text.to_string(),
            completed: false,
            created_at: format_utc_rfc3339(now),
        });
        self.targets.last()
    }

    /// Flip the completed flag. Idempotent per invocation: toggling twice
    /// restores the original flag. Returns false for unknown ids.
    pub fn toggle(&mut self, id: i64) -> bool {
        match self.targets.iter_mut().find(|t| t.id == id) {
            Some(target) => {
                target.completed = !target.completed;
                true
            }
            None => false,
        }
    }

    /// Remove a target. Returns false for unknown ids.
    pub fn delete(&mut self, id: i64) -> bool {
        let before = self.targets.len();
        self.targets.retain(|t| t.id != id);
        self.targets.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_trims_and_rejects_empty() {
        let mut list = TargetList::default();
        let now = Utc::now();

        assert!(list.add("   ", now).is_none());
        let target = list.add("  finish chapter 4  ", now).unwrap();
        assert_eq!(target.text, "finish chapter 4");
        assert!(!target.completed);
        assert_eq!(list.all().len(), 1);
    }

    #[test]
    fn test_double_toggle_restores_flag() {
        let mut list = TargetList::default();
        let id = list.add("revise algebra", Utc::now()).unwrap().id;

        assert!(list.toggle(id));
        assert!(list.all()[0].completed);
        assert!(list.toggle(id));
        assert!(!list.all()[0].completed);
    }

    #[test]
    fn test_delete() {
        let now = Utc::now();
        let mut list = TargetList::new(vec![
            Target {
                id: 1,
                text: "a".into(),
                completed: false,
                created_at: format_utc_rfc3339(now),
            },
            Target {
                id: 2,
                text: "b".into(),
                completed: true,
                created_at: format_utc_rfc3339(now),
            },
        ]);

        assert!(list.delete(1));
        assert!(!list.delete(1));
        assert_eq!(list.all().len(), 1);
        assert_eq!(list.completed_count(), 1);
    }

    #[test]
    fn test_toggle_unknown_id_is_noop() {
        let mut list = TargetList::default();
        assert!(!list.toggle(42));
    }
}

//! Statistics aggregation. Pure functions over fetched history; no
//! remote writes.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{CompletedTaskRecord, FocusSession, Task};
use crate::time_utils::weeks_ago;

/// Trailing weekly buckets kept for the performance chart.
const WEEKLY_BUCKETS: usize = 4;
/// Trailing calendar days kept for the focus chart.
const FOCUS_DAYS: usize = 7;

/// One trailing-week bucket. `week` 0 is the current week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyBucket {
    pub week: u32,
    pub label: String,
    /// completed / (completed + same-week-created), as a percentage;
    /// 0 when the denominator is 0.
    pub performance: f64,
    pub completed: u32,
    pub created: u32,
}

/// Total focused minutes for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyFocus {
    pub date: String,
    pub minutes: u32,
}

/// Task count for one category label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub value: u32,
}

/// Group completed tasks into trailing weekly buckets by elapsed-week
/// count from `today` back to the completion timestamp. Keeps only the
/// most recent [`WEEKLY_BUCKETS`], most recent first.
pub fn weekly_performance(
    tasks: &[Task],
    completed: &[CompletedTaskRecord],
    today: DateTime<Utc>,
) -> Vec<WeeklyBucket> {
    let mut completed_by_week: HashMap<u32, u32> = HashMap::new();
    let mut created_by_week: HashMap<u32, u32> = HashMap::new();

    for record in completed {
        if let Some(week) = weeks_ago(&record.completed_at, today) {
            *completed_by_week.entry(week).or_insert(0) += 1;
        }
    }
    for task in tasks {
        if let Some(week) = weeks_ago(&task.created_at, today) {
            *created_by_week.entry(week).or_insert(0) += 1;
        }
    }

    let mut weeks: Vec<u32> = completed_by_week
        .keys()
        .chain(created_by_week.keys())
        .copied()
        .collect();
    weeks.sort_unstable();
    weeks.dedup();

    weeks
        .into_iter()
        .take(WEEKLY_BUCKETS)
        .map(|week| {
            let completed = completed_by_week.get(&week).copied().unwrap_or(0);
            let created = created_by_week.get(&week).copied().unwrap_or(0);
            let denominator = completed + created;
            let performance = if denominator == 0 {
                0.0
            } else {
                completed as f64 / denominator as f64 * 100.0
            };
            WeeklyBucket {
                week,
                label: format!("Week {}", week + 1),
                performance,
                completed,
                created,
            }
        })
        .collect()
}

/// Sum focused minutes per calendar day, keeping the most recent
/// [`FOCUS_DAYS`] days in ascending date order.
pub fn daily_focus(sessions: &[FocusSession]) -> Vec<DailyFocus> {
    let mut by_day: HashMap<String, u32> = HashMap::new();
    for session in sessions {
        *by_day.entry(session.date.clone()).or_insert(0) += session.duration;
    }

    let mut days: Vec<DailyFocus> = by_day
        .into_iter()
        .map(|(date, minutes)| DailyFocus { date, minutes })
        .collect();
    // Day keys are YYYY-MM-DD, so lexicographic order is date order
    days.sort_by(|a, b| a.date.cmp(&b.date));

    if days.len() > FOCUS_DAYS {
        days.split_off(days.len() - FOCUS_DAYS)
    } else {
        days
    }
}

/// Count tasks per category label. The subject is the category; tasks
/// with an empty subject fall into the `Uncategorized` bucket.
pub fn category_counts(tasks: &[Task]) -> Vec<CategoryCount> {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for task in tasks {
        let label = match task.subject.trim() {
            "" => "Uncategorized",
            s => s,
        };
        *counts.entry(label).or_insert(0) += 1;
    }

    let mut out: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(name, value)| CategoryCount {
            name: name.to_string(),
            value,
        })
        .collect();
    out.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name)));
    out
}

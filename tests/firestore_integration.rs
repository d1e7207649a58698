// SPDX-License-Identifier: MIT

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running
//! (FIRESTORE_EMULATOR_HOST set). The emulator provides a clean state
//! for each test run.

use chrono::Utc;
use scholarly::models::{Priority, Task, TaskStatus, UserProfile};
use scholarly::reconcile::TaskList;

mod common;
use common::test_db;

/// Generate a unique uid for test isolation.
fn unique_uid() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    format!(
        "test-{}",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    )
}

fn test_profile(uid: &str) -> UserProfile {
    UserProfile::new_from_setup(
        uid.to_string(),
        "a@b.com".to_string(),
        "Asha".to_string(),
        "X".to_string(),
        "10th Grade".to_string(),
        "India".to_string(),
        vec!["Physics".to_string()],
        Utc::now(),
    )
}

fn test_task(id: i64) -> Task {
    Task {
        id,
        title: "Finish lab report".to_string(),
        description: String::new(),
        due_date: "2024-03-20T10:00:00Z".to_string(),
        subject: "Physics".to_string(),
        priority: Priority::High,
        status: TaskStatus::Pending,
        created_at: "2024-03-10T10:00:00Z".to_string(),
    }
}

#[tokio::test]
async fn test_profile_round_trip() {
    require_emulator!();

    let db = test_db().await;
    let uid = unique_uid();

    let before = db.get_profile(&uid).await.unwrap();
    assert!(before.is_none(), "Profile should not exist before setup");

    db.set_profile(&test_profile(&uid)).await.unwrap();

    let fetched = db.get_profile(&uid).await.unwrap().expect("profile exists");
    assert_eq!(fetched.school, "X");
    assert_eq!(fetched.grade, "10th Grade");
    assert_eq!(fetched.country, "India");
    assert_eq!(fetched.subjects, vec!["Physics".to_string()]);
    assert!(fetched.tasks.is_empty());
}

#[tokio::test]
async fn test_task_append_is_deduplicating() {
    require_emulator!();

    let db = test_db().await;
    let uid = unique_uid();
    db.set_profile(&test_profile(&uid)).await.unwrap();

    let task = test_task(1);
    db.append_task(&uid, &task).await.unwrap();
    // Union append: the identical value is ignored
    db.append_task(&uid, &task).await.unwrap();

    let fetched = db.get_profile(&uid).await.unwrap().unwrap();
    assert_eq!(fetched.tasks.len(), 1);
}

#[tokio::test]
async fn test_complete_task_moves_id_between_lists() {
    require_emulator!();

    let db = test_db().await;
    let uid = unique_uid();
    db.set_profile(&test_profile(&uid)).await.unwrap();

    let task = test_task(1);
    db.append_task(&uid, &task).await.unwrap();

    // The reconciler derives the record; the compound write resolves it
    let mut list = TaskList::new(vec![task.clone()]);
    let record = list.mark_complete(1, Utc::now()).unwrap();
    db.complete_task(&uid, &task, &record).await.unwrap();
    assert!(list.commit_removal(1).is_some());

    let fetched = db.get_profile(&uid).await.unwrap().unwrap();
    assert!(
        !fetched.tasks.iter().any(|t| t.id == 1),
        "Task must leave the active list"
    );
    assert!(
        fetched.completed_tasks.iter().any(|r| r.task_id == 1),
        "Task must appear in the completed list"
    );
    assert_eq!(fetched.total_tasks_completed, 1);
}

#[tokio::test]
async fn test_update_fields_requires_existing_document() {
    require_emulator!();

    let db = test_db().await;
    let uid = unique_uid();

    #[derive(serde::Serialize)]
    struct Patch {
        school: String,
    }

    let err = db
        .update_fields(
            &uid,
            ["school"],
            &Patch {
                school: "Y".to_string(),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, scholarly::error::AppError::NotFound(_)));
}

#[tokio::test]
async fn test_update_fields_leaves_other_fields_alone() {
    require_emulator!();

    let db = test_db().await;
    let uid = unique_uid();
    db.set_profile(&test_profile(&uid)).await.unwrap();
    db.append_task(&uid, &test_task(1)).await.unwrap();

    #[derive(serde::Serialize)]
    struct Patch {
        school: String,
    }

    db.update_fields(
        &uid,
        ["school"],
        &Patch {
            school: "Y".to_string(),
        },
    )
    .await
    .unwrap();

    let fetched = db.get_profile(&uid).await.unwrap().unwrap();
    assert_eq!(fetched.school, "Y");
    assert_eq!(fetched.tasks.len(), 1, "Unnamed fields must survive");
    assert_eq!(fetched.grade, "10th Grade");
}

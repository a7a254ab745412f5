//! DevMasters Core Integration Tests

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use devmasters_core::{
    Error, ListQuery, NewProject, ProjectFilter, ProjectPriority, ProjectStatus, ProjectStore,
    ProjectUpdate,
};

fn new_project(title: &str) -> NewProject {
    NewProject::new(
        title,
        format!("Description of {}", title),
        ProjectPriority::Medium,
    )
}

fn seeded_store(count: usize) -> ProjectStore {
    let store = ProjectStore::new();
    for i in 1..=count {
        store.create(new_project(&format!("Project {:02}", i))).unwrap();
    }
    store
}

#[test]
fn test_created_ids_are_unique() {
    let store = ProjectStore::new();
    let mut seen = HashSet::new();

    for i in 0..50 {
        let project = store.create(new_project(&format!("Unique {}", i))).unwrap();
        assert!(seen.insert(project.id), "id {} was reused", project.id);
    }
}

#[test]
fn test_duplicate_title_is_case_insensitive() {
    let store = ProjectStore::new();
    let original = store.create(new_project("Build API")).unwrap();

    let err = store.create(new_project("build api")).unwrap_err();
    assert_eq!(err, Error::DuplicateTitle("build api".to_string()));

    // Sanitization happens before the comparison.
    let err = store.create(new_project("  BUILD   API!! ")).unwrap_err();
    assert!(matches!(err, Error::DuplicateTitle(_)));

    store.delete(original.id).unwrap();
    let recreated = store.create(new_project("build api")).unwrap();
    assert_eq!(recreated.title, "build api");
}

#[test]
fn test_update_title_collision_with_other_project() {
    let store = ProjectStore::new();
    store.create(new_project("Alpha")).unwrap();
    let beta = store.create(new_project("Beta")).unwrap();

    let err = store
        .update(beta.id, ProjectUpdate::default().with_title("ALPHA"))
        .unwrap_err();
    assert_eq!(err, Error::DuplicateTitle("ALPHA".to_string()));
    assert_eq!(store.get(beta.id).unwrap().title, "Beta");
}

#[test]
fn test_planned_to_cancelled_succeeds() {
    let store = ProjectStore::new();
    let project = store.create(new_project("Cancel me")).unwrap();

    let updated = store
        .update(
            project.id,
            ProjectUpdate::default().with_status(ProjectStatus::Cancelled),
        )
        .unwrap();
    assert_eq!(updated.status, ProjectStatus::Cancelled);
}

#[test]
fn test_terminal_statuses_reject_every_transition() {
    let store = ProjectStore::new();
    let all = [
        ProjectStatus::Planned,
        ProjectStatus::InProgress,
        ProjectStatus::Completed,
        ProjectStatus::Cancelled,
    ];

    for (i, terminal) in [ProjectStatus::Completed, ProjectStatus::Cancelled]
        .into_iter()
        .enumerate()
    {
        let project = store
            .create(new_project(&format!("Terminal {}", i)).with_status(terminal))
            .unwrap();

        for next in all {
            let err = store
                .update(project.id, ProjectUpdate::default().with_status(next))
                .unwrap_err();
            assert_eq!(
                err,
                Error::InvalidStatusTransition {
                    from: terminal,
                    to: next,
                }
            );
        }
    }
}

#[test]
fn test_full_lifecycle_to_completed() {
    let store = ProjectStore::new();
    let project = store.create(new_project("Lifecycle")).unwrap();

    let project = store
        .update(
            project.id,
            ProjectUpdate::default().with_status(ProjectStatus::InProgress),
        )
        .unwrap();
    let project = store
        .update(
            project.id,
            ProjectUpdate::default().with_status(ProjectStatus::Completed),
        )
        .unwrap();
    assert_eq!(project.status, ProjectStatus::Completed);
}

#[test]
fn test_pagination_last_page_and_clamping() {
    let store = seeded_store(25);

    let page = store.list(&ListQuery::new(3, 10)).unwrap();
    assert_eq!(page.items.len(), 5);
    assert_eq!(page.total, 25);
    assert_eq!(page.page, 3);
    assert_eq!(page.pages, 3);

    let clamped = store.list(&ListQuery::new(99, 10)).unwrap();
    assert_eq!(clamped.page, 3);
    assert_eq!(clamped.items, page.items);

    let first = store.list(&ListQuery::new(1, 10)).unwrap();
    let ids: Vec<u64> = first.items.iter().map(|p| p.id).collect();
    assert_eq!(ids, (1..=10).collect::<Vec<u64>>());
}

#[test]
fn test_list_filters() {
    let store = ProjectStore::new();
    store
        .create(NewProject::new(
            "Billing Service",
            "Rewrite invoices in Rust",
            ProjectPriority::High,
        ))
        .unwrap();
    let reporting = store
        .create(NewProject::new(
            "Reporting",
            "Monthly BILLING dashboards",
            ProjectPriority::Low,
        ))
        .unwrap();
    store
        .create(NewProject::new(
            "Onboarding",
            "Welcome flow for new users",
            ProjectPriority::Low,
        ))
        .unwrap();
    store
        .update(
            reporting.id,
            ProjectUpdate::default().with_status(ProjectStatus::InProgress),
        )
        .unwrap();

    let search =
        ListQuery::default().with_filter(ProjectFilter::default().with_search("billing"));
    assert_eq!(store.list(&search).unwrap().total, 2);

    let low = ListQuery::default()
        .with_filter(ProjectFilter::default().with_priority(ProjectPriority::Low));
    assert_eq!(store.list(&low).unwrap().total, 2);

    let in_progress_low = ListQuery::default().with_filter(
        ProjectFilter::default()
            .with_status(ProjectStatus::InProgress)
            .with_priority(ProjectPriority::Low),
    );
    let page = store.list(&in_progress_low).unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, reporting.id);

    let nothing = ListQuery::default()
        .with_filter(ProjectFilter::default().with_status(ProjectStatus::Completed));
    let page = store.list(&nothing).unwrap();
    assert_eq!(page.total, 0);
    assert_eq!(page.page, 1);
    assert!(page.items.is_empty());
}

#[test]
fn test_search_text_is_not_trimmed() {
    let store = ProjectStore::new();
    store
        .create(NewProject::new(
            "Build API",
            "Implement the REST layer",
            ProjectPriority::Medium,
        ))
        .unwrap();

    let padded = ListQuery::default().with_filter(ProjectFilter::default().with_search("api "));
    assert_eq!(store.list(&padded).unwrap().total, 0);

    let exact = ListQuery::default().with_filter(ProjectFilter::default().with_search("api"));
    assert_eq!(store.list(&exact).unwrap().total, 1);

    let blank = ListQuery::default().with_filter(ProjectFilter::default().with_search("  "));
    assert_eq!(store.list(&blank).unwrap().total, 1);
}

#[test]
fn test_partial_update_only_changes_description() {
    let store = ProjectStore::new();
    let original = store
        .create(NewProject::new("Partial", "Original description", ProjectPriority::High))
        .unwrap();

    thread::sleep(Duration::from_millis(5));
    let updated = store
        .update(
            original.id,
            ProjectUpdate::default().with_description("Replacement description"),
        )
        .unwrap();

    assert_eq!(updated.description, "Replacement description");
    assert_eq!(updated.title, original.title);
    assert_eq!(updated.priority, original.priority);
    assert_eq!(updated.status, original.status);
    assert_eq!(updated.created_at, original.created_at);
    assert!(updated.updated_at > original.updated_at);
}

#[test]
fn test_delete_then_get_and_delete_again() {
    let store = ProjectStore::new();
    let project = store.create(new_project("Short lived")).unwrap();

    store.delete(project.id).unwrap();
    assert_eq!(store.get(project.id), Err(Error::ProjectNotFound(project.id)));
    assert_eq!(store.delete(project.id), Err(Error::ProjectNotFound(project.id)));
    assert_eq!(
        store.update(project.id, ProjectUpdate::default()),
        Err(Error::ProjectNotFound(project.id))
    );
}

#[test]
fn test_update_rejects_created_at() {
    let store = ProjectStore::new();
    let project = store.create(new_project("Immutable")).unwrap();

    let changes: ProjectUpdate =
        serde_json::from_str(r#"{"created_at": "2020-01-01T00:00:00Z", "priority": 1}"#).unwrap();
    let err = store.update(project.id, changes).unwrap_err();

    assert!(matches!(err, Error::Validation { ref field, .. } if field == "created_at"));
    assert_eq!(store.get(project.id).unwrap(), project);
}

#[test]
fn test_invalid_fields_are_rejected_on_create_and_update() {
    let store = ProjectStore::new();

    let err = store
        .create(NewProject::new("ok title", "short", ProjectPriority::Low))
        .unwrap_err();
    assert!(matches!(err, Error::Validation { ref field, .. } if field == "description"));

    let project = store.create(new_project("Valid")).unwrap();
    let err = store
        .update(project.id, ProjectUpdate::default().with_title("#$%"))
        .unwrap_err();
    assert!(matches!(err, Error::Validation { ref field, .. } if field == "title"));
}

#[test]
fn test_concurrent_creates_get_distinct_ids() {
    let store = Arc::new(ProjectStore::new());

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                (0..25)
                    .map(|i| {
                        store
                            .create(new_project(&format!("Worker {} item {}", worker, i)))
                            .unwrap()
                            .id
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(ids.insert(id));
        }
    }
    assert_eq!(ids.len(), 200);
    assert_eq!(store.count().unwrap(), 200);
}

#[test]
fn test_concurrent_creates_of_one_title_admit_exactly_one() {
    let store = ProjectStore::new();

    let successes = thread::scope(|s| {
        let handles: Vec<_> = (0..16)
            .map(|_| s.spawn(|| store.create(new_project("Contended")).is_ok()))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count()
    });

    assert_eq!(successes, 1);
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn test_concurrent_updates_to_distinct_records() {
    let store = seeded_store(10);

    thread::scope(|s| {
        for id in 1..=10u64 {
            let store = &store;
            s.spawn(move || {
                store
                    .update(
                        id,
                        ProjectUpdate::default().with_status(ProjectStatus::InProgress),
                    )
                    .unwrap();
                store
                    .update(
                        id,
                        ProjectUpdate::default().with_priority(ProjectPriority::High),
                    )
                    .unwrap();
            });
        }
    });

    let page = store.list(&ListQuery::new(1, 100)).unwrap();
    assert!(page.items.iter().all(|p| p.status == ProjectStatus::InProgress));
    assert!(page.items.iter().all(|p| p.priority == ProjectPriority::High));
}

#[test]
fn test_concurrent_transitions_on_one_record_apply_once() {
    let store = ProjectStore::new();
    let project = store.create(new_project("Race")).unwrap();

    // Only one PLANNED -> IN_PROGRESS can win; the rest see IN_PROGRESS and
    // are rejected because IN_PROGRESS -> IN_PROGRESS is not an edge.
    let successes = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                s.spawn(|| {
                    store
                        .update(
                            project.id,
                            ProjectUpdate::default().with_status(ProjectStatus::InProgress),
                        )
                        .is_ok()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count()
    });

    assert_eq!(successes, 1);
    assert_eq!(
        store.get(project.id).unwrap().status,
        ProjectStatus::InProgress
    );
}

#[test]
fn test_delete_racing_updates_leaves_no_lock_behind() {
    let store = seeded_store(1);

    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                let _ = store.update(
                    1,
                    ProjectUpdate::default().with_priority(ProjectPriority::Low),
                );
            });
        }
        s.spawn(|| {
            let _ = store.delete(1);
        });
    });

    // Updates that lost the race may briefly recreate the lock; once they
    // observe the missing record they discard it again.
    assert_eq!(store.get(1), Err(Error::ProjectNotFound(1)));
    assert_eq!(store.record_lock_count(), 0);
}

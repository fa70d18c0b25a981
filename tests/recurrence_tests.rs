use chrono::{DateTime, Duration, Local, TimeZone};

use taskboard::models::{Repeat, Status};
use taskboard::recurrence::{successor_window, sweep};
use taskboard::storage::MemoryStorage;
use taskboard::store::{NewTask, TaskStore};

fn fixed_now() -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 8, 20, 10, 0, 0).unwrap()
}

fn store_at(now: DateTime<Local>) -> TaskStore {
    TaskStore::open(Box::new(MemoryStorage::new()), Box::new(move || now))
}

#[test]
fn successor_window_shifts_by_repeat_interval() {
    let now = fixed_now();
    let end = now + Duration::hours(1);

    assert_eq!(
        successor_window(now, end, Repeat::Daily),
        Some((now + Duration::days(1), end + Duration::days(1)))
    );
    assert_eq!(
        successor_window(now, end, Repeat::Weekly),
        Some((now + Duration::days(7), end + Duration::days(7)))
    );
    assert_eq!(successor_window(now, end, Repeat::None), None);
}

#[test]
fn sweep_materializes_future_successor_for_pending_daily_task() {
    let now = fixed_now();
    let mut store = store_at(now);
    // Started earlier today, still pending.
    let start = now + Duration::hours(4);
    let source = store
        .create(NewTask::new("Standup", start, start + Duration::hours(1), Repeat::Daily))
        .unwrap();

    assert_eq!(store.sweep().unwrap(), 1);

    let tasks = store.list(None);
    assert_eq!(tasks.len(), 2);
    let successor = tasks.iter().find(|t| t.id != source.id).unwrap();
    assert_eq!(successor.start_time, start + Duration::days(1));
    assert_eq!(successor.status, Status::Todo);
    assert_eq!(store.get(source.id).unwrap().successor_id, Some(successor.id));

    // Source window untouched.
    assert_eq!(store.get(source.id).unwrap().start_time, start);
}

#[test]
fn sweep_is_idempotent() {
    let now = fixed_now();
    let mut store = store_at(now);
    let start = now + Duration::hours(4);
    store
        .create(NewTask::new("Standup", start, start + Duration::hours(1), Repeat::Daily))
        .unwrap();

    assert_eq!(store.sweep().unwrap(), 1);
    assert_eq!(store.sweep().unwrap(), 0);
    assert_eq!(store.list(None).len(), 2);
}

#[test]
fn sweep_does_not_duplicate_a_completion_successor() {
    let now = fixed_now();
    let mut store = store_at(now);
    let start = now + Duration::hours(4);
    let source = store
        .create(NewTask::new("Standup", start, start + Duration::hours(1), Repeat::Daily))
        .unwrap();

    // Completion already materialized the successor.
    store.transition(source.id, Status::Done).unwrap();
    assert_eq!(store.list(None).len(), 2);

    assert_eq!(store.sweep().unwrap(), 0);
    assert_eq!(store.list(None).len(), 2);
}

#[test]
fn sweep_skips_past_dated_successors() {
    let now = fixed_now();
    let mut store = store_at(now);
    // Started two days ago; its successor would still be in the past.
    let start = now - Duration::days(2);
    store
        .create(NewTask::new("Stale", start, start + Duration::hours(1), Repeat::Daily))
        .unwrap();

    assert_eq!(store.sweep().unwrap(), 0);
    assert_eq!(store.list(None).len(), 1);
}

#[test]
fn sweep_ignores_done_weekly_and_future_tasks() {
    let now = fixed_now();
    let mut tasks = Vec::new();
    let mut store = store_at(now);

    let done = store
        .create(NewTask::new(
            "Done daily",
            now - Duration::hours(2),
            now - Duration::hours(1),
            Repeat::Daily,
        ))
        .unwrap();
    store.transition(done.id, Status::Done).unwrap();
    // Completion spawned one successor for the done task.
    assert_eq!(store.list(None).len(), 2);

    store
        .create(NewTask::new(
            "Weekly",
            now + Duration::hours(1),
            now + Duration::hours(2),
            Repeat::Weekly,
        ))
        .unwrap();
    store
        .create(NewTask::new(
            "Next week",
            now + Duration::days(3),
            now + Duration::days(3) + Duration::hours(1),
            Repeat::Daily,
        ))
        .unwrap();
    tasks.extend(store.list(None));

    // The successor spawned above starts tomorrow, outside the sweep's
    // before-tomorrow scan; nothing else qualifies either.
    assert_eq!(store.sweep().unwrap(), 0);
    assert_eq!(store.list(None), tasks);
}

#[test]
fn sweep_over_raw_collection_reports_spawned_ids() {
    let now = fixed_now();
    let mut store = store_at(now);
    let start = now + Duration::hours(2);
    store
        .create(NewTask::new("One", start, start + Duration::hours(1), Repeat::Daily))
        .unwrap();
    store
        .create(NewTask::new("Two", start, start + Duration::hours(1), Repeat::Daily))
        .unwrap();

    let mut tasks = store.list(None);
    let spawned = sweep(&mut tasks, now);
    assert_eq!(spawned.len(), 2);
    assert_eq!(tasks.len(), 4);
    for id in spawned {
        assert!(tasks.iter().any(|t| t.id == id));
    }
}

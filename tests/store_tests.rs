use chrono::{DateTime, Duration, Local, TimeZone};
use regex::Regex;

use taskboard::ical;
use taskboard::models::{Repeat, Status, Task, TaskId};
use taskboard::storage::{FileStorage, MemoryStorage, Storage};
use taskboard::store::{NewTask, TaskStore};

fn fixed_now() -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 8, 20, 10, 0, 0).unwrap()
}

fn store_at(now: DateTime<Local>) -> TaskStore {
    TaskStore::open(Box::new(MemoryStorage::new()), Box::new(move || now))
}

fn window(now: DateTime<Local>, hours: i64) -> (DateTime<Local>, DateTime<Local>) {
    (now, now + Duration::hours(hours))
}

#[test]
fn create_yields_todo_task_with_given_fields() {
    let now = fixed_now();
    let mut store = store_at(now);
    let (start, end) = window(now, 2);

    let task = store
        .create(NewTask::new("Write report", start, end, Repeat::None))
        .unwrap();

    assert_eq!(task.title, "Write report");
    assert_eq!(task.status, Status::Todo);
    assert_eq!(task.start_time, start);
    assert_eq!(task.end_time, end);
    assert_eq!(task.repeat, Repeat::None);

    let listed = store.list(None);
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, task.id);
}

#[test]
fn create_rejects_empty_title() {
    let now = fixed_now();
    let mut store = store_at(now);
    let (start, end) = window(now, 1);

    assert!(store.create(NewTask::new("", start, end, Repeat::None)).is_err());
    assert!(store.create(NewTask::new("   ", start, end, Repeat::None)).is_err());
    assert!(store.list(None).is_empty());
}

#[test]
fn create_rejects_inverted_or_empty_window() {
    let now = fixed_now();
    let mut store = store_at(now);

    // end == start
    assert!(store.create(NewTask::new("a", now, now, Repeat::None)).is_err());
    // end < start
    assert!(store
        .create(NewTask::new("a", now, now - Duration::hours(1), Repeat::None))
        .is_err());
    assert!(store.list(None).is_empty());
}

#[test]
fn transition_changes_only_the_target_task() {
    let now = fixed_now();
    let mut store = store_at(now);
    let (start, end) = window(now, 1);
    let a = store.create(NewTask::new("A", start, end, Repeat::None)).unwrap();
    let b = store.create(NewTask::new("B", start, end, Repeat::None)).unwrap();

    let updated = store.transition(a.id, Status::Done).unwrap().unwrap();
    assert_eq!(updated.status, Status::Done);

    // No successor for a non-repeating task, and B is untouched.
    assert_eq!(store.list(None).len(), 2);
    assert_eq!(store.get(b.id).unwrap().status, Status::Todo);
}

#[test]
fn transition_unknown_id_is_a_noop() {
    let now = fixed_now();
    let mut other = store_at(now);
    let (start, end) = window(now, 1);
    let foreign = other.create(NewTask::new("x", start, end, Repeat::None)).unwrap();

    let mut store = store_at(now);
    assert!(store.transition(foreign.id, Status::Done).unwrap().is_none());
    assert!(store.list(None).is_empty());
}

#[test]
fn status_moves_freely_in_any_direction() {
    let now = fixed_now();
    let mut store = store_at(now);
    let (start, end) = window(now, 1);
    let task = store.create(NewTask::new("drag me", start, end, Repeat::None)).unwrap();

    for status in [Status::Done, Status::Todo, Status::InProgress, Status::Todo] {
        let updated = store.transition(task.id, status).unwrap().unwrap();
        assert_eq!(updated.status, status);
    }
    assert_eq!(store.list(None).len(), 1);
}

#[test]
fn completing_daily_task_spawns_next_day_successor() {
    let now = fixed_now();
    let mut store = store_at(now);
    let (start, end) = window(now, 1);
    let task = store.create(NewTask::new("Standup", start, end, Repeat::Daily)).unwrap();

    store.transition(task.id, Status::Done).unwrap();

    let tasks = store.list(None);
    assert_eq!(tasks.len(), 2);
    let successor = tasks.iter().find(|t| t.id != task.id).unwrap();
    assert_eq!(successor.title, "Standup");
    assert_eq!(successor.status, Status::Todo);
    assert_eq!(successor.repeat, Repeat::Daily);
    assert_eq!(successor.start_time, start + Duration::days(1));
    assert_eq!(successor.end_time, end + Duration::days(1));
    assert_eq!(store.get(task.id).unwrap().successor_id, Some(successor.id));
}

#[test]
fn completing_weekly_task_shifts_by_seven_days() {
    let now = fixed_now();
    let mut store = store_at(now);
    let (start, end) = window(now, 2);
    let task = store.create(NewTask::new("Review", start, end, Repeat::Weekly)).unwrap();

    store.transition(task.id, Status::Done).unwrap();

    let successor = store
        .list(None)
        .into_iter()
        .find(|t| t.id != task.id)
        .unwrap();
    assert_eq!(successor.start_time, start + Duration::days(7));
    assert_eq!(successor.end_time, end + Duration::days(7));
}

#[test]
fn completing_twice_spawns_only_one_successor() {
    let now = fixed_now();
    let mut store = store_at(now);
    let (start, end) = window(now, 1);
    let task = store.create(NewTask::new("Standup", start, end, Repeat::Daily)).unwrap();

    store.transition(task.id, Status::Done).unwrap();
    // Drag back and complete again; the successor already exists.
    store.transition(task.id, Status::Todo).unwrap();
    store.transition(task.id, Status::Done).unwrap();

    assert_eq!(store.list(None).len(), 2);
}

#[test]
fn remove_single_keeps_other_occurrences() {
    let now = fixed_now();
    let mut store = store_at(now);
    let (start, end) = window(now, 1);
    let first = store.create(NewTask::new("Standup", start, end, Repeat::Daily)).unwrap();
    store
        .create(NewTask::new(
            "Standup",
            start + Duration::days(1),
            end + Duration::days(1),
            Repeat::Daily,
        ))
        .unwrap();

    assert_eq!(store.remove(first.id, false).unwrap(), 1);
    assert_eq!(store.list(None).len(), 1);
}

#[test]
fn remove_cascade_takes_the_whole_family() {
    let now = fixed_now();
    let mut store = store_at(now);
    let (start, end) = window(now, 1);
    let first = store.create(NewTask::new("Standup", start, end, Repeat::Daily)).unwrap();
    store
        .create(NewTask::new(
            "Standup",
            start + Duration::days(1),
            end + Duration::days(1),
            Repeat::Daily,
        ))
        .unwrap();
    // Same title, different repeat rule: a different family.
    let weekly = store.create(NewTask::new("Standup", start, end, Repeat::Weekly)).unwrap();
    let other = store.create(NewTask::new("Lunch", start, end, Repeat::Daily)).unwrap();

    assert_eq!(store.remove(first.id, true).unwrap(), 2);
    let remaining: Vec<_> = store.list(None).into_iter().map(|t| t.id).collect();
    assert_eq!(remaining, vec![weekly.id, other.id]);
}

#[test]
fn remove_unknown_id_removes_nothing() {
    let now = fixed_now();
    let mut other = store_at(now);
    let (start, end) = window(now, 1);
    let foreign = other.create(NewTask::new("x", start, end, Repeat::None)).unwrap();

    let mut store = store_at(now);
    store.create(NewTask::new("keep", start, end, Repeat::None)).unwrap();
    assert_eq!(store.remove(foreign.id, true).unwrap(), 0);
    assert_eq!(store.list(None).len(), 1);
}

#[test]
fn list_filters_by_status_in_insertion_order() {
    let now = fixed_now();
    let mut store = store_at(now);
    let (start, end) = window(now, 1);
    let a = store.create(NewTask::new("A", start, end, Repeat::None)).unwrap();
    let b = store.create(NewTask::new("B", start, end, Repeat::None)).unwrap();
    let c = store.create(NewTask::new("C", start, end, Repeat::None)).unwrap();
    store.transition(b.id, Status::Done).unwrap();

    let todos: Vec<_> = store.list(Some(Status::Todo)).into_iter().map(|t| t.id).collect();
    assert_eq!(todos, vec![a.id, c.id]);
    let done: Vec<_> = store.list(Some(Status::Done)).into_iter().map(|t| t.id).collect();
    assert_eq!(done, vec![b.id]);
}

#[test]
fn collection_round_trips_through_the_durable_surface() {
    let now = fixed_now();
    let mut dir = std::env::temp_dir();
    dir.push(format!("taskboard_test_roundtrip_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    let (start, end) = window(now, 2);
    let mut store = TaskStore::open(Box::new(FileStorage::at(dir.clone())), Box::new(move || now));
    let mut task = NewTask::new("Walk the dog", start, end, Repeat::Daily);
    task.category = Some("Pets".into());
    task.day_of_week = Some(taskboard::models::DayOfWeek::Monday);
    store.create(task).unwrap();
    store.create(NewTask::new("One-off", start, end, Repeat::None)).unwrap();
    let written = store.list(None);

    let reloaded = TaskStore::open(Box::new(FileStorage::at(dir.clone())), Box::new(move || now));
    assert_eq!(reloaded.list(None), written);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn missing_or_corrupt_surface_starts_empty() {
    let now = fixed_now();
    let mut storage = MemoryStorage::new();
    storage.set("tasks", "definitely { not json").unwrap();
    let store = TaskStore::open(Box::new(storage), Box::new(move || now));
    assert!(store.list(None).is_empty());
}

/// Hydrates fine but refuses every write, like a read-only data dir.
struct ReadOnlyStorage {
    seed: String,
}

impl Storage for ReadOnlyStorage {
    fn get(&self, key: &str) -> Option<String> {
        (key == "tasks").then(|| self.seed.clone())
    }

    fn set(&mut self, _key: &str, _value: &str) -> std::io::Result<()> {
        Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        ))
    }
}

#[test]
fn sweep_reports_a_failed_persist() {
    let now = fixed_now();
    let (start, end) = window(now + Duration::hours(2), 1);
    let task = Task {
        id: TaskId::new(),
        title: "Standup".into(),
        start_time: start,
        end_time: end,
        status: Status::Todo,
        repeat: Repeat::Daily,
        category: None,
        day_of_week: None,
        successor_id: None,
    };
    let seed = serde_json::to_string(&vec![task]).unwrap();

    let mut store = TaskStore::open(
        Box::new(ReadOnlyStorage { seed }),
        Box::new(move || now),
    );
    // The sweep wants to append a successor; the write failure must
    // surface as an error, not vanish.
    assert!(store.sweep().is_err());
}

#[test]
fn ical_event_carries_summary_and_utc_window() {
    let now = fixed_now();
    let mut store = store_at(now);
    let (start, end) = window(now, 1);
    let task = store.create(NewTask::new("Dentist", start, end, Repeat::None)).unwrap();

    let event = ical::event_for(store.get(task.id).unwrap());
    let lines: Vec<_> = event.lines().collect();
    assert_eq!(lines[0], "BEGIN:VCALENDAR");
    assert_eq!(lines[1], "VERSION:2.0");
    assert_eq!(lines[2], "BEGIN:VEVENT");
    assert_eq!(lines[3], "SUMMARY:Dentist");
    let stamp = Regex::new(r"^DT(START|END):\d{8}T\d{6}Z$").unwrap();
    assert!(stamp.is_match(lines[4]), "{}", lines[4]);
    assert!(stamp.is_match(lines[5]), "{}", lines[5]);
    assert_eq!(lines[6], "END:VEVENT");
    assert_eq!(lines[7], "END:VCALENDAR");
}

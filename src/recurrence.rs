//! Spawning of successor instances for repeating tasks.
//!
//! Two triggers exist: completing a repeating task (authoritative) and a
//! catch-up sweep run once per logical tick after idle periods. Both are
//! keyed by `Task::successor_id`, so a successor is materialized at most
//! once per source task. The engine only ever appends; it never deletes a
//! task and never touches the source's time window.

use chrono::{DateTime, Duration, Local};

use crate::date::start_of_tomorrow;
use crate::models::{Repeat, Status, Task, TaskId};

/// Computes the successor window for a repeat rule, shifted by one day for
/// daily tasks and seven for weekly ones.
pub fn successor_window(
    start: DateTime<Local>,
    end: DateTime<Local>,
    repeat: Repeat,
) -> Option<(DateTime<Local>, DateTime<Local>)> {
    let delta = match repeat {
        Repeat::None => return None,
        Repeat::Daily => Duration::days(1),
        Repeat::Weekly => Duration::days(7),
    };
    Some((start + delta, end + delta))
}

/// Builds the successor instance for `source` under the given fresh id.
///
/// The successor starts over in `Todo` with no successor of its own; title,
/// repeat rule and descriptive metadata carry over unchanged.
pub fn spawn_successor(source: &Task, id: TaskId) -> Option<Task> {
    let (start, end) = successor_window(source.start_time, source.end_time, source.repeat)?;
    Some(Task {
        id,
        title: source.title.clone(),
        start_time: start,
        end_time: end,
        status: Status::Todo,
        repeat: source.repeat,
        category: source.category.clone(),
        day_of_week: source.day_of_week,
        successor_id: None,
    })
}

/// Idempotent catch-up pass over the collection.
///
/// Scans daily tasks whose window started before tomorrow and that are not
/// done, and appends their successor when one has not been materialized yet
/// and its start still lies in the future. Marks each source with the
/// successor's id. Returns the appended instances; the caller owns the
/// collection and persistence.
pub fn sweep(tasks: &mut Vec<Task>, now: DateTime<Local>) -> Vec<TaskId> {
    let tomorrow = start_of_tomorrow(now);
    let mut spawned = Vec::new();
    let mut successors = Vec::new();

    for task in tasks.iter_mut() {
        if task.repeat != Repeat::Daily
            || task.status == Status::Done
            || task.successor_id.is_some()
            || task.start_time >= tomorrow
        {
            continue;
        }
        let id = TaskId::new();
        if let Some(next) = spawn_successor(task, id) {
            // Only future-dated successors are worth materializing; a
            // past-dated one would be stale on arrival.
            if next.start_time > now {
                task.successor_id = Some(id);
                spawned.push(id);
                successors.push(next);
            }
        }
    }

    tasks.extend(successors);
    spawned
}

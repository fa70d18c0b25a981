//! The single authoritative task collection and its mutation surface.
//!
//! Every mutation goes through `TaskStore`; nothing else touches the
//! collection. The store is a single-writer structure: mutations are
//! synchronous and the read-modify-write-persist cycle assumes no
//! concurrent caller.

use chrono::{DateTime, Local};

use crate::error::StoreError;
use crate::models::{Repeat, Status, Task, TaskId};
use crate::recurrence;
use crate::storage::{Storage, TASKS_KEY};

/// Injected time source, so tests and the sweep are deterministic.
pub type Clock = Box<dyn Fn() -> DateTime<Local>>;

/// Creation input for a task. `repeat` defaults to none; category and
/// weekday are descriptive extras supplied by the form or a template.
pub struct NewTask {
    pub title: String,
    pub start_time: DateTime<Local>,
    pub end_time: DateTime<Local>,
    pub repeat: Repeat,
    pub category: Option<String>,
    pub day_of_week: Option<crate::models::DayOfWeek>,
}

impl NewTask {
    pub fn new(
        title: impl Into<String>,
        start_time: DateTime<Local>,
        end_time: DateTime<Local>,
        repeat: Repeat,
    ) -> NewTask {
        NewTask {
            title: title.into(),
            start_time,
            end_time,
            repeat,
            category: None,
            day_of_week: None,
        }
    }
}

pub struct TaskStore {
    tasks: Vec<Task>,
    storage: Box<dyn Storage>,
    clock: Clock,
}

impl TaskStore {
    /// Opens a store over the given surface, hydrating from the `tasks`
    /// key. A missing or corrupt value degrades to an empty collection
    /// rather than failing startup.
    pub fn open(storage: Box<dyn Storage>, clock: Clock) -> TaskStore {
        let tasks = storage
            .get(TASKS_KEY)
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default();
        TaskStore { tasks, storage, clock }
    }

    pub fn now(&self) -> DateTime<Local> {
        (self.clock)()
    }

    /// Creates a task in `Todo`, appends it and persists.
    ///
    /// Rejects blank titles and windows that do not end after they start.
    pub fn create(&mut self, input: NewTask) -> Result<Task, StoreError> {
        if input.title.trim().is_empty() {
            return Err(StoreError::Validation("title must not be empty".into()));
        }
        if input.end_time <= input.start_time {
            return Err(StoreError::Validation(
                "end time must be after start time".into(),
            ));
        }
        let task = Task {
            id: TaskId::new(),
            title: input.title,
            start_time: input.start_time,
            end_time: input.end_time,
            status: Status::Todo,
            repeat: input.repeat,
            category: input.category,
            day_of_week: input.day_of_week,
            successor_id: None,
        };
        self.tasks.push(task.clone());
        self.persist()?;
        Ok(task)
    }

    /// Moves a task to a new board column. Unknown ids are a no-op,
    /// returning `Ok(None)`.
    ///
    /// Completing a repeating task spawns its successor, unless one was
    /// already materialized by an earlier completion or sweep.
    pub fn transition(
        &mut self,
        id: TaskId,
        status: Status,
    ) -> Result<Option<Task>, StoreError> {
        let Some(idx) = self.tasks.iter().position(|t| t.id == id) else {
            return Ok(None);
        };
        self.tasks[idx].status = status;

        if status == Status::Done
            && self.tasks[idx].repeat != Repeat::None
            && self.tasks[idx].successor_id.is_none()
        {
            let next_id = TaskId::new();
            if let Some(next) = recurrence::spawn_successor(&self.tasks[idx], next_id) {
                self.tasks[idx].successor_id = Some(next_id);
                self.tasks.push(next);
            }
        }

        let updated = self.tasks[idx].clone();
        self.persist()?;
        Ok(Some(updated))
    }

    /// Removes a task. Unknown ids remove nothing.
    ///
    /// For a repeating task with `confirm_cascade` set, every task sharing
    /// the same title and repeat rule goes too (the board tracks repeating
    /// families by name, not by id). Returns how many tasks were removed.
    pub fn remove(&mut self, id: TaskId, confirm_cascade: bool) -> Result<usize, StoreError> {
        let Some(target) = self.tasks.iter().find(|t| t.id == id).cloned() else {
            return Ok(0);
        };
        let before = self.tasks.len();
        if target.repeat != Repeat::None && confirm_cascade {
            self.tasks
                .retain(|t| !(t.title == target.title && t.repeat == target.repeat));
        } else {
            self.tasks.retain(|t| t.id != id);
        }
        let removed = before - self.tasks.len();
        if removed > 0 {
            self.persist()?;
        }
        Ok(removed)
    }

    /// All tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Tasks in a given column, or every task when no filter is given.
    /// Insertion order is preserved.
    pub fn list(&self, filter: Option<Status>) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|t| filter.map_or(true, |s| t.status == s))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// First task whose title contains `fragment`, case-insensitively, in
    /// store order. Voice move commands resolve their target this way.
    pub fn find_by_title_fragment(&self, fragment: &str) -> Option<&Task> {
        let needle = fragment.trim().to_lowercase();
        self.tasks
            .iter()
            .find(|t| t.title.to_lowercase().contains(&needle))
    }

    /// Runs the recurrence catch-up sweep against the injected clock and
    /// persists if anything was appended. Returns the successor count.
    pub fn sweep(&mut self) -> Result<usize, StoreError> {
        let now = self.now();
        let spawned = recurrence::sweep(&mut self.tasks, now);
        if !spawned.is_empty() {
            self.persist()?;
        }
        Ok(spawned.len())
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        let s = serde_json::to_string_pretty(&self.tasks)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        self.storage.set(TASKS_KEY, &s)?;
        Ok(())
    }
}

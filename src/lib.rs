//! # taskboard
//!
//! A personal task board for the terminal. Tasks live in three columns
//! (To Do, In Progress, Done), carry a time window, and can repeat daily
//! or weekly. Besides plain subcommands, the board accepts free-form
//! voice-style commands such as
//! `"add task walk the dog at 2 pm for 1 hour"`.
//!
//! ## Features
//!
//! *   **Board columns**: move tasks freely between To Do, In Progress
//!     and Done, exactly as a drag on a kanban board would.
//! *   **Recurrence**: completing a daily or weekly task schedules its
//!     next occurrence automatically; a catch-up sweep fills in missed
//!     occurrences after idle periods.
//! *   **Voice commands**: the add-task and move-task spoken shapes are
//!     understood; everything else gets a usage hint.
//! *   **Templates**: builtin and custom presets pre-fill the title,
//!     duration and category of new tasks.
//! *   **Calendar export**: any task can be written out as an .ics file.
//! *   **Data persistence**: JSON files in the standard XDG data
//!     directory, overridable with `TASKBOARD_DIR`.

pub mod commands;
pub mod date;
pub mod error;
pub mod ical;
pub mod models;
pub mod recurrence;
pub mod storage;
pub mod store;
pub mod templates;
pub mod voice;

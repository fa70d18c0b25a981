use std::io::{self, Write};
use std::path::PathBuf;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::date::{add_minutes, truncate_to_hour};
use crate::ical;
use crate::models::{DayOfWeek, Repeat, Status, TaskId};
use crate::storage::FileStorage;
use crate::store::{NewTask, TaskStore};
use crate::templates::{prefill, TemplateCatalog};
use crate::voice::VoiceInterpreter;

/// Opens the task store over the default file-backed surface with the
/// wall clock, and runs the recurrence catch-up sweep once.
pub fn open_store(silent: bool) -> TaskStore {
    let mut store = TaskStore::open(
        Box::new(FileStorage::open_default()),
        Box::new(Local::now),
    );
    // One catch-up pass per process start; completion handles the rest.
    if let Err(e) = store.sweep() {
        if !silent {
            eprintln!("{}", e);
        }
    }
    store
}

fn open_catalog() -> TemplateCatalog {
    TemplateCatalog::open(Box::new(FileStorage::open_default()))
}

fn parse_datetime(s: &str) -> Option<DateTime<Local>> {
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .ok()?;
    Local.from_local_datetime(&naive).earliest()
}

fn parse_task_id(s: &str, silent: bool) -> Option<TaskId> {
    match s.parse() {
        Ok(id) => Some(id),
        Err(_) => {
            if !silent {
                eprintln!("Invalid task id '{}'.", s);
            }
            None
        }
    }
}

/// Adds a new task to the board.
///
/// A template pre-fills title, start and end; explicit flags win over the
/// template. Without a start the current hour is used.
pub fn cmd_add(
    title: Option<String>,
    start: Option<String>,
    end: Option<String>,
    duration_minutes: Option<i64>,
    repeat: Option<String>,
    category: Option<String>,
    day: Option<String>,
    template_name: Option<String>,
    silent: bool,
) {
    let mut final_title = title;
    let mut final_start = None;
    let mut final_end = None;
    let mut final_category = category;
    let mut final_day = None;
    let mut template_minutes = None;

    if let Some(name) = &template_name {
        let catalog = open_catalog();
        let Some(tmpl) = catalog.find_by_title(name) else {
            if !silent {
                eprintln!("Template '{}' not found.", name);
            }
            return;
        };
        let (t_title, t_start, _) = prefill(tmpl, Local::now());
        if final_title.is_none() {
            final_title = Some(t_title);
        }
        final_start = Some(t_start);
        template_minutes = Some(tmpl.duration_minutes as i64);
        if final_category.is_none() {
            final_category = tmpl.category.clone();
        }
        final_day = tmpl.day_of_week;
    }

    let Some(final_title) = final_title else {
        if !silent {
            eprintln!("A title is required (directly or via --template).");
        }
        return;
    };

    if let Some(s) = &start {
        match parse_datetime(s) {
            Some(t) => final_start = Some(t),
            None => {
                if !silent {
                    eprintln!("Invalid start time '{}'. Use YYYY-MM-DD HH:MM.", s);
                }
                return;
            }
        }
    }
    let start_time = final_start.unwrap_or_else(|| truncate_to_hour(Local::now()));

    if let Some(s) = &end {
        match parse_datetime(s) {
            Some(t) => final_end = Some(t),
            None => {
                if !silent {
                    eprintln!("Invalid end time '{}'. Use YYYY-MM-DD HH:MM.", s);
                }
                return;
            }
        }
    } else if let Some(mins) = duration_minutes.or(template_minutes) {
        final_end = Some(add_minutes(start_time, mins));
    }
    let end_time = final_end.unwrap_or_else(|| add_minutes(start_time, 60));

    let repeat = match &repeat {
        Some(r) => match Repeat::parse(r) {
            Some(r) => r,
            None => {
                if !silent {
                    eprintln!("Unknown repeat '{}'. Supported: none, daily, weekly.", r);
                }
                return;
            }
        },
        None => Repeat::None,
    };

    if let Some(d) = &day {
        match DayOfWeek::parse(d) {
            Some(d) => final_day = Some(d),
            None => {
                if !silent {
                    eprintln!("Unknown day '{}'.", d);
                }
                return;
            }
        }
    }

    let mut store = open_store(silent);
    let input = NewTask {
        title: final_title,
        start_time,
        end_time,
        repeat,
        category: final_category,
        day_of_week: final_day,
    };
    match store.create(input) {
        Ok(task) => {
            if !silent {
                println!("Task added (id = {})", task.id);
            }
        }
        Err(e) => {
            if !silent {
                eprintln!("{}", e);
            }
        }
    }
}

/// Lists the board in a formatted table, optionally one column only.
pub fn cmd_list(status: Option<String>) {
    let filter = match &status {
        Some(s) => match Status::parse(s) {
            Some(s) => Some(s),
            None => {
                eprintln!("Unknown status '{}'. Supported: todo, inprogress, done.", s);
                return;
            }
        },
        None => None,
    };

    let store = open_store(false);
    let tasks = store.list(filter);
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Start").add_attribute(Attribute::Bold),
            Cell::new("End").add_attribute(Attribute::Bold),
            Cell::new("Repeat").add_attribute(Attribute::Bold),
            Cell::new("Category").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    for t in tasks {
        let status_color = match t.status {
            Status::Todo => Color::Yellow,
            Status::InProgress => Color::Cyan,
            Status::Done => Color::Green,
        };
        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(&t.title),
            Cell::new(t.start_time.format("%Y-%m-%d %H:%M")),
            Cell::new(t.end_time.format("%Y-%m-%d %H:%M")),
            Cell::new(t.repeat),
            Cell::new(t.category.unwrap_or_default()),
            Cell::new(t.status).fg(status_color),
        ]);
    }

    println!("{table}");
}

/// Moves a task to another column (the CLI stand-in for a board drag).
pub fn cmd_move(id: String, status: String, silent: bool) {
    let Some(id) = parse_task_id(&id, silent) else {
        return;
    };
    let Some(status) = Status::parse(&status) else {
        if !silent {
            eprintln!("Unknown status '{}'. Supported: todo, inprogress, done.", status);
        }
        return;
    };
    let mut store = open_store(silent);
    match store.transition(id, status) {
        Ok(Some(task)) => {
            if !silent {
                println!("Task '{}' moved to {}.", task.title, task.status);
            }
        }
        Ok(None) => {
            if !silent {
                eprintln!("Task {} not found.", id);
            }
        }
        Err(e) => {
            if !silent {
                eprintln!("{}", e);
            }
        }
    }
}

/// Removes a task. For repeating tasks, prompts whether to remove the
/// whole family unless `--cascade` or `--keep-others` decided already.
pub fn cmd_remove(id: String, cascade: Option<bool>, silent: bool) {
    let Some(id) = parse_task_id(&id, silent) else {
        return;
    };
    let mut store = open_store(silent);
    let Some(task) = store.get(id).cloned() else {
        if !silent {
            eprintln!("Task {} not found.", id);
        }
        return;
    };

    let confirm_cascade = match cascade {
        Some(c) => c,
        None if task.repeat != Repeat::None => {
            print!(
                "'{}' is a repeating task. Remove all its occurrences? [y/N] ",
                task.title
            );
            let _ = io::stdout().flush();
            let mut input = String::new();
            let _ = io::stdin().read_line(&mut input);
            input.trim().to_lowercase() == "y"
        }
        None => false,
    };

    match store.remove(id, confirm_cascade) {
        Ok(0) => {
            if !silent {
                eprintln!("Task {} not found.", id);
            }
        }
        Ok(n) => {
            if !silent {
                println!("Removed {} task(s).", n);
            }
        }
        Err(e) => {
            if !silent {
                eprintln!("{}", e);
            }
        }
    }
}

/// Interprets one utterance as a voice command and prints the response.
pub fn cmd_say(utterance: Vec<String>, silent: bool) {
    let mut store = open_store(silent);
    let interpreter = VoiceInterpreter::new();
    let response = interpreter.interpret(&mut store, &utterance.join(" "));
    if !silent {
        println!("{}", response);
    }
}

/// Runs the recurrence catch-up sweep explicitly.
pub fn cmd_sweep(silent: bool) {
    let mut store = open_store(silent);
    match store.sweep() {
        Ok(n) => {
            if !silent {
                println!("{} recurring task(s) scheduled.", n);
            }
        }
        Err(e) => {
            if !silent {
                eprintln!("{}", e);
            }
        }
    }
}

/// Writes a task as an .ics calendar file.
pub fn cmd_export(id: String, output: Option<PathBuf>, silent: bool) {
    let Some(id) = parse_task_id(&id, silent) else {
        return;
    };
    let store = open_store(silent);
    let Some(task) = store.get(id) else {
        if !silent {
            eprintln!("Task {} not found.", id);
        }
        return;
    };
    let path = output.unwrap_or_else(|| PathBuf::from(format!("{}.ics", task.title)));
    match std::fs::write(&path, ical::event_for(task)) {
        Ok(()) => {
            if !silent {
                println!("Exported '{}' to {}.", task.title, path.display());
            }
        }
        Err(e) => {
            if !silent {
                eprintln!("Failed to write {}: {}", path.display(), e);
            }
        }
    }
}

/// Adds a custom task template.
pub fn cmd_template_add(title: String, duration: u32, category: Option<String>, day: Option<String>, silent: bool) {
    if duration != 60 && duration != 120 {
        if !silent {
            eprintln!("Duration must be 60 or 120 minutes.");
        }
        return;
    }
    let day = match &day {
        Some(d) => match DayOfWeek::parse(d) {
            Some(d) => Some(d),
            None => {
                if !silent {
                    eprintln!("Unknown day '{}'.", d);
                }
                return;
            }
        },
        None => None,
    };
    let mut catalog = open_catalog();
    match catalog.add(title.clone(), duration, category, day) {
        Ok(_) => {
            if !silent {
                println!("Template '{}' added.", title);
            }
        }
        Err(e) => {
            if !silent {
                eprintln!("Failed to save templates: {}", e);
            }
        }
    }
}

/// Lists all templates, builtins first.
pub fn cmd_template_list() {
    let catalog = open_catalog();
    let templates = catalog.all();
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["ID", "Title", "Minutes", "Category", "Day", "Custom"]);
    for t in templates {
        table.add_row(vec![
            t.id,
            t.title,
            t.duration_minutes.to_string(),
            t.category.unwrap_or_else(|| "-".into()),
            t.day_of_week
                .map(|d| format!("{:?}", d).to_lowercase())
                .unwrap_or_else(|| "-".into()),
            if t.is_custom { "yes".into() } else { "no".into() },
        ]);
    }
    println!("{table}");
}

/// Removes a custom template by id. Builtins cannot be removed.
pub fn cmd_template_remove(id: String, silent: bool) {
    let mut catalog = open_catalog();
    match catalog.remove(&id) {
        Ok(true) => {
            if !silent {
                println!("Template removed.");
            }
        }
        Ok(false) => {
            if !silent {
                eprintln!("No custom template with id '{}' (builtins cannot be removed).", id);
            }
        }
        Err(e) => {
            if !silent {
                eprintln!("Failed to save templates: {}", e);
            }
        }
    }
}

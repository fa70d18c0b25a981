//! Minimal iCalendar export for a single task.

use chrono::{DateTime, Local, Utc};

use crate::models::Task;

fn format_utc(t: DateTime<Local>) -> String {
    t.with_timezone(&Utc).format("%Y%m%dT%H%M%SZ").to_string()
}

/// Renders one task as a VCALENDAR envelope with a single VEVENT.
/// Timestamps use UTC basic format (`YYYYMMDDTHHMMSSZ`).
pub fn event_for(task: &Task) -> String {
    [
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        "BEGIN:VEVENT".to_string(),
        format!("SUMMARY:{}", task.title),
        format!("DTSTART:{}", format_utc(task.start_time)),
        format!("DTEND:{}", format_utc(task.end_time)),
        "END:VEVENT".to_string(),
        "END:VCALENDAR".to_string(),
    ]
    .join("\n")
}

//! Voice command interpretation.
//!
//! One utterance maps to at most one store mutation. Rules are evaluated
//! in order, first match wins; anything unmatched yields the fixed
//! guidance message. The interpreter never errors: every outcome, success
//! or failure, is a returned response string.

use chrono::{Duration, TimeZone};
use regex::{Captures, Regex};
use thiserror::Error;

use crate::models::Status;
use crate::store::{NewTask, TaskStore};

/// Guidance returned for utterances matching neither command shape.
pub const NOT_RECOGNIZED: &str = "Command not recognized. Try \"add task [title] at [time] for [duration] hour\" or \"move task [title] to [status]\"";

type Handler = fn(&Captures, &mut TaskStore) -> String;

pub struct VoiceInterpreter {
    rules: Vec<(Regex, Handler)>,
}

impl VoiceInterpreter {
    pub fn new() -> VoiceInterpreter {
        // Ordered: add-task is tried before move-task. Patterns run
        // against the lowercased utterance.
        let rules: Vec<(Regex, Handler)> = vec![
            (
                Regex::new(r"add task (.+?) at (\d{1,2})\s*([ap]m) for (\d+) hours?")
                    .expect("add-task pattern"),
                handle_add,
            ),
            (
                Regex::new(r"move task (.+?) to (todo|in progress|done)")
                    .expect("move-task pattern"),
                handle_move,
            ),
        ];
        VoiceInterpreter { rules }
    }

    /// Maps one transcribed utterance to at most one store mutation and
    /// returns the spoken-back response.
    pub fn interpret(&self, store: &mut TaskStore, utterance: &str) -> String {
        let normalized = utterance.to_lowercase();
        for (pattern, handler) in &self.rules {
            if let Some(caps) = pattern.captures(&normalized) {
                return handler(&caps, store);
            }
        }
        NOT_RECOGNIZED.to_string()
    }
}

impl Default for VoiceInterpreter {
    fn default() -> Self {
        VoiceInterpreter::new()
    }
}

fn handle_add(caps: &Captures, store: &mut TaskStore) -> String {
    let title = caps[1].trim().to_string();
    // The hour is at most two digits.
    let hour: u32 = caps[2].parse().unwrap_or(0);
    let meridiem = &caps[3];
    let Ok(duration_hours) = caps[4].parse::<i64>() else {
        return format!("Could not understand the duration \"{} hours\"", &caps[4]);
    };

    // 12-hour clock: "12 am" is midnight, "12 pm" is noon.
    let hour24 = (hour % 12) + if meridiem == "pm" { 12 } else { 0 };
    let now = store.now();
    let naive = match now.date_naive().and_hms_opt(hour24, 0, 0) {
        Some(n) => n,
        None => return format!("Could not understand the time \"{} {}\"", hour, meridiem),
    };
    let start = match chrono::Local.from_local_datetime(&naive).earliest() {
        Some(t) => t,
        None => return format!("Could not understand the time \"{} {}\"", hour, meridiem),
    };
    let end = match Duration::try_hours(duration_hours).and_then(|d| start.checked_add_signed(d)) {
        Some(t) => t,
        None => return format!("Could not understand the duration \"{} hours\"", duration_hours),
    };

    match store.create(NewTask::new(title.clone(), start, end, Default::default())) {
        Ok(task) => format!("Added task: {}", task.title),
        Err(e) => format!("Could not add task: {}", e),
    }
}

fn handle_move(caps: &Captures, store: &mut TaskStore) -> String {
    let fragment = caps[1].trim().to_string();
    let spoken_status = caps[2].to_string();
    // The pattern only admits the three spoken forms.
    let Some(status) = Status::parse(&spoken_status) else {
        return NOT_RECOGNIZED.to_string();
    };

    let Some(id) = store.find_by_title_fragment(&fragment).map(|t| t.id) else {
        return format!("Task not found: {}", fragment);
    };
    match store.transition(id, status) {
        Ok(_) => format!("Moved task: {} to {}", fragment, spoken_status),
        Err(e) => format!("Could not move task: {}", e),
    }
}

/// External speech capture: once started it yields exactly one final
/// transcript or one error code, then completes. Transcription itself is
/// outside the core; the CLI's `say` subcommand plays this role with text
/// typed on the command line.
pub trait SpeechCapture {
    fn capture(&mut self) -> Result<String, SpeechError>;
}

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("speech capture is not available")]
    Unavailable,
    #[error("recognition error: {0}")]
    Recognition(String),
}

/// Runs one capture activation end to end: listens for a phrase, hands
/// the transcript to the interpreter, and returns the response. Capture
/// failures become response strings like every other failure here.
pub fn capture_and_interpret(
    capture: &mut dyn SpeechCapture,
    interpreter: &VoiceInterpreter,
    store: &mut TaskStore,
) -> String {
    match capture.capture() {
        Ok(transcript) => interpreter.interpret(store, &transcript),
        Err(e) => format!("Error: {}", e),
    }
}

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::PathBuf;

/// The durable key-value surface the store persists through.
///
/// `get` returns `None` for an absent key; `set` replaces the full value.
/// There is no schema versioning on the stored text.
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> std::io::Result<()>;
}

/// Key under which the full task collection is serialized.
pub const TASKS_KEY: &str = "tasks";
/// Key under which user-created templates are serialized.
pub const TEMPLATES_KEY: &str = "custom-templates";

/// File-backed storage: one JSON file per key inside the data directory.
///
/// The directory is resolved in the following order:
/// 1. `TASKBOARD_DIR` environment variable.
/// 2. `~/.local/share/taskboard` (on Linux).
/// 3. `.` (fallback).
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn open_default() -> FileStorage {
        let dir = std::env::var("TASKBOARD_DIR").map(PathBuf::from).unwrap_or_else(|_| {
            let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
            p.push("taskboard");
            p
        });
        if !dir.exists() {
            let _ = fs::create_dir_all(&dir);
        }
        FileStorage { dir }
    }

    pub fn at(dir: PathBuf) -> FileStorage {
        FileStorage { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let mut p = self.dir.clone();
        p.push(format!("{}.json", key));
        p
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        if !path.exists() {
            return None;
        }
        let mut f = OpenOptions::new().read(true).open(&path).ok()?;
        let mut s = String::new();
        f.read_to_string(&mut s).ok()?;
        Some(s)
    }

    fn set(&mut self, key: &str, value: &str) -> std::io::Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(self.path_for(key))?;
        f.write_all(value.as_bytes())?;
        Ok(())
    }
}

/// In-memory storage for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> MemoryStorage {
        MemoryStorage::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> std::io::Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

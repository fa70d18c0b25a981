//! Reusable task templates: a fixed set of builtins plus user-created
//! customs persisted on the storage surface. Builtins can be edited in
//! memory (shadowed) but never deleted.

use chrono::{DateTime, Local};
use uuid::Uuid;

use crate::date::{add_minutes, truncate_to_hour};
use crate::models::{DayOfWeek, TaskTemplate};
use crate::storage::{Storage, TEMPLATES_KEY};

fn builtin_templates() -> Vec<TaskTemplate> {
    vec![
        TaskTemplate {
            id: "wash-car".into(),
            title: "Wash the car".into(),
            duration_minutes: 120,
            category: Some("Maintenance".into()),
            day_of_week: Some(DayOfWeek::Saturday),
            is_custom: false,
        },
        TaskTemplate {
            id: "walk-dog".into(),
            title: "Walk the dog".into(),
            duration_minutes: 60,
            category: Some("Pets".into()),
            day_of_week: Some(DayOfWeek::Monday),
            is_custom: false,
        },
    ]
}

pub struct TemplateCatalog {
    builtins: Vec<TaskTemplate>,
    customs: Vec<TaskTemplate>,
    storage: Box<dyn Storage>,
}

impl TemplateCatalog {
    /// Opens the catalog, hydrating customs from the `custom-templates`
    /// key. Corrupt or missing data means no customs.
    pub fn open(storage: Box<dyn Storage>) -> TemplateCatalog {
        let customs = storage
            .get(TEMPLATES_KEY)
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default();
        TemplateCatalog {
            builtins: builtin_templates(),
            customs,
            storage,
        }
    }

    /// Builtins first (with any in-memory edits applied), then customs.
    pub fn all(&self) -> Vec<TaskTemplate> {
        let mut out = self.builtins.clone();
        out.extend(self.customs.iter().cloned());
        out
    }

    pub fn get(&self, id: &str) -> Option<&TaskTemplate> {
        self.builtins
            .iter()
            .chain(self.customs.iter())
            .find(|t| t.id == id)
    }

    /// First template whose title contains `fragment`, case-insensitively.
    pub fn find_by_title(&self, fragment: &str) -> Option<&TaskTemplate> {
        let needle = fragment.trim().to_lowercase();
        self.builtins
            .iter()
            .chain(self.customs.iter())
            .find(|t| t.title.to_lowercase().contains(&needle))
    }

    /// Adds a custom template and persists the custom set.
    pub fn add(
        &mut self,
        title: String,
        duration_minutes: u32,
        category: Option<String>,
        day_of_week: Option<DayOfWeek>,
    ) -> std::io::Result<TaskTemplate> {
        let template = TaskTemplate {
            id: Uuid::new_v4().to_string(),
            title,
            duration_minutes,
            category,
            day_of_week,
            is_custom: true,
        };
        self.customs.push(template.clone());
        self.persist()?;
        Ok(template)
    }

    /// Replaces a template by id. Customs are persisted; builtins are
    /// shadowed in memory only and revert on the next open.
    pub fn update(&mut self, template: TaskTemplate) -> std::io::Result<bool> {
        if template.is_custom {
            let Some(t) = self.customs.iter_mut().find(|t| t.id == template.id) else {
                return Ok(false);
            };
            *t = template;
            self.persist()?;
        } else {
            let Some(t) = self.builtins.iter_mut().find(|t| t.id == template.id) else {
                return Ok(false);
            };
            *t = template;
        }
        Ok(true)
    }

    /// Removes a custom template by id. Builtins are never removed;
    /// asking to remove one returns `false`.
    pub fn remove(&mut self, id: &str) -> std::io::Result<bool> {
        let before = self.customs.len();
        self.customs.retain(|t| t.id != id);
        if self.customs.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    fn persist(&mut self) -> std::io::Result<()> {
        let s = serde_json::to_string_pretty(&self.customs)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        self.storage.set(TEMPLATES_KEY, &s)
    }
}

/// Form prefill values derived from a template: the title, a start
/// snapped to the current hour, and an end one duration later.
pub fn prefill(
    template: &TaskTemplate,
    now: DateTime<Local>,
) -> (String, DateTime<Local>, DateTime<Local>) {
    let start = truncate_to_hour(now);
    let end = add_minutes(start, template.duration_minutes as i64);
    (template.title.clone(), start, end)
}

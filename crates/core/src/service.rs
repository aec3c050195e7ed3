//! Reminder and list operations against the Reminders app.
//!
//! Reads go through JXA scripts that emit JSON; writes go through
//! AppleScript. Filtering happens here, on this side of the bridge.

use crate::error::{Error, Result};
use crate::exec::{Osascript, ScriptRunner};
use crate::model::{extract_url, List, ListFilter, Priority, Reminder};
use crate::script::{self, ReminderUpdate};
use chrono::{DateTime, Local};
use serde::Deserialize;

const ID_SCHEME: &str = "x-apple-reminder://";

/// The JSON shape the JXA read scripts emit per reminder.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireReminder {
    id: String,
    name: String,
    body: Option<String>,
    list_name: String,
    completed: bool,
    flagged: bool,
    priority: u8,
    due_date: Option<String>,
    remind_me_date: Option<String>,
    completion_date: Option<String>,
    creation_date: Option<String>,
    mod_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireList {
    id: String,
    name: String,
    count: usize,
}

fn parse_iso(s: &str) -> Option<DateTime<Local>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|t| t.with_timezone(&Local))
}

impl From<WireReminder> for Reminder {
    fn from(w: WireReminder) -> Self {
        let body = w.body.unwrap_or_default();
        let url = extract_url(&body).unwrap_or_default();
        Reminder {
            id: w.id,
            name: w.name,
            list_name: w.list_name,
            completed: w.completed,
            flagged: w.flagged,
            priority: Priority::from(w.priority),
            due_date: w.due_date.as_deref().and_then(parse_iso),
            remind_me_date: w.remind_me_date.as_deref().and_then(parse_iso),
            completion_date: w.completion_date.as_deref().and_then(parse_iso),
            creation_date: w.creation_date.as_deref().and_then(parse_iso),
            modification_date: w.mod_date.as_deref().and_then(parse_iso),
            body,
            url,
        }
    }
}

/// Full ID, bare UUID, or short prefix.
fn id_matches(full: &str, query: &str) -> bool {
    if full == query {
        return true;
    }
    let bare = full.strip_prefix(ID_SCHEME).unwrap_or(full);
    let query = query.strip_prefix(ID_SCHEME).unwrap_or(query);
    !query.is_empty() && bare.starts_with(query)
}

/// Operations on individual reminders.
pub struct ReminderService<R = Osascript> {
    runner: R,
}

impl ReminderService<Osascript> {
    #[must_use]
    pub fn new() -> Self {
        Self { runner: Osascript }
    }
}

impl Default for ReminderService<Osascript> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ScriptRunner> ReminderService<R> {
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    /// Create a reminder and return its ID. Falls back to the app's
    /// default list when no list name is set.
    pub fn create(&self, r: &Reminder) -> Result<String> {
        if r.name.is_empty() {
            return Err(Error::NameRequired);
        }

        let list_name = if r.list_name.is_empty() {
            self.runner.run(script::DEFAULT_LIST_NAME)?
        } else {
            r.list_name.clone()
        };

        self.runner.run(&script::create_reminder(r, &list_name))
    }

    /// All reminders passing `filter`.
    pub fn list(&self, filter: &ListFilter) -> Result<Vec<Reminder>> {
        let output = self.runner.run_jxa(script::FETCH_REMINDERS)?;
        if output.is_empty() || output == "[]" {
            return Ok(Vec::new());
        }

        let wire: Vec<WireReminder> = serde_json::from_str(&output)?;
        Ok(wire
            .into_iter()
            .map(Reminder::from)
            .filter(|r| filter.matches(r))
            .collect())
    }

    /// Find one reminder by full ID, bare UUID, or short ID prefix.
    pub fn get(&self, id: &str) -> Result<Reminder> {
        let all = self.list(&ListFilter::default())?;
        all.into_iter()
            .find(|r| id_matches(&r.id, id))
            .ok_or_else(|| Error::ReminderNotFound(id.to_string()))
    }

    pub fn update(&self, id: &str, update: &ReminderUpdate) -> Result<()> {
        let Some(script) = script::update_reminder(id, update) else {
            return Ok(());
        };
        self.runner.run(&script)?;
        Ok(())
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        self.runner.run(&script::delete_reminder(id))?;
        Ok(())
    }

    pub fn complete(&self, id: &str) -> Result<()> {
        self.set_completed(id, true)
    }

    pub fn uncomplete(&self, id: &str) -> Result<()> {
        self.set_completed(id, false)
    }

    pub fn flag(&self, id: &str) -> Result<()> {
        self.set_flagged(id, true)
    }

    pub fn unflag(&self, id: &str) -> Result<()> {
        self.set_flagged(id, false)
    }

    fn set_completed(&self, id: &str, completed: bool) -> Result<()> {
        self.update(
            id,
            &ReminderUpdate {
                completed: Some(completed),
                ..ReminderUpdate::default()
            },
        )
    }

    fn set_flagged(&self, id: &str, flagged: bool) -> Result<()> {
        self.update(
            id,
            &ReminderUpdate {
                flagged: Some(flagged),
                ..ReminderUpdate::default()
            },
        )
    }
}

/// Operations on reminder lists.
pub struct ListService<R = Osascript> {
    runner: R,
}

impl ListService<Osascript> {
    #[must_use]
    pub fn new() -> Self {
        Self { runner: Osascript }
    }
}

impl Default for ListService<Osascript> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ScriptRunner> ListService<R> {
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    pub fn lists(&self) -> Result<Vec<List>> {
        let output = self.runner.run_jxa(script::FETCH_LISTS)?;
        if output.is_empty() || output == "[]" {
            return Ok(Vec::new());
        }

        let wire: Vec<WireList> = serde_json::from_str(&output)?;
        Ok(wire
            .into_iter()
            .map(|w| List {
                id: w.id,
                name: w.name,
                count: w.count,
            })
            .collect())
    }

    pub fn get(&self, name: &str) -> Result<List> {
        self.lists()?
            .into_iter()
            .find(|l| l.name == name)
            .ok_or_else(|| Error::ListNotFound(name.to_string()))
    }

    pub fn create(&self, name: &str) -> Result<List> {
        if name.is_empty() {
            return Err(Error::ListNameRequired);
        }
        let id = self.runner.run(&script::create_list(name))?;
        Ok(List {
            id,
            name: name.to_string(),
            count: 0,
        })
    }

    pub fn rename(&self, old_name: &str, new_name: &str) -> Result<()> {
        self.runner.run(&script::rename_list(old_name, new_name))?;
        Ok(())
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        self.runner.run(&script::delete_list(name))?;
        Ok(())
    }

    pub fn default_list_name(&self) -> Result<String> {
        self.runner.run(script::DEFAULT_LIST_NAME)
    }
}

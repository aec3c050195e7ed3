//! Reminder and list data model.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Reminder priority.
///
/// The Reminders app stores priority as a 0-9 level where 1 is highest;
/// the canonical levels written back are 0 (none), 1 (high), 5 (medium)
/// and 9 (low). Any other level read from the app is banded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum Priority {
    #[default]
    None,
    High,
    Medium,
    Low,
}

impl Priority {
    /// The numeric level written to the app and to exports.
    #[must_use]
    pub fn level(self) -> u8 {
        match self {
            Self::None => 0,
            Self::High => 1,
            Self::Medium => 5,
            Self::Low => 9,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Parse a user-supplied priority word. Unknown words mean no priority.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "high" | "h" | "1" => Self::High,
            "medium" | "med" | "m" | "5" => Self::Medium,
            "low" | "l" | "9" => Self::Low,
            _ => Self::None,
        }
    }
}

impl From<u8> for Priority {
    fn from(level: u8) -> Self {
        match level {
            1..=4 => Self::High,
            5 => Self::Medium,
            6..=9 => Self::Low,
            _ => Self::None,
        }
    }
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> Self {
        p.level()
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single reminder item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub name: String,
    pub body: String,
    pub list_name: String,
    pub due_date: Option<DateTime<Local>>,
    pub remind_me_date: Option<DateTime<Local>>,
    pub completion_date: Option<DateTime<Local>>,
    pub creation_date: Option<DateTime<Local>>,
    pub modification_date: Option<DateTime<Local>>,
    pub priority: Priority,
    pub flagged: bool,
    pub completed: bool,
    /// Stored in the body, extracted for convenience.
    pub url: String,
}

/// A Reminders list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct List {
    pub id: String,
    pub name: String,
    /// Number of reminders in the list.
    pub count: usize,
}

/// Criteria for filtering reminders when listing.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub list_name: Option<String>,
    pub completed: Option<bool>,
    pub flagged: Option<bool>,
    pub due_before: Option<DateTime<Local>>,
    pub due_after: Option<DateTime<Local>>,
    pub search: Option<String>,
}

impl ListFilter {
    /// Whether a reminder passes every set criterion. Date bounds only
    /// apply to reminders that have a due date.
    #[must_use]
    pub fn matches(&self, r: &Reminder) -> bool {
        if let Some(list) = &self.list_name {
            if !r.list_name.eq_ignore_ascii_case(list) {
                return false;
            }
        }
        if let Some(completed) = self.completed {
            if r.completed != completed {
                return false;
            }
        }
        if let Some(flagged) = self.flagged {
            if r.flagged != flagged {
                return false;
            }
        }
        if let Some(before) = self.due_before {
            match r.due_date {
                Some(due) if due < before => {}
                _ => return false,
            }
        }
        if let Some(after) = self.due_after {
            match r.due_date {
                Some(due) if due > after => {}
                _ => return false,
            }
        }
        if let Some(query) = &self.search {
            let query = query.to_lowercase();
            if !r.name.to_lowercase().contains(&query) && !r.body.to_lowercase().contains(&query) {
                return false;
            }
        }
        true
    }
}

/// Extract a URL from a reminder body: either a `URL: ` line or a bare
/// http(s) line.
#[must_use]
pub fn extract_url(body: &str) -> Option<String> {
    for line in body.lines() {
        let line = line.trim();
        if let Some(url) = line.strip_prefix("URL: ") {
            return Some(url.to_string());
        }
        if line.starts_with("http://") || line.starts_with("https://") {
            return Some(line.to_string());
        }
    }
    None
}

//! AppleScript and JXA source builders.
//!
//! Everything here is pure string assembly; execution lives in [`crate::exec`].
//! Writes go through AppleScript, reads through JXA scripts that emit JSON
//! (see [`crate::service`] for the wire structs).

use crate::model::{Priority, Reminder};
use chrono::{DateTime, Datelike, Local, Timelike};

/// Escape a string for use inside a double-quoted AppleScript literal.
#[must_use]
pub fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Escape a string for use inside a JXA JavaScript string literal.
#[must_use]
pub fn escape_jxa(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// AppleScript block that builds a date value into `var_name`.
///
/// AppleScript has no date literal, so the date is assembled field by field
/// from `current date`.
#[must_use]
pub fn date_setup(var_name: &str, t: DateTime<Local>) -> String {
    format!(
        "set {var} to current date\n\
         set year of {var} to {year}\n\
         set month of {var} to {month}\n\
         set day of {var} to {day}\n\
         set hours of {var} to {hours}\n\
         set minutes of {var} to {minutes}\n\
         set seconds of {var} to {seconds}",
        var = var_name,
        year = t.year(),
        month = t.month(),
        day = t.day(),
        hours = t.hour(),
        minutes = t.minute(),
        seconds = t.second(),
    )
}

/// Fold an explicit URL into the body text the way the app stores it.
#[must_use]
pub fn body_with_url(body: &str, url: &str) -> String {
    if url.is_empty() {
        return body.to_string();
    }
    if body.is_empty() {
        format!("URL: {url}")
    } else {
        format!("{body}\n\nURL: {url}")
    }
}

/// Script that creates a reminder in `list_name` and returns its ID.
#[must_use]
pub fn create_reminder(r: &Reminder, list_name: &str) -> String {
    let mut date_lines = String::new();
    let mut props = vec![format!("name:\"{}\"", escape(&r.name))];

    let body = body_with_url(&r.body, &r.url);
    if !body.is_empty() {
        props.push(format!("body:\"{}\"", escape(&body)));
    }

    if let Some(due) = r.due_date {
        date_lines.push_str(&date_setup("dueDate", due));
        date_lines.push('\n');
        props.push("due date:dueDate".to_string());
    }

    if let Some(remind) = r.remind_me_date {
        date_lines.push_str(&date_setup("remindDate", remind));
        date_lines.push('\n');
        props.push("remind me date:remindDate".to_string());
    }

    if r.priority != Priority::None {
        props.push(format!("priority:{}", r.priority.level()));
    }

    if r.flagged {
        props.push("flagged:true".to_string());
    }

    format!(
        "{date_lines}\
         tell application \"Reminders\"\n\
         \ttell list \"{list}\"\n\
         \t\tset newReminder to make new reminder at end with properties {{{props}}}\n\
         \t\treturn id of newReminder\n\
         \tend tell\n\
         end tell",
        list = escape(list_name),
        props = props.join(", "),
    )
}

/// A partial update to an existing reminder. Unset fields are left alone;
/// the nested `Option` on dates distinguishes "clear" from "leave".
#[derive(Debug, Clone, Default)]
pub struct ReminderUpdate {
    pub name: Option<String>,
    pub body: Option<String>,
    pub due_date: Option<Option<DateTime<Local>>>,
    pub remind_me_date: Option<Option<DateTime<Local>>>,
    pub priority: Option<Priority>,
    pub flagged: Option<bool>,
    pub completed: Option<bool>,
}

impl ReminderUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.body.is_none()
            && self.due_date.is_none()
            && self.remind_me_date.is_none()
            && self.priority.is_none()
            && self.flagged.is_none()
            && self.completed.is_none()
    }
}

/// Script that applies `update` to the reminder with the given ID, or
/// `None` when there is nothing to do.
#[must_use]
pub fn update_reminder(id: &str, update: &ReminderUpdate) -> Option<String> {
    let mut date_lines = String::new();
    let mut statements = Vec::new();

    if let Some(name) = &update.name {
        statements.push(format!("set name of r to \"{}\"", escape(name)));
    }
    if let Some(body) = &update.body {
        statements.push(format!("set body of r to \"{}\"", escape(body)));
    }
    if let Some(due) = &update.due_date {
        match due {
            Some(t) => {
                date_lines.push_str(&date_setup("newDueDate", *t));
                date_lines.push('\n');
                statements.push("set due date of r to newDueDate".to_string());
            }
            None => statements.push("set due date of r to missing value".to_string()),
        }
    }
    if let Some(remind) = &update.remind_me_date {
        match remind {
            Some(t) => {
                date_lines.push_str(&date_setup("newRemindDate", *t));
                date_lines.push('\n');
                statements.push("set remind me date of r to newRemindDate".to_string());
            }
            None => statements.push("set remind me date of r to missing value".to_string()),
        }
    }
    if let Some(priority) = update.priority {
        statements.push(format!("set priority of r to {}", priority.level()));
    }
    if let Some(flagged) = update.flagged {
        statements.push(format!("set flagged of r to {flagged}"));
    }
    if let Some(completed) = update.completed {
        statements.push(format!("set completed of r to {completed}"));
    }

    if statements.is_empty() {
        return None;
    }

    Some(format!(
        "{date_lines}\
         tell application \"Reminders\"\n\
         \tset r to first reminder whose id is \"{id}\"\n\
         \t{statements}\n\
         end tell",
        id = escape(id),
        statements = statements.join("\n\t"),
    ))
}

/// Script that deletes the reminder with the given ID.
#[must_use]
pub fn delete_reminder(id: &str) -> String {
    format!(
        "tell application \"Reminders\"\n\
         \tdelete (first reminder whose id is \"{}\")\n\
         end tell",
        escape(id)
    )
}

/// Script that creates a list and returns its ID.
#[must_use]
pub fn create_list(name: &str) -> String {
    format!(
        "tell application \"Reminders\"\n\
         \tset newList to make new list with properties {{name:\"{}\"}}\n\
         \treturn id of newList\n\
         end tell",
        escape(name)
    )
}

/// Script that renames a list.
#[must_use]
pub fn rename_list(old_name: &str, new_name: &str) -> String {
    format!(
        "tell application \"Reminders\"\n\
         \tset name of list \"{}\" to \"{}\"\n\
         end tell",
        escape(old_name),
        escape(new_name)
    )
}

/// Script that deletes a list. May not work on all macOS versions.
#[must_use]
pub fn delete_list(name: &str) -> String {
    format!(
        "tell application \"Reminders\"\n\
         \tdelete list \"{}\"\n\
         end tell",
        escape(name)
    )
}

/// Script that returns the name of the default list.
pub const DEFAULT_LIST_NAME: &str =
    r#"tell application "Reminders" to get name of default list"#;

/// JXA script: all lists as a JSON array of `{id, name, count}`.
pub const FETCH_LISTS: &str = r#"
const app = Application('Reminders');
const out = [];
for (const list of app.lists()) {
    out.push({id: list.id(), name: list.name(), count: list.reminders.length});
}
JSON.stringify(out);"#;

/// JXA script: every reminder in every list as a JSON array.
///
/// Properties are fetched column-wise per list (one Apple Event per
/// property instead of one per reminder), which is what keeps this usable
/// on large lists.
pub const FETCH_REMINDERS: &str = r#"
const app = Application('Reminders');
const out = [];
const iso = (d) => d ? d.toISOString() : null;
for (const list of app.lists()) {
    const rs = list.reminders;
    const n = rs.length;
    if (n === 0) continue;
    const listName = list.name();
    const ids = rs.id();
    const names = rs.name();
    const bodies = rs.body();
    const completed = rs.completed();
    const flagged = rs.flagged();
    const priorities = rs.priority();
    const dueDates = rs.dueDate();
    const remindDates = rs.remindMeDate();
    const completionDates = rs.completionDate();
    const creationDates = rs.creationDate();
    const modDates = rs.modificationDate();
    for (let i = 0; i < n; i++) {
        out.push({
            id: ids[i],
            name: names[i],
            body: bodies[i],
            listName: listName,
            completed: completed[i],
            flagged: flagged[i],
            priority: priorities[i],
            dueDate: iso(dueDates[i]),
            remindMeDate: iso(remindDates[i]),
            completionDate: iso(completionDates[i]),
            creationDate: iso(creationDates[i]),
            modDate: iso(modDates[i]),
        });
    }
}
JSON.stringify(out);"#;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn escaping() {
        assert_eq!(escape(r#"say "hi" \ bye"#), r#"say \"hi\" \\ bye"#);
        assert_eq!(escape_jxa("it's\na \"test\""), "it\\'s\\na \\\"test\\\"");
    }

    #[test]
    fn date_setup_sets_every_field() {
        let t = Local.with_ymd_and_hms(2026, 3, 6, 14, 30, 0).unwrap();
        let block = date_setup("dueDate", t);
        assert!(block.contains("set year of dueDate to 2026"));
        assert!(block.contains("set month of dueDate to 3"));
        assert!(block.contains("set day of dueDate to 6"));
        assert!(block.contains("set hours of dueDate to 14"));
        assert!(block.contains("set minutes of dueDate to 30"));
        assert!(block.contains("set seconds of dueDate to 0"));
    }

    #[test]
    fn body_url_folding() {
        assert_eq!(body_with_url("", "https://x.test"), "URL: https://x.test");
        assert_eq!(
            body_with_url("notes", "https://x.test"),
            "notes\n\nURL: https://x.test"
        );
        assert_eq!(body_with_url("notes", ""), "notes");
    }

    #[test]
    fn create_script_contains_properties() {
        let r = Reminder {
            name: "Review \"the\" PR".to_string(),
            body: "notes".to_string(),
            url: "https://example.com/pr/1".to_string(),
            priority: Priority::High,
            flagged: true,
            due_date: Some(Local.with_ymd_and_hms(2026, 3, 6, 14, 0, 0).unwrap()),
            ..Reminder::default()
        };
        let script = create_reminder(&r, "Work");

        assert!(script.contains(r#"tell list "Work""#));
        assert!(script.contains(r#"name:"Review \"the\" PR""#));
        assert!(script.contains("body:\"notes\n\nURL: https://example.com/pr/1\""));
        assert!(script.contains("priority:1"));
        assert!(script.contains("flagged:true"));
        assert!(script.contains("due date:dueDate"));
        assert!(script.contains("set year of dueDate to 2026"));
        assert!(script.contains("return id of newReminder"));
    }

    #[test]
    fn update_script_clears_and_sets() {
        let update = ReminderUpdate {
            name: Some("New title".to_string()),
            due_date: Some(None),
            flagged: Some(false),
            ..ReminderUpdate::default()
        };
        let script = update_reminder("x-apple-reminder://ABC", &update).unwrap();
        assert!(script.contains(r#"first reminder whose id is "x-apple-reminder://ABC""#));
        assert!(script.contains(r#"set name of r to "New title""#));
        assert!(script.contains("set due date of r to missing value"));
        assert!(script.contains("set flagged of r to false"));
    }

    #[test]
    fn empty_update_produces_no_script() {
        assert!(update_reminder("id", &ReminderUpdate::default()).is_none());
        assert!(ReminderUpdate::default().is_empty());
    }
}

//! JSON and CSV export/import.
//!
//! Timestamps are rendered as local `%Y-%m-%dT%H:%M:%S` strings without an
//! offset; import reads them back in the local zone. CSV import is
//! header-driven, so column order does not matter and unknown columns are
//! ignored.

use crate::error::Result;
use crate::model::{Priority, Reminder};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{Read, Write};

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

fn format_time(t: &DateTime<Local>) -> String {
    t.format(TIME_FORMAT).to_string()
}

fn parse_time(s: &str) -> Option<DateTime<Local>> {
    let naive = NaiveDateTime::parse_from_str(s, TIME_FORMAT).ok()?;
    Local.from_local_datetime(&naive).earliest()
}

/// The JSON-serializable representation of a reminder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonReminder {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body: String,
    pub list_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remind_me_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modification_date: Option<String>,
    pub priority: u8,
    pub priority_label: String,
    pub flagged: bool,
    pub completed: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
}

impl Default for JsonReminder {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            body: String::new(),
            list_name: String::new(),
            due_date: None,
            remind_me_date: None,
            completion_date: None,
            creation_date: None,
            modification_date: None,
            priority: 0,
            priority_label: Priority::None.label().to_string(),
            flagged: false,
            completed: false,
            url: String::new(),
        }
    }
}

impl From<&Reminder> for JsonReminder {
    fn from(r: &Reminder) -> Self {
        Self {
            id: r.id.clone(),
            name: r.name.clone(),
            body: r.body.clone(),
            list_name: r.list_name.clone(),
            due_date: r.due_date.as_ref().map(format_time),
            remind_me_date: r.remind_me_date.as_ref().map(format_time),
            completion_date: r.completion_date.as_ref().map(format_time),
            creation_date: r.creation_date.as_ref().map(format_time),
            modification_date: r.modification_date.as_ref().map(format_time),
            priority: r.priority.level(),
            priority_label: r.priority.label().to_string(),
            flagged: r.flagged,
            completed: r.completed,
            url: r.url.clone(),
        }
    }
}

impl From<JsonReminder> for Reminder {
    fn from(j: JsonReminder) -> Self {
        Reminder {
            name: j.name,
            body: j.body,
            list_name: j.list_name,
            due_date: j.due_date.as_deref().and_then(parse_time),
            remind_me_date: j.remind_me_date.as_deref().and_then(parse_time),
            priority: Priority::from(j.priority),
            flagged: j.flagged,
            completed: j.completed,
            url: j.url,
            ..Reminder::default()
        }
    }
}

/// Write reminders as pretty-printed JSON.
pub fn export_json<W: Write>(mut w: W, reminders: &[Reminder]) -> Result<()> {
    let out: Vec<JsonReminder> = reminders.iter().map(JsonReminder::from).collect();
    serde_json::to_writer_pretty(&mut w, &out)?;
    writeln!(w)?;
    Ok(())
}

/// Read reminders from JSON.
pub fn import_json<R: Read>(r: R) -> Result<Vec<Reminder>> {
    let parsed: Vec<JsonReminder> = serde_json::from_reader(r)?;
    Ok(parsed.into_iter().map(Reminder::from).collect())
}

const CSV_HEADERS: &[&str] = &[
    "id",
    "name",
    "body",
    "list_name",
    "due_date",
    "remind_me_date",
    "priority",
    "priority_label",
    "flagged",
    "completed",
    "url",
];

fn csv_field(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Write reminders as CSV with a header row.
pub fn export_csv<W: Write>(mut w: W, reminders: &[Reminder]) -> Result<()> {
    writeln!(w, "{}", CSV_HEADERS.join(","))?;

    for r in reminders {
        let due = r.due_date.as_ref().map(format_time).unwrap_or_default();
        let remind = r.remind_me_date.as_ref().map(format_time).unwrap_or_default();
        let priority = r.priority.level().to_string();
        let flagged = r.flagged.to_string();
        let completed = r.completed.to_string();
        let record = [
            r.id.as_str(),
            r.name.as_str(),
            r.body.as_str(),
            r.list_name.as_str(),
            due.as_str(),
            remind.as_str(),
            priority.as_str(),
            r.priority.label(),
            flagged.as_str(),
            completed.as_str(),
            r.url.as_str(),
        ]
        .map(csv_field)
        .join(",");
        writeln!(w, "{record}")?;
    }

    Ok(())
}

/// Split CSV text into records, honoring quoted fields (embedded commas,
/// doubled quotes, newlines inside quotes).
fn parse_csv(input: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }
        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                if record.iter().any(|f| !f.is_empty()) {
                    records.push(std::mem::take(&mut record));
                } else {
                    record.clear();
                }
            }
            _ => field.push(c),
        }
    }

    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        if record.iter().any(|f| !f.is_empty()) {
            records.push(record);
        }
    }

    records
}

/// Read reminders from CSV. The header row decides which column holds
/// what; extra columns are ignored.
pub fn import_csv<R: Read>(mut r: R) -> Result<Vec<Reminder>> {
    let mut input = String::new();
    r.read_to_string(&mut input)?;

    let mut records = parse_csv(&input).into_iter();
    let Some(header) = records.next() else {
        return Ok(Vec::new());
    };

    let columns: HashMap<String, usize> = header
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_lowercase(), i))
        .collect();
    let col = |record: &[String], name: &str| -> Option<String> {
        columns
            .get(name)
            .and_then(|&i| record.get(i))
            .filter(|v| !v.is_empty())
            .cloned()
    };

    let mut reminders = Vec::new();
    for record in records {
        let mut rem = Reminder {
            name: col(&record, "name").unwrap_or_default(),
            body: col(&record, "body").unwrap_or_default(),
            list_name: col(&record, "list_name").unwrap_or_default(),
            url: col(&record, "url").unwrap_or_default(),
            ..Reminder::default()
        };
        rem.due_date = col(&record, "due_date").as_deref().and_then(parse_time);
        rem.remind_me_date = col(&record, "remind_me_date").as_deref().and_then(parse_time);
        if let Some(p) = col(&record, "priority").and_then(|v| v.parse::<u8>().ok()) {
            rem.priority = Priority::from(p);
        }
        if let Some(f) = col(&record, "flagged") {
            rem.flagged = f.eq_ignore_ascii_case("true");
        }
        if let Some(c) = col(&record, "completed") {
            rem.completed = c.eq_ignore_ascii_case("true");
        }
        reminders.push(rem);
    }

    Ok(reminders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<Reminder> {
        vec![
            Reminder {
                id: "x-apple-reminder://AAA".to_string(),
                name: "Buy groceries, urgently".to_string(),
                body: "milk \"whole\"\neggs".to_string(),
                list_name: "Personal".to_string(),
                due_date: Local.with_ymd_and_hms(2026, 3, 6, 14, 0, 0).single(),
                priority: Priority::High,
                flagged: true,
                ..Reminder::default()
            },
            Reminder {
                name: "Review PR".to_string(),
                list_name: "Work".to_string(),
                url: "https://example.com/pr/1".to_string(),
                completed: true,
                ..Reminder::default()
            },
        ]
    }

    #[test]
    fn json_round_trip() {
        let mut buf = Vec::new();
        export_json(&mut buf, &sample()).unwrap();
        let imported = import_json(buf.as_slice()).unwrap();

        assert_eq!(imported.len(), 2);
        assert_eq!(imported[0].name, "Buy groceries, urgently");
        assert_eq!(imported[0].priority, Priority::High);
        assert_eq!(
            imported[0].due_date,
            Local.with_ymd_and_hms(2026, 3, 6, 14, 0, 0).single()
        );
        assert!(imported[0].flagged);
        assert_eq!(imported[1].url, "https://example.com/pr/1");
        assert!(imported[1].completed);
    }

    #[test]
    fn json_export_shape() {
        let mut buf = Vec::new();
        export_json(&mut buf, &sample()).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains(r#""priority_label": "high""#));
        assert!(text.contains(r#""due_date": "2026-03-06T14:00:00""#));
        // Empty optionals are omitted.
        assert!(!text.contains(r#""completion_date""#));
    }

    #[test]
    fn csv_round_trip_with_quoting() {
        let mut buf = Vec::new();
        export_csv(&mut buf, &sample()).unwrap();
        let imported = import_csv(buf.as_slice()).unwrap();

        assert_eq!(imported.len(), 2);
        // Comma, quote, and newline survive the trip.
        assert_eq!(imported[0].name, "Buy groceries, urgently");
        assert_eq!(imported[0].body, "milk \"whole\"\neggs");
        assert_eq!(
            imported[0].due_date,
            Local.with_ymd_and_hms(2026, 3, 6, 14, 0, 0).single()
        );
        assert_eq!(imported[1].list_name, "Work");
    }

    #[test]
    fn csv_import_is_column_order_independent() {
        let csv = "completed,name,list_name\ntrue,Call dentist,Personal\n";
        let imported = import_csv(csv.as_bytes()).unwrap();

        assert_eq!(imported.len(), 1);
        assert_eq!(imported[0].name, "Call dentist");
        assert_eq!(imported[0].list_name, "Personal");
        assert!(imported[0].completed);
    }

    #[test]
    fn csv_import_ignores_unknown_columns_and_blank_lines() {
        let csv = "name,color,flagged\n\nWater plants,green,TRUE\n";
        let imported = import_csv(csv.as_bytes()).unwrap();

        assert_eq!(imported.len(), 1);
        assert_eq!(imported[0].name, "Water plants");
        assert!(imported[0].flagged);
    }

    #[test]
    fn empty_csv_yields_nothing() {
        assert!(import_csv("".as_bytes()).unwrap().is_empty());
    }
}

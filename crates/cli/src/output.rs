//! Terminal rendering for reminders and lists.

use chrono::{DateTime, Days, Local};
use clap::ValueEnum;
use colored::Colorize;
use rem_core::{List, Priority, Reminder};

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns with color.
    Table,
    /// Tab-separated, one reminder per line.
    Plain,
    /// JSON array for scripting.
    Json,
}

impl OutputFormat {
    /// Parse a config file value; unknown names fall back to table.
    pub fn from_name(name: &str) -> Self {
        match name {
            "json" => Self::Json,
            "plain" => Self::Plain,
            _ => Self::Table,
        }
    }
}

/// Short form of a reminder ID: the first 8 characters of the UUID,
/// without the `x-apple-reminder://` scheme.
pub fn short_id(id: &str) -> &str {
    let bare = id.rsplit('/').next().unwrap_or(id);
    bare.get(..8).unwrap_or(bare)
}

/// Human label for a due date: "today 14:00", "tomorrow 09:00", or the
/// full date for anything further out.
pub fn due_label(t: DateTime<Local>, now: DateTime<Local>) -> String {
    let date = t.date_naive();
    let today = now.date_naive();
    if date == today {
        format!("today {}", t.format("%H:%M"))
    } else if Some(date) == today.checked_add_days(Days::new(1)) {
        format!("tomorrow {}", t.format("%H:%M"))
    } else {
        t.format("%Y-%m-%d %H:%M").to_string()
    }
}

fn priority_marker(p: Priority) -> &'static str {
    match p {
        Priority::High => "!!!",
        Priority::Medium => "!!",
        Priority::Low => "!",
        Priority::None => "",
    }
}

fn due_cell(r: &Reminder, now: DateTime<Local>) -> String {
    let Some(due) = r.due_date else {
        return String::new();
    };
    let label = due_label(due, now);
    if r.completed {
        label
    } else if due < now {
        label.red().to_string()
    } else if due.date_naive() == now.date_naive() {
        label.yellow().to_string()
    } else {
        label
    }
}

fn status_cell(r: &Reminder) -> String {
    let mut s = String::new();
    if r.completed {
        s.push_str(&"✓".green().to_string());
    }
    if r.flagged {
        s.push_str(&"⚑".red().to_string());
    }
    s
}

/// Print a set of reminders in the requested format.
pub fn print_reminders(reminders: &[Reminder], format: OutputFormat) -> serde_json::Result<()> {
    let now = Local::now();
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(reminders)?);
        }
        OutputFormat::Plain => {
            for r in reminders {
                let due = r
                    .due_date
                    .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                println!("{}\t{}\t{}\t{}", short_id(&r.id), r.name, r.list_name, due);
            }
        }
        OutputFormat::Table => {
            if reminders.is_empty() {
                println!("{}", "No reminders found".dimmed());
                return Ok(());
            }
            let name_width = reminders
                .iter()
                .map(|r| r.name.chars().count())
                .max()
                .unwrap_or(0)
                .clamp(4, 50);
            let list_width = reminders
                .iter()
                .map(|r| r.list_name.chars().count())
                .max()
                .unwrap_or(0)
                .max(4);
            println!(
                "{}",
                format!(
                    "{:8}  {:3}  {:name_width$}  {:list_width$}  {}",
                    "ID", "PRI", "NAME", "LIST", "DUE"
                )
                .bold()
            );
            for r in reminders {
                let name = truncate(&r.name, name_width);
                let name = if r.completed {
                    name.dimmed().to_string()
                } else {
                    name
                };
                println!(
                    "{:8}  {:3}  {:name_width$}  {:list_width$}  {} {}",
                    short_id(&r.id).cyan(),
                    priority_marker(r.priority).red(),
                    name,
                    r.list_name,
                    due_cell(r, now),
                    status_cell(r),
                );
            }
        }
    }
    Ok(())
}

/// Print a single reminder in full.
pub fn print_reminder(r: &Reminder, format: OutputFormat) -> serde_json::Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(r)?);
        return Ok(());
    }

    let now = Local::now();
    println!("{}  {}", r.name.bold(), status_cell(r));
    println!("  {:13} {}", "id:".dimmed(), r.id);
    println!("  {:13} {}", "list:".dimmed(), r.list_name);
    if !r.body.is_empty() {
        println!("  {:13} {}", "notes:".dimmed(), r.body.replace('\n', "\n                "));
    }
    if !r.url.is_empty() {
        println!("  {:13} {}", "url:".dimmed(), r.url.blue().underline());
    }
    if let Some(due) = r.due_date {
        println!("  {:13} {}", "due:".dimmed(), due_label(due, now));
    }
    if let Some(remind) = r.remind_me_date {
        println!("  {:13} {}", "remind:".dimmed(), due_label(remind, now));
    }
    if r.priority != Priority::None {
        println!("  {:13} {}", "priority:".dimmed(), r.priority);
    }
    if let Some(done) = r.completion_date {
        println!("  {:13} {}", "completed:".dimmed(), done.format("%Y-%m-%d %H:%M"));
    }
    if let Some(created) = r.creation_date {
        println!("  {:13} {}", "created:".dimmed(), created.format("%Y-%m-%d %H:%M"));
    }
    Ok(())
}

/// Print lists in the requested format.
pub fn print_lists(lists: &[List], format: OutputFormat) -> serde_json::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(lists)?),
        OutputFormat::Plain => {
            for l in lists {
                println!("{}\t{}", l.name, l.count);
            }
        }
        OutputFormat::Table => {
            for l in lists {
                println!(
                    "{} {}",
                    l.name.bold(),
                    format!("({})", l.count).dimmed()
                );
            }
        }
    }
    Ok(())
}

fn truncate(s: &str, max_chars: usize) -> String {
    let count = s.chars().count();
    if count <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn short_ids() {
        assert_eq!(
            short_id("x-apple-reminder://1A2B3C4D-0000-0000-0000-000000000000"),
            "1A2B3C4D"
        );
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn due_labels_are_relative_near_now() {
        let now = Local.with_ymd_and_hms(2026, 3, 4, 10, 0, 0).unwrap();
        let later_today = Local.with_ymd_and_hms(2026, 3, 4, 17, 0, 0).unwrap();
        let tomorrow = Local.with_ymd_and_hms(2026, 3, 5, 9, 0, 0).unwrap();
        let next_week = Local.with_ymd_and_hms(2026, 3, 11, 9, 0, 0).unwrap();

        assert_eq!(due_label(later_today, now), "today 17:00");
        assert_eq!(due_label(tomorrow, now), "tomorrow 09:00");
        assert_eq!(due_label(next_week, now), "2026-03-11 09:00");
    }

    #[test]
    fn truncation_is_char_safe() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long reminder name", 10), "a very ...");
    }

    #[test]
    fn output_format_names() {
        assert_eq!(OutputFormat::from_name("json"), OutputFormat::Json);
        assert_eq!(OutputFormat::from_name("plain"), OutputFormat::Plain);
        assert_eq!(OutputFormat::from_name("nonsense"), OutputFormat::Table);
    }
}

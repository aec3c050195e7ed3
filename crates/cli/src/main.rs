mod config;
mod output;

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};

use chrono::{Days, Local};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::{control::set_override, Colorize};
use rem_core::{
    dates::parse_date, export, ListFilter, ListService, Priority, Reminder, ReminderService,
    ReminderUpdate,
};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

use crate::config::Config;
use crate::output::OutputFormat;

const LONG_ABOUT: &str = r#"
rem is a command line client for Apple Reminders.

Dates are written the way you say them:

  rem add Buy milk --due tomorrow
  rem add Standup --due "next monday at 9:30am" --list Work
  rem add Call dentist --due "in 2 hours"
  rem add Submit report --due "eod" --priority high

Besides natural phrases ("tomorrow", "next friday at 2pm", "in 3 days",
"end of week"), fixed formats like "2026-03-06 14:00" and
"Mar 6, 2026 2:00PM" are accepted.

Reminders are addressed by ID prefix, so the first few characters shown
by `rem list` are enough:

  rem complete a1b2c3d4
  rem show a1b2
  rem delete a1b2 --force

CONFIGURATION:
  Settings can come from CLI flags, environment variables, or a config file.
  Precedence: CLI args > Environment vars > Config file > Defaults

  Setting      | CLI flag       | Env var          | Default
  -------------|----------------|------------------|---------
  default_list | -l, --list     | REM_DEFAULT_LIST | app default
  output       | -o, --output   | REM_OUTPUT       | table
  no_color     | -C, --no-color | REM_NO_COLOR     | false

  Config file location: rem config path
  Generate default config: rem config init

  Note: NO_COLOR env var is also respected (https://no-color.org/)"#;

#[derive(Parser)]
#[command(name = "rem")]
#[command(version)]
#[command(about = "Apple Reminders from the command line, with natural language dates")]
#[command(long_about = LONG_ABOUT)]
#[command(after_help = "For more information, visit: https://github.com/remcli/rem")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, short = 'o', global = true, value_enum)]
    output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, short = 'C', global = true)]
    no_color: bool,

    /// Enable verbose logging (use multiple times for more detail)
    ///
    /// -v shows debug messages, -vv shows trace messages, including the
    /// generated AppleScript. Useful for understanding what is sent to
    /// the Reminders app.
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new reminder
    ///
    /// The reminder name is everything that is not a flag:
    ///   rem add Buy milk --due tomorrow
    Add {
        /// Reminder name
        #[arg(value_name = "NAME", required = true, num_args = 1..)]
        name: Vec<String>,

        /// List to add to (defaults to the configured or app default list)
        #[arg(long, short = 'l')]
        list: Option<String>,

        /// Due date, natural language or fixed format
        #[arg(long, short = 'd', value_name = "WHEN")]
        due: Option<String>,

        /// Remind-me date, same formats as --due
        #[arg(long, short = 'r', value_name = "WHEN")]
        remind: Option<String>,

        /// Notes attached to the reminder
        #[arg(long, short = 'b')]
        body: Option<String>,

        /// Priority: high, medium or low
        #[arg(long, short = 'p')]
        priority: Option<String>,

        /// Attach a URL (stored in the notes)
        #[arg(long, short = 'u')]
        url: Option<String>,

        /// Flag the reminder
        #[arg(long, short = 'f')]
        flag: bool,
    },

    /// List reminders (incomplete by default)
    List {
        /// Only this list
        #[arg(value_name = "LIST")]
        list: Option<String>,

        /// Include completed reminders
        #[arg(long, short = 'a')]
        all: bool,

        /// Only completed reminders
        #[arg(long, conflicts_with = "all")]
        completed: bool,

        /// Only flagged reminders
        #[arg(long, short = 'f')]
        flagged: bool,

        /// Only reminders due before this date
        #[arg(long, value_name = "WHEN")]
        due_before: Option<String>,

        /// Only reminders due after this date
        #[arg(long, value_name = "WHEN")]
        due_after: Option<String>,
    },

    /// Show one reminder in full
    Show {
        /// Reminder ID or ID prefix
        id: String,
    },

    /// Change fields of an existing reminder
    Update {
        /// Reminder ID or ID prefix
        id: String,

        /// New name
        #[arg(long, short = 'n')]
        name: Option<String>,

        /// New notes
        #[arg(long, short = 'b')]
        body: Option<String>,

        /// New due date
        #[arg(long, short = 'd', value_name = "WHEN", conflicts_with = "clear_due")]
        due: Option<String>,

        /// Remove the due date
        #[arg(long)]
        clear_due: bool,

        /// New remind-me date
        #[arg(long, short = 'r', value_name = "WHEN", conflicts_with = "clear_remind")]
        remind: Option<String>,

        /// Remove the remind-me date
        #[arg(long)]
        clear_remind: bool,

        /// New priority: high, medium, low or none
        #[arg(long, short = 'p')]
        priority: Option<String>,
    },

    /// Mark a reminder as completed
    Complete {
        /// Reminder ID or ID prefix
        id: String,
    },

    /// Mark a completed reminder as not completed
    Uncomplete {
        /// Reminder ID or ID prefix
        id: String,
    },

    /// Flag a reminder
    Flag {
        /// Reminder ID or ID prefix
        id: String,
    },

    /// Remove the flag from a reminder
    Unflag {
        /// Reminder ID or ID prefix
        id: String,
    },

    /// Delete a reminder
    Delete {
        /// Reminder ID or ID prefix
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Search reminder names and notes
    Search {
        /// Text to search for (case-insensitive)
        query: String,

        /// Only this list
        #[arg(long, short = 'l')]
        list: Option<String>,
    },

    /// Show reminder lists, or manage them
    Lists {
        #[command(subcommand)]
        action: Option<ListsAction>,
    },

    /// Export reminders to JSON or CSV
    Export {
        /// Export format
        #[arg(long, short = 'f', value_enum, default_value_t = DataFormat::Json)]
        format: DataFormat,

        /// Write to this file instead of stdout
        #[arg(long, value_name = "PATH")]
        file: Option<String>,

        /// Only this list
        #[arg(long, short = 'l')]
        list: Option<String>,
    },

    /// Import reminders from a JSON or CSV file
    Import {
        /// File to import
        file: String,

        /// File format (inferred from the extension when omitted)
        #[arg(long, short = 'f', value_enum)]
        format: Option<DataFormat>,

        /// Show what would be imported without creating anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Summary counts across all lists
    Stats,

    /// Incomplete reminders whose due date has passed
    Overdue,

    /// Incomplete reminders due within the next days
    Upcoming {
        /// How many days ahead to look
        #[arg(long, short = 'd', default_value_t = 7)]
        days: u64,
    },

    /// Show or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ListsAction {
    /// Create a new list
    Create {
        /// List name
        name: String,
    },

    /// Rename a list
    Rename {
        /// Current name
        old_name: String,
        /// New name
        new_name: String,
    },

    /// Delete a list and everything in it
    Delete {
        /// List name
        name: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the config file path
    Path,
    /// Write a default config file
    Init,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DataFormat {
    Json,
    Csv,
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    let cli = Cli::parse();
    let config = Config::load();

    let level = match cli.verbose {
        0 => LevelFilter::OFF,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    if level != LevelFilter::OFF {
        let filter = EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy();
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    if cli.no_color || config.no_color() {
        set_override(false);
    }

    let format = cli
        .output
        .unwrap_or_else(|| OutputFormat::from_name(&config.output()));
    tracing::debug!(?format, "resolved output format");

    if let Err(e) = run(cli.command, format, &config) {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(command: Commands, format: OutputFormat, config: &Config) -> CliResult {
    match command {
        Commands::Add {
            name,
            list,
            due,
            remind,
            body,
            priority,
            url,
            flag,
        } => {
            let r = Reminder {
                name: name.join(" "),
                list_name: list.or_else(|| config.default_list()).unwrap_or_default(),
                body: body.unwrap_or_default(),
                due_date: due.as_deref().map(parse_date).transpose()?,
                remind_me_date: remind.as_deref().map(parse_date).transpose()?,
                priority: priority
                    .as_deref()
                    .map(parse_priority)
                    .transpose()?
                    .unwrap_or_default(),
                url: url.unwrap_or_default(),
                flagged: flag,
                ..Reminder::default()
            };
            let service = ReminderService::new();
            let id = service.create(&r)?;
            println!(
                "{} {} ({})",
                "Created".green().bold(),
                r.name.bold(),
                output::short_id(&id)
            );
        }

        Commands::List {
            list,
            all,
            completed,
            flagged,
            due_before,
            due_after,
        } => {
            let filter = ListFilter {
                list_name: list,
                completed: if completed {
                    Some(true)
                } else if all {
                    None
                } else {
                    Some(false)
                },
                flagged: flagged.then_some(true),
                due_before: due_before.as_deref().map(parse_date).transpose()?,
                due_after: due_after.as_deref().map(parse_date).transpose()?,
                search: None,
            };
            let mut reminders = ReminderService::new().list(&filter)?;
            sort_by_due(&mut reminders);
            output::print_reminders(&reminders, format)?;
        }

        Commands::Show { id } => {
            let r = ReminderService::new().get(&id)?;
            output::print_reminder(&r, format)?;
        }

        Commands::Update {
            id,
            name,
            body,
            due,
            clear_due,
            remind,
            clear_remind,
            priority,
        } => {
            let update = ReminderUpdate {
                name,
                body,
                due_date: if clear_due {
                    Some(None)
                } else {
                    due.as_deref().map(parse_date).transpose()?.map(Some)
                },
                remind_me_date: if clear_remind {
                    Some(None)
                } else {
                    remind.as_deref().map(parse_date).transpose()?.map(Some)
                },
                priority: priority.as_deref().map(parse_priority).transpose()?,
                ..ReminderUpdate::default()
            };
            if update.is_empty() {
                return Err("nothing to update; pass at least one field flag".into());
            }
            let service = ReminderService::new();
            let r = service.get(&id)?;
            service.update(&r.id, &update)?;
            println!("{} {}", "Updated".green().bold(), r.name.bold());
        }

        Commands::Complete { id } => {
            let service = ReminderService::new();
            let r = service.get(&id)?;
            service.complete(&r.id)?;
            println!("{} {}", "Completed".green().bold(), r.name.bold());
        }

        Commands::Uncomplete { id } => {
            let service = ReminderService::new();
            let r = service.get(&id)?;
            service.uncomplete(&r.id)?;
            println!("{} {}", "Reopened".green().bold(), r.name.bold());
        }

        Commands::Flag { id } => {
            let service = ReminderService::new();
            let r = service.get(&id)?;
            service.flag(&r.id)?;
            println!("{} {}", "Flagged".green().bold(), r.name.bold());
        }

        Commands::Unflag { id } => {
            let service = ReminderService::new();
            let r = service.get(&id)?;
            service.unflag(&r.id)?;
            println!("{} {}", "Unflagged".green().bold(), r.name.bold());
        }

        Commands::Delete { id, force } => {
            let service = ReminderService::new();
            let r = service.get(&id)?;
            if !force && !confirm(&format!("Delete '{}'?", r.name))? {
                println!("Cancelled");
                return Ok(());
            }
            service.delete(&r.id)?;
            println!("{} {}", "Deleted".green().bold(), r.name.bold());
        }

        Commands::Search { query, list } => {
            let filter = ListFilter {
                list_name: list,
                search: Some(query),
                ..ListFilter::default()
            };
            let mut reminders = ReminderService::new().list(&filter)?;
            sort_by_due(&mut reminders);
            output::print_reminders(&reminders, format)?;
        }

        Commands::Lists { action } => run_lists(action, format)?,

        Commands::Export { format: data, file, list } => {
            let filter = ListFilter {
                list_name: list,
                ..ListFilter::default()
            };
            let mut reminders = ReminderService::new().list(&filter)?;
            sort_by_due(&mut reminders);

            match &file {
                Some(path) => {
                    let w = BufWriter::new(File::create(path)?);
                    write_export(w, data, &reminders)?;
                    println!("Exported {} reminders to {}", reminders.len(), path);
                }
                None => write_export(io::stdout().lock(), data, &reminders)?,
            }
        }

        Commands::Import {
            file,
            format: data,
            dry_run,
        } => {
            let data = data.unwrap_or_else(|| {
                if file.to_lowercase().ends_with(".csv") {
                    DataFormat::Csv
                } else {
                    DataFormat::Json
                }
            });
            let reader = BufReader::new(File::open(&file)?);
            let reminders = match data {
                DataFormat::Json => export::import_json(reader)?,
                DataFormat::Csv => export::import_csv(reader)?,
            };

            if dry_run {
                for r in &reminders {
                    let list = if r.list_name.is_empty() {
                        "(default list)"
                    } else {
                        &r.list_name
                    };
                    println!("would create: {} [{}]", r.name, list);
                }
                println!("{} reminders in {}", reminders.len(), file);
                return Ok(());
            }

            let service = ReminderService::new();
            let mut created = 0;
            for r in &reminders {
                match service.create(r) {
                    Ok(_) => created += 1,
                    Err(e) => eprintln!("{} skipping '{}': {}", "warning:".yellow(), r.name, e),
                }
            }
            println!(
                "{} {created} of {} reminders",
                "Imported".green().bold(),
                reminders.len()
            );
        }

        Commands::Stats => run_stats(format)?,

        Commands::Overdue => {
            let filter = ListFilter {
                completed: Some(false),
                due_before: Some(Local::now()),
                ..ListFilter::default()
            };
            let mut reminders = ReminderService::new().list(&filter)?;
            sort_by_due(&mut reminders);
            output::print_reminders(&reminders, format)?;
        }

        Commands::Upcoming { days } => {
            let now = Local::now();
            let until = now
                .checked_add_days(Days::new(days))
                .ok_or("days out of range")?;
            let filter = ListFilter {
                completed: Some(false),
                due_after: Some(now),
                due_before: Some(until),
                ..ListFilter::default()
            };
            let mut reminders = ReminderService::new().list(&filter)?;
            sort_by_due(&mut reminders);
            output::print_reminders(&reminders, format)?;
        }

        Commands::Config { action } => match action {
            ConfigAction::Path => match Config::path() {
                Some(path) => println!("{}", path.display()),
                None => return Err("cannot determine config directory".into()),
            },
            ConfigAction::Init => {
                let path = config::init_config()?;
                println!("{} {}", "Created".green().bold(), path.display());
            }
        },
    }
    Ok(())
}

fn run_lists(action: Option<ListsAction>, format: OutputFormat) -> CliResult {
    let service = ListService::new();
    match action {
        None => output::print_lists(&service.lists()?, format)?,
        Some(ListsAction::Create { name }) => {
            let list = service.create(&name)?;
            println!("{} {}", "Created list".green().bold(), list.name.bold());
        }
        Some(ListsAction::Rename { old_name, new_name }) => {
            service.get(&old_name)?;
            service.rename(&old_name, &new_name)?;
            println!(
                "{} {} -> {}",
                "Renamed".green().bold(),
                old_name,
                new_name.bold()
            );
        }
        Some(ListsAction::Delete { name, force }) => {
            let list = service.get(&name)?;
            if !force
                && !confirm(&format!(
                    "Delete list '{}' and its {} reminders?",
                    list.name, list.count
                ))?
            {
                println!("Cancelled");
                return Ok(());
            }
            service.delete(&name)?;
            println!("{} {}", "Deleted list".green().bold(), name.bold());
        }
    }
    Ok(())
}

fn run_stats(format: OutputFormat) -> CliResult {
    let reminders = ReminderService::new().list(&ListFilter::default())?;
    let lists = ListService::new().lists()?;
    let now = Local::now();

    let total = reminders.len();
    let completed = reminders.iter().filter(|r| r.completed).count();
    let flagged = reminders.iter().filter(|r| r.flagged && !r.completed).count();
    let overdue = reminders
        .iter()
        .filter(|r| !r.completed && r.due_date.is_some_and(|d| d < now))
        .count();
    let due_today = reminders
        .iter()
        .filter(|r| {
            !r.completed
                && r.due_date
                    .is_some_and(|d| d.date_naive() == now.date_naive())
        })
        .count();

    if format == OutputFormat::Json {
        let per_list: Vec<_> = lists
            .iter()
            .map(|l| serde_json::json!({"name": l.name, "count": l.count}))
            .collect();
        let stats = serde_json::json!({
            "total": total,
            "completed": completed,
            "incomplete": total - completed,
            "overdue": overdue,
            "due_today": due_today,
            "flagged": flagged,
            "lists": per_list,
        });
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "Reminders".bold().underline());
    println!("  {:11} {}", "total:".dimmed(), total);
    println!("  {:11} {}", "completed:".dimmed(), completed);
    println!("  {:11} {}", "incomplete:".dimmed(), total - completed);
    if overdue > 0 {
        println!("  {:11} {}", "overdue:".dimmed(), overdue.to_string().red());
    } else {
        println!("  {:11} {}", "overdue:".dimmed(), overdue);
    }
    println!("  {:11} {}", "due today:".dimmed(), due_today);
    println!("  {:11} {}", "flagged:".dimmed(), flagged);
    println!();
    println!("{}", "Lists".bold().underline());
    for l in &lists {
        println!("  {} {}", l.name, format!("({})", l.count).dimmed());
    }
    Ok(())
}

fn sort_by_due(reminders: &mut [Reminder]) {
    reminders.sort_by(|a, b| match (a.due_date, b.due_date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.name.cmp(&b.name),
    });
}

fn parse_priority(s: &str) -> Result<Priority, String> {
    if matches!(s, "none" | "0" | "") {
        return Ok(Priority::None);
    }
    let p = Priority::parse(s);
    if p == Priority::None {
        return Err(format!("invalid priority '{s}' (use high, medium or low)"));
    }
    Ok(p)
}

fn write_export<W: Write>(w: W, data: DataFormat, reminders: &[Reminder]) -> rem_core::Result<()> {
    match data {
        DataFormat::Json => export::export_json(w, reminders),
        DataFormat::Csv => export::export_csv(w, reminders),
    }
}

fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let line = line.trim().to_lowercase();
    Ok(line == "y" || line == "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_common_invocations() {
        Cli::try_parse_from(["rem", "add", "Buy", "milk", "--due", "tomorrow"]).unwrap();
        Cli::try_parse_from(["rem", "list", "Work", "--flagged", "-o", "json"]).unwrap();
        Cli::try_parse_from(["rem", "complete", "a1b2c3d4"]).unwrap();
        Cli::try_parse_from(["rem", "lists", "rename", "Old", "New"]).unwrap();
        Cli::try_parse_from(["rem", "export", "--format", "csv", "--file", "out.csv"]).unwrap();
        Cli::try_parse_from(["rem", "import", "backup.json", "--dry-run"]).unwrap();
        Cli::try_parse_from(["rem", "upcoming", "--days", "14"]).unwrap();
    }

    #[test]
    fn add_requires_a_name() {
        assert!(Cli::try_parse_from(["rem", "add"]).is_err());
    }

    #[test]
    fn update_rejects_conflicting_date_flags() {
        assert!(Cli::try_parse_from([
            "rem", "update", "a1b2", "--due", "tomorrow", "--clear-due"
        ])
        .is_err());
    }

    #[test]
    fn priority_words() {
        assert_eq!(parse_priority("high").unwrap(), Priority::High);
        assert_eq!(parse_priority("none").unwrap(), Priority::None);
        assert!(parse_priority("urgent").is_err());
    }

    #[test]
    fn sorting_puts_undated_last() {
        let mut rs = vec![
            Reminder {
                name: "no due".into(),
                ..Reminder::default()
            },
            Reminder {
                name: "due".into(),
                due_date: Some(Local::now()),
                ..Reminder::default()
            },
        ];
        sort_by_due(&mut rs);
        assert_eq!(rs[0].name, "due");
        assert_eq!(rs[1].name, "no due");
    }
}

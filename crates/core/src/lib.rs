//! rem-core
//!
//! Core library for the `rem` command line client for Apple Reminders.
//! Natural-language date parsing, the reminder data model, AppleScript/JXA
//! script assembly and execution, and JSON/CSV export live here; the binary
//! in `rem-cli` is a thin layer over the services in this crate.
//!
//! # Quick Start
//!
//! ```no_run
//! use rem_core::{ReminderService, ListFilter};
//!
//! let service = ReminderService::new();
//! let due_soon = service.list(&ListFilter {
//!     completed: Some(false),
//!     ..ListFilter::default()
//! })?;
//! for r in due_soon {
//!     println!("{}", r.name);
//! }
//! # Ok::<(), rem_core::Error>(())
//! ```
//!
//! # Date expressions
//!
//! ```
//! use rem_core::dates::parse_date;
//!
//! assert!(parse_date("tomorrow").is_ok());
//! assert!(parse_date("next friday at 2pm").is_ok());
//! assert!(parse_date("in 3 hours").is_ok());
//! assert!(parse_date("2026-03-06 14:00").is_ok());
//! ```

pub mod dates;
pub mod error;
pub mod exec;
pub mod export;
pub mod model;
pub mod script;
pub mod service;

pub use dates::{parse_date, parse_date_at, DateError};
pub use error::{Error, Result};
pub use exec::{Osascript, ScriptRunner};
pub use model::{extract_url, List, ListFilter, Priority, Reminder};
pub use script::ReminderUpdate;
pub use service::{ListService, ReminderService};

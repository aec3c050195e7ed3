//! Error types shared across the crate.

use crate::dates::DateError;

/// Errors from talking to the Reminders app or reshaping its output.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("reminder name is required")]
    NameRequired,

    #[error("list name is required")]
    ListNameRequired,

    #[error("reminder not found: {0}")]
    ReminderNotFound(String),

    #[error("list not found: {0}")]
    ListNotFound(String),

    /// osascript ran but reported a failure; carries its trimmed stderr.
    #[error("osascript error: {0}")]
    Script(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected output from Reminders: {0}")]
    Wire(#[from] serde_json::Error),

    #[error(transparent)]
    Date(#[from] DateError),
}

pub type Result<T> = std::result::Result<T, Error>;

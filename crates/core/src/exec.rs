//! Script execution via `osascript`.

use crate::error::{Error, Result};
use std::process::Command;

/// Seam between the services and the OS scripting bridge.
///
/// The real implementation shells out to `osascript`; tests substitute a
/// stub that returns canned output and records the scripts it was given.
pub trait ScriptRunner {
    /// Run an AppleScript and return its trimmed stdout.
    fn run(&self, script: &str) -> Result<String>;

    /// Run a JavaScript for Automation script and return its trimmed stdout.
    fn run_jxa(&self, script: &str) -> Result<String>;
}

/// Runs scripts through the system `osascript` binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct Osascript;

impl Osascript {
    fn invoke(args: &[&str], script: &str) -> Result<String> {
        tracing::debug!(bytes = script.len(), "running osascript");
        tracing::trace!(%script);

        let output = Command::new("osascript")
            .args(args)
            .arg("-e")
            .arg(script)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("osascript exited with {}", output.status)
            } else {
                stderr
            };
            return Err(Error::Script(message));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl ScriptRunner for Osascript {
    fn run(&self, script: &str) -> Result<String> {
        Self::invoke(&[], script)
    }

    fn run_jxa(&self, script: &str) -> Result<String> {
        Self::invoke(&["-l", "JavaScript"], script)
    }
}

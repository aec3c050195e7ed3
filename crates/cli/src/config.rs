//! Configuration file loading and environment variable handling.
//!
//! Precedence: CLI args > Environment vars > Config file > Defaults

use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Default config file content for `rem config init`.
pub const DEFAULT_CONFIG: &str = r#"# rem configuration
# See: rem --help for all options

# List used when --list is not given (empty = the app's default list)
default_list = ""

# Output format: table, plain or json
output = "table"

# Disable colored output
no_color = false
"#;

/// Configuration loaded from file and environment.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_list: Option<String>,
    pub output: Option<String>,
    pub no_color: Option<bool>,
}

impl Config {
    /// Get the config file path.
    ///
    /// - Linux/macOS: `~/.config/rem/config.toml`
    /// - Windows: `%APPDATA%\rem\config.toml`
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("rem").join("config.toml"))
    }

    /// Load config from file. Returns default if file doesn't exist.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };

        let Ok(contents) = fs::read_to_string(&path) else {
            return Self::default();
        };

        toml::from_str(&contents).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Get default_list with precedence: env > config. `None` means use
    /// the app's own default list.
    pub fn default_list(&self) -> Option<String> {
        std::env::var("REM_DEFAULT_LIST")
            .ok()
            .or_else(|| self.default_list.clone())
            .filter(|s| !s.is_empty())
    }

    /// Get output format name with precedence: env > config > default.
    pub fn output(&self) -> String {
        std::env::var("REM_OUTPUT")
            .ok()
            .or_else(|| self.output.clone())
            .unwrap_or_else(|| "table".to_string())
    }

    /// Get no_color with precedence: env > config > default.
    ///
    /// Respects the `NO_COLOR` standard (https://no-color.org/).
    pub fn no_color(&self) -> bool {
        if std::env::var("NO_COLOR").is_ok() {
            return true;
        }
        if std::env::var("REM_NO_COLOR").is_ok() {
            return true;
        }
        self.no_color.unwrap_or(false)
    }
}

/// Create a default config file at the standard location.
pub fn init_config() -> Result<PathBuf, String> {
    let path = Config::path().ok_or("Cannot determine config directory")?;

    if path.exists() {
        return Err(format!("Config file already exists: {}", path.display()));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| format!("Failed to create directory: {}", e))?;
    }

    fs::write(&path, DEFAULT_CONFIG).map_err(|e| format!("Failed to write config: {}", e))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid_toml() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).expect("DEFAULT_CONFIG should parse");
        assert_eq!(config.default_list, Some(String::new()));
        assert_eq!(config.output, Some("table".to_string()));
        assert_eq!(config.no_color, Some(false));
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
default_list = "Work"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.default_list, Some("Work".to_string()));
        assert_eq!(config.output, None);
    }

    #[test]
    fn test_empty_default_list_means_none() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.default_list(), None);
    }
}

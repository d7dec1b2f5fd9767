//! Configuration handling for cfgfile
//!
//! User defaults are stored in `~/.config/cfgfile/config.toml` (or the
//! platform equivalent). Set `CFGFILE_CONFIG` to use another file.
//!
//! ```toml
//! escape = "shell"
//! separator = "="
//! modflag_path = "/tmp/modflag"
//! default_format = "text"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::EscapeKind;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "CFGFILE_CONFIG";

/// File name of the change-signal file in the temp directory
const MODFLAG_FILE_NAME: &str = "modflag";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Escape strategy used when `--escape` is not given
    pub escape: Option<EscapeKind>,

    /// Separator used when `--separator` is not given
    pub separator: Option<String>,

    /// Path of the file touched by `--modflag`
    pub modflag_path: Option<PathBuf>,

    /// Output format used when `--format` is not given
    pub default_format: OutputFormat,
}

impl Config {
    /// Loads configuration from the default location
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Returns the config file location, honoring `CFGFILE_CONFIG`
    pub fn config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }

        ProjectDirs::from("dev", "cfgfile", "cfgfile")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Loads configuration from a specific file; a missing file means defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parses and validates TOML content
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.separator.as_deref() == Some("") {
            return Err(ConfigError::Invalid("separator must not be empty".to_string()));
        }
        Ok(())
    }

    /// Returns the change-signal path, falling back to `<temp dir>/modflag`
    pub fn modflag_path(&self) -> PathBuf {
        self.modflag_path
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(MODFLAG_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = Config::default();

        assert_eq!(config.escape, None);
        assert_eq!(config.separator, None);
        assert_eq!(config.default_format, OutputFormat::Text);
        assert_eq!(config.modflag_path(), std::env::temp_dir().join("modflag"));
    }

    #[test]
    fn parse_config() {
        let toml = r#"
escape = "shell"
separator = ":"
modflag_path = "/var/run/changed"
default_format = "json"
"#;

        let config = Config::parse(toml).unwrap();
        assert_eq!(config.escape, Some(EscapeKind::Shell));
        assert_eq!(config.separator.as_deref(), Some(":"));
        assert_eq!(config.modflag_path(), PathBuf::from("/var/run/changed"));
        assert_eq!(config.default_format, OutputFormat::Json);
    }

    #[test]
    fn unknown_escape_is_rejected() {
        let err = Config::parse(r#"escape = "bash""#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn empty_separator_is_rejected() {
        let err = Config::parse(r#"separator = """#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "separator = \" \"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.separator.as_deref(), Some(" "));
    }
}

//! Per-user settings: replay timing, locale, editor and logging.
//!
//! Stored at `~/.config/termdeck/config.yaml` (XDG layout on every platform
//! except Windows, which uses the roaming config dir). Every field has a
//! default, so a missing file or a partial file is fine.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::env_vars::substitute_variables;
use crate::error::ConfigError;
use crate::messages::{Locale, Messages};

fn default_settle_delay_ms() -> u64 {
    1000
}

fn default_close_delay_ms() -> u64 {
    3000
}

fn default_watch_debounce_ms() -> u64 {
    250
}

/// Log verbosity for the debug log file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// No logging (log file not created)
    #[default]
    Off,
    Error,
    Warn,
    Info,
    Debug,
    /// Most verbose
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Delays used by the replay sequence. Tests shrink these to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaySettings {
    /// Wait after the shell is shown before any text is injected
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Wait between sending `exit` and disposing the shell
    #[serde(default = "default_close_delay_ms")]
    pub close_delay_ms: u64,
}

impl Default for ReplaySettings {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
            close_delay_ms: default_close_delay_ms(),
        }
    }
}

impl ReplaySettings {
    /// All delays zero, for tests and scripted use
    pub fn immediate() -> Self {
        Self {
            settle_delay_ms: 0,
            close_delay_ms: 0,
        }
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms)
    }

    /// Whole seconds announced in the close warning, rounded up from the close delay
    pub fn close_countdown_secs(&self) -> u64 {
        self.close_delay_ms.div_ceil(1000)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub replay: ReplaySettings,

    /// Message language (None = detect from the environment)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<Locale>,

    #[serde(default)]
    pub log_level: LogLevel,

    /// Fallback working directory when neither the profile nor a project supplies one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_directory: Option<String>,

    /// Editor command line used by `edit` (None = $VISUAL, then $EDITOR)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,

    /// Debounce for profile file change notifications
    #[serde(default = "default_watch_debounce_ms")]
    pub watch_debounce_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            replay: ReplaySettings::default(),
            locale: None,
            log_level: LogLevel::default(),
            default_directory: None,
            editor: None,
            watch_debounce_ms: default_watch_debounce_ms(),
        }
    }
}

impl Settings {
    /// Get the settings file path (using XDG convention)
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    pub fn config_dir() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("termdeck")
        }
        #[cfg(not(target_os = "windows"))]
        {
            dirs::home_dir()
                .map(|home| home.join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
                .join("termdeck")
        }
    }

    /// Load from the default location
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load from `path`; a missing or empty file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("Settings file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let contents = substitute_variables(&contents);
        let settings: Settings = serde_yaml_ng::from_str(&contents)?;
        log::info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Configured locale, or the environment's
    pub fn effective_locale(&self) -> Locale {
        self.locale.unwrap_or_else(Locale::from_env)
    }

    pub fn messages(&self) -> std::sync::Arc<dyn Messages> {
        self.effective_locale().messages()
    }

    /// Fallback working directory: configured default, then home, then `.`
    pub fn fallback_directory(&self) -> PathBuf {
        self.default_directory
            .as_ref()
            .map(PathBuf::from)
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = tempdir().unwrap();
        let settings = Settings::load_from(&temp.path().join("config.yaml")).unwrap();
        assert_eq!(settings.replay.settle_delay_ms, 1000);
        assert_eq!(settings.replay.close_delay_ms, 3000);
        assert_eq!(settings.replay.close_countdown_secs(), 3);
        assert_eq!(settings.log_level, LogLevel::Off);
        assert_eq!(settings.watch_debounce_ms, 250);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "replay:\n  settle_delay_ms: 0\nlocale: es\nlog_level: debug\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.replay.settle_delay(), Duration::ZERO);
        assert_eq!(settings.replay.close_delay_ms, 3000);
        assert_eq!(settings.locale, Some(Locale::Es));
        assert_eq!(settings.effective_locale(), Locale::Es);
        assert_eq!(settings.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "replay: [unclosed").unwrap();
        assert!(matches!(Settings::load_from(&path), Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_close_countdown_follows_close_delay() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "replay:\n  close_delay_ms: 10000\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.replay.close_countdown_secs(), 10);

        let partial = ReplaySettings {
            close_delay_ms: 2500,
            ..ReplaySettings::default()
        };
        assert_eq!(partial.close_countdown_secs(), 3);
        assert_eq!(ReplaySettings::immediate().close_countdown_secs(), 0);
    }

    #[test]
    fn test_log_level_names() {
        let settings: Settings = serde_yaml_ng::from_str("log_level: warn\n").unwrap();
        assert_eq!(settings.log_level, LogLevel::Warn);
        assert!(serde_yaml_ng::from_str::<Settings>("log_level: bogus\n").is_err());
        assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
    }
}

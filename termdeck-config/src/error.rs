//! Typed error variants for the termdeck-config crate.
//!
//! The best-effort paths (`ProfileStore::load`, `ProfileStore::save`) log and
//! swallow these. The strict paths (`update_property`, `prepare_for_edit`,
//! `try_load`, settings loading) return them so callers that need a
//! confirmed write can observe the failure.
//!
//! # Example
//!
//! ```rust,no_run
//! use termdeck_config::{ConfigError, ProfileStore};
//!
//! let store = ProfileStore::at_path("/tmp/project/.vscode/powershell-terminals.json");
//! match store.update_property("Build", "cerrar", "si".into()) {
//!     Ok(()) => {}
//!     Err(ConfigError::NotFound { name }) => eprintln!("no profile named {name}"),
//!     Err(e) => eprintln!("update failed: {e}"),
//! }
//! ```

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing a file failed.
    #[error("I/O error on profile configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The profile file is not a valid JSON array of records.
    #[error("JSON format error in profile configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// The settings file contained YAML that could not be parsed.
    #[error("YAML parse error in settings: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// No record carries the requested name.
    #[error("Terminal \"{name}\" not found")]
    NotFound { name: String },

    /// A rename would give two profiles the same name.
    #[error("A terminal named \"{name}\" already exists")]
    NameCollision { name: String },

    /// The store has no backing file (no project root was known).
    #[error("No project folder is open; profile storage is unavailable")]
    StoreInert,

    /// A value failed semantic validation.
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display_names_the_profile() {
        let err = ConfigError::NotFound {
            name: "Build".to_string(),
        };
        assert_eq!(err.to_string(), "Terminal \"Build\" not found");
    }

    #[test]
    fn test_json_error_keeps_source() {
        let parse = serde_json::from_str::<serde_json::Value>("[{").unwrap_err();
        let err = ConfigError::from(parse);
        assert!(std::error::Error::source(&err).is_some());
    }
}

//! Presentation layer: turns registry operations into localized notices.
//!
//! Every user-facing operation either succeeds (emitting its own success
//! notice) or returns an error that [`App::report_failure`] turns into a
//! single localized error notice. The core crates never print.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use termdeck_config::{ConfigError, MessageKey, Messages, ProfileRegistry, ProfileStore, Settings};
use termdeck_terminal::HostFamily;

use crate::editor;
use crate::list_view::{ListItem, build_list_items};

/// A message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Warning(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Info(text) | Notice::Warning(text) | Notice::Error(text) => text,
        }
    }

    /// Info goes to stdout; warnings and errors to stderr
    pub fn print(&self) {
        match self {
            Notice::Info(text) => println!("{}", text),
            Notice::Warning(text) => eprintln!("warning: {}", text),
            Notice::Error(text) => eprintln!("error: {}", text),
        }
    }
}

/// Receives every notice the app emits
pub type NoticeSink = Arc<dyn Fn(&Notice) + Send + Sync>;

pub struct App {
    registry: ProfileRegistry,
    settings: Settings,
    messages: Arc<dyn Messages>,
    family: HostFamily,
    project_root: Option<PathBuf>,
    sink: NoticeSink,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("registry", &self.registry)
            .field("family", &self.family)
            .field("project_root", &self.project_root)
            .finish_non_exhaustive()
    }
}

impl App {
    /// Open the profile store for `project_root`.
    ///
    /// When the store cannot be set up, the failure is reported once through
    /// `sink` and the app continues with an inert store.
    pub fn new(project_root: Option<PathBuf>, settings: Settings, sink: NoticeSink) -> Self {
        let messages = settings.messages();
        let store = match ProfileStore::open(project_root.as_deref()) {
            Ok(store) => store,
            Err(e) => {
                log::error!("Failed to initialize profile storage: {}", e);
                sink(&Notice::Error(format!(
                    "{}: {}",
                    messages.text(MessageKey::ErrorInitializingConfig),
                    e
                )));
                ProfileStore::inert()
            }
        };
        if store.is_inert() && project_root.is_none() {
            sink(&Notice::Warning(messages.text(MessageKey::NoProjectFolder)));
        }

        Self {
            registry: ProfileRegistry::new(store),
            settings,
            messages,
            family: HostFamily::current(),
            project_root,
            sink,
        }
    }

    /// Override the detected host family
    pub fn with_family(mut self, family: HostFamily) -> Self {
        self.family = family;
        self
    }

    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn messages(&self) -> Arc<dyn Messages> {
        Arc::clone(&self.messages)
    }

    pub fn family(&self) -> HostFamily {
        self.family
    }

    /// Directory for shells whose profile has none (or a stale one):
    /// the project root, else the configured default, else home
    pub fn fallback_directory(&self) -> PathBuf {
        self.project_root
            .clone()
            .unwrap_or_else(|| self.settings.fallback_directory())
    }

    pub fn notify(&self, notice: Notice) {
        (self.sink)(&notice);
    }

    pub fn info(&self, key: MessageKey, args: &[&str]) {
        self.notify(Notice::Info(self.messages.format(key, args)));
    }

    pub fn warn(&self, key: MessageKey, args: &[&str]) {
        self.notify(Notice::Warning(self.messages.format(key, args)));
    }

    /// Report `err` as one localized error notice prefixed by `context`
    pub fn report_failure(&self, context: MessageKey, err: &anyhow::Error) {
        log::error!("{:?} failed: {:#}", context, err);
        let detail = match err.downcast_ref::<ConfigError>() {
            Some(ConfigError::NotFound { name }) => {
                self.messages.format(MessageKey::TerminalNotFound, &[name.as_str()])
            }
            Some(ConfigError::NameCollision { name }) => {
                self.messages.format(MessageKey::NameAlreadyExists, &[name.as_str()])
            }
            Some(ConfigError::StoreInert) => self.messages.text(MessageKey::NoProjectFolder),
            Some(ConfigError::Json(e)) => {
                format!("{}: {}", self.messages.text(MessageKey::ErrorJsonFormat), e)
            }
            _ => format!("{:#}", err),
        };
        self.notify(Notice::Error(format!(
            "{}: {}",
            self.messages.text(context),
            detail
        )));
    }

    pub fn list_items(&self) -> Vec<ListItem> {
        build_list_items(&self.registry.profiles(), self.family, self.messages.as_ref())
    }

    fn require_profile(&self, name: &str) -> Result<()> {
        if self.registry.find(name).is_none() {
            return Err(ConfigError::NotFound {
                name: name.to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn require_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(ConfigError::Validation("terminal name must not be empty".to_string()).into());
        }
        Ok(())
    }

    fn require_store(&self) -> Result<()> {
        if self.registry.store().is_inert() {
            return Err(ConfigError::StoreInert.into());
        }
        Ok(())
    }

    pub fn add(&self, name: &str, working_directory: Option<&Path>) -> Result<()> {
        Self::require_name(name)?;
        self.require_store()?;
        let dir = working_directory.map(|d| d.to_string_lossy().into_owned());
        self.registry.add(name, dir.as_deref());
        self.info(MessageKey::TerminalCreated, &[name]);
        Ok(())
    }

    /// Remove `name` after `confirm` accepts the localized question.
    pub fn remove(&self, name: &str, confirm: impl FnOnce(&str) -> bool) -> Result<()> {
        self.require_store()?;
        self.require_profile(name)?;
        let question = self.messages.format(MessageKey::ConfirmDeleteTerminal, &[name]);
        if !confirm(&question) {
            self.info(MessageKey::TerminalDeletionCancelled, &[]);
            return Ok(());
        }
        self.registry.remove(name);
        self.info(MessageKey::TerminalDeleted, &[name]);
        Ok(())
    }

    pub fn rename(&self, old_name: &str, new_name: &str) -> Result<()> {
        Self::require_name(new_name)?;
        self.require_store()?;
        self.require_profile(old_name)?;
        if old_name == new_name {
            return Ok(());
        }
        self.registry.rename(old_name, new_name)?;
        self.info(MessageKey::TerminalRenamed, &[new_name]);
        Ok(())
    }

    pub fn set_commands(&self, name: &str, commands: Vec<String>) -> Result<()> {
        self.require_store()?;
        self.require_profile(name)?;
        let count = commands.len().to_string();
        self.registry.update_commands(name, commands);
        self.info(MessageKey::CommandsUpdated, &[name, count.as_str()]);
        Ok(())
    }

    /// Set a raw record field. `raw` is parsed as JSON when valid, else
    /// stored as a string.
    pub fn set_property(&self, name: &str, property: &str, raw: &str) -> Result<()> {
        let value = parse_property_value(raw);
        self.registry.update_property(name, property, value)?;
        self.info(MessageKey::PropertyUpdated, &[name, property]);
        Ok(())
    }

    /// Prepare the record, open the profile file in the editor and pick up
    /// the result once the editor exits.
    pub fn edit(&self, name: &str) -> Result<()> {
        Self::require_name(name)?;
        let working_directory = self
            .registry
            .find(name)
            .and_then(|p| p.working_directory);
        let path = self
            .registry
            .store()
            .prepare_for_edit(name, working_directory.as_deref())?;

        self.info(MessageKey::EditingConfiguration, &[name]);
        let command = editor::editor_command(self.settings.editor.as_deref());
        editor::edit_file(&command, &path)
            .with_context(|| format!("editing {}", path.display()))?;

        self.registry.store().try_load()?;
        self.registry.notifier().fire();
        self.info(MessageKey::ConfigurationUpdated, &[name]);
        Ok(())
    }
}

/// JSON when `raw` parses as JSON, otherwise the raw string
pub fn parse_property_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use tempfile::TempDir;
    use termdeck_config::{CloseOnFinish, Locale};

    struct Harness {
        _temp: TempDir,
        app: App,
        notices: Arc<Mutex<Vec<Notice>>>,
    }

    fn harness() -> Harness {
        let temp = TempDir::new().unwrap();
        let notices = Arc::new(Mutex::new(Vec::new()));
        let sink_notices = Arc::clone(&notices);
        let settings = Settings {
            locale: Some(Locale::En),
            ..Settings::default()
        };
        let app = App::new(
            Some(temp.path().to_path_buf()),
            settings,
            Arc::new(move |n: &Notice| sink_notices.lock().push(n.clone())),
        )
        .with_family(HostFamily::Other);
        Harness {
            _temp: temp,
            app,
            notices,
        }
    }

    impl Harness {
        fn last(&self) -> Notice {
            self.notices.lock().last().cloned().unwrap()
        }
    }

    #[test]
    fn test_parse_property_value() {
        assert_eq!(parse_property_value("\"si\""), Value::from("si"));
        assert_eq!(parse_property_value("si"), Value::from("si"));
        assert_eq!(parse_property_value("[\"a\"]"), serde_json::json!(["a"]));
        assert_eq!(parse_property_value("3"), Value::from(3));
    }

    #[test]
    fn test_add_notifies_success() {
        let h = harness();
        h.app.add("Build", None).unwrap();
        assert_eq!(h.last(), Notice::Info("Terminal \"Build\" created successfully".into()));
        assert_eq!(h.app.list_items().len(), 3);
    }

    #[test]
    fn test_add_rejects_blank_name() {
        let h = harness();
        assert!(h.app.add("  ", None).is_err());
        assert!(h.app.registry().profiles().is_empty());
    }

    #[test]
    fn test_remove_respects_confirmation() {
        let h = harness();
        h.app.add("Build", None).unwrap();

        h.app
            .remove("Build", |q| {
                assert_eq!(q, "Are you sure you want to delete terminal \"Build\"?");
                false
            })
            .unwrap();
        assert_eq!(h.last(), Notice::Info("Terminal deletion cancelled".into()));
        assert!(h.app.registry().find("Build").is_some());

        h.app.remove("Build", |_| true).unwrap();
        assert!(h.app.registry().find("Build").is_none());
    }

    #[test]
    fn test_rename_collision_is_reported() {
        let h = harness();
        h.app.add("A", None).unwrap();
        h.app.add("B", None).unwrap();

        let err = h.app.rename("A", "B").unwrap_err();
        h.app.report_failure(MessageKey::ErrorRenamingTerminal, &err);

        assert_eq!(
            h.last(),
            Notice::Error("Error renaming terminal: A terminal named \"B\" already exists".into())
        );
    }

    #[test]
    fn test_missing_profile_is_reported_as_not_found() {
        let h = harness();
        let err = h.app.set_commands("Ghost", vec!["ls".into()]).unwrap_err();
        h.app.report_failure(MessageKey::ErrorConfiguringCommands, &err);
        assert_eq!(
            h.last(),
            Notice::Error("Error configuring commands: Terminal \"Ghost\" not found".into())
        );
    }

    #[test]
    fn test_set_property_close_flag() {
        let h = harness();
        h.app.add("Build", None).unwrap();
        h.app.set_property("Build", "cerrar", "si").unwrap();
        assert_eq!(
            h.app.registry().find("Build").unwrap().close_on_finish,
            CloseOnFinish::Yes
        );
        assert_eq!(h.last(), Notice::Info("Property \"cerrar\" updated for \"Build\"".into()));
    }

    #[test]
    fn test_set_commands_reports_count() {
        let h = harness();
        h.app.add("Build", None).unwrap();
        h.app
            .set_commands("Build", vec!["npm ci".into(), "npm test".into()])
            .unwrap();
        assert_eq!(
            h.last(),
            Notice::Info("Commands updated for terminal \"Build\": 2 commands".into())
        );
    }

    #[test]
    fn test_no_project_gives_inert_store() {
        let notices = Arc::new(Mutex::new(Vec::new()));
        let sink_notices = Arc::clone(&notices);
        let app = App::new(
            None,
            Settings {
                locale: Some(Locale::En),
                ..Settings::default()
            },
            Arc::new(move |n: &Notice| sink_notices.lock().push(n.clone())),
        );

        assert!(app.registry().store().is_inert());
        assert!(matches!(notices.lock().first(), Some(Notice::Warning(_))));
        assert!(app.add("Build", None).is_err());
    }

    #[test]
    fn test_unusable_config_dir_is_reported_once() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".vscode"), "").unwrap();
        let notices = Arc::new(Mutex::new(Vec::new()));
        let sink_notices = Arc::clone(&notices);
        let app = App::new(
            Some(temp.path().to_path_buf()),
            Settings {
                locale: Some(Locale::En),
                ..Settings::default()
            },
            Arc::new(move |n: &Notice| sink_notices.lock().push(n.clone())),
        );

        assert!(app.registry().store().is_inert());
        {
            let notices = notices.lock();
            assert_eq!(notices.len(), 1);
            assert!(matches!(
                &notices[0],
                Notice::Error(text) if text.starts_with("Could not initialize terminal configuration: ")
            ));
        }

        let err = app.add("A", None).unwrap_err();
        app.report_failure(MessageKey::ErrorCreatingTerminal, &err);
        assert_eq!(
            notices.lock().last().cloned(),
            Some(Notice::Error(
                "Error creating terminal: No project folder is open; saved terminals are unavailable"
                    .into()
            ))
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_edit_prepares_record_and_reloads() {
        let mut h = harness();
        h.app.settings.editor = Some("true".to_string());

        h.app.edit("Fresh").unwrap();

        let profile = h.app.registry().find("Fresh").unwrap();
        assert!(profile.commands.is_none());
        assert_eq!(h.last(), Notice::Info("Configuration updated for \"Fresh\"".into()));
    }
}

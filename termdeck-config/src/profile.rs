//! Core `Profile` struct and its direct implementation.

use std::fmt;

/// Flag value persisted under `cerrar` when the shell should exit after its commands.
pub const CLOSE_FLAG_YES: &str = "si";
/// Flag value persisted under `cerrar` when the shell stays open (the default).
pub const CLOSE_FLAG_NO: &str = "no";

/// Whether the shell terminates itself after the last configured command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CloseOnFinish {
    /// Leave the shell open and interactive
    #[default]
    No,
    /// Send `exit` and dispose the shell after a short delay
    Yes,
}

impl CloseOnFinish {
    /// Interpret a persisted flag. Only the exact `"si"` value enables closing.
    pub fn from_flag(flag: &str) -> Self {
        if flag == CLOSE_FLAG_YES {
            CloseOnFinish::Yes
        } else {
            CloseOnFinish::No
        }
    }

    /// The string written to disk for this flag
    pub fn as_flag(self) -> &'static str {
        match self {
            CloseOnFinish::Yes => CLOSE_FLAG_YES,
            CloseOnFinish::No => CLOSE_FLAG_NO,
        }
    }

    pub fn is_enabled(self) -> bool {
        self == CloseOnFinish::Yes
    }
}

impl From<bool> for CloseOnFinish {
    fn from(value: bool) -> Self {
        if value {
            CloseOnFinish::Yes
        } else {
            CloseOnFinish::No
        }
    }
}

impl fmt::Display for CloseOnFinish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_flag())
    }
}

/// A named terminal profile: working directory, ordered startup commands and close behavior.
///
/// `name` is the identity key. `commands` is `None` when there are no
/// automatic commands; an empty list is never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    /// Display name and unique key for the profile
    pub name: String,

    /// Working directory for the shell (if None, the caller's fallback is used)
    pub working_directory: Option<String>,

    /// Commands sent to the shell in order after startup
    pub commands: Option<Vec<String>>,

    /// Whether the shell exits after the last command
    pub close_on_finish: CloseOnFinish,
}

impl Profile {
    /// Create a new profile with the given name and no commands
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder method to set working directory
    pub fn working_directory(mut self, dir: impl Into<String>) -> Self {
        self.working_directory = Some(dir.into());
        self
    }

    /// Builder method to set the startup commands (an empty list clears them)
    pub fn commands<I, S>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_commands(commands.into_iter().map(Into::into).collect());
        self
    }

    /// Builder method to set close-on-finish
    pub fn close_on_finish(mut self, close: impl Into<CloseOnFinish>) -> Self {
        self.close_on_finish = close.into();
        self
    }

    /// Replace the commands, normalizing an empty list to "no commands".
    pub fn set_commands(&mut self, commands: Vec<String>) {
        self.commands = if commands.is_empty() {
            None
        } else {
            Some(commands)
        };
    }

    /// Commands in execution order (empty slice when none are configured)
    pub fn command_list(&self) -> &[String] {
        self.commands.as_deref().unwrap_or_default()
    }

    /// Number of configured commands
    pub fn command_count(&self) -> usize {
        self.command_list().len()
    }

    pub fn has_commands(&self) -> bool {
        self.command_count() > 0
    }
}

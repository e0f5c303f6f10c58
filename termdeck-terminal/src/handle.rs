//! Shell handle abstraction.
//!
//! A handle is a running shell that accepts lines of text and can be torn
//! down. The replay engine only ever talks to this trait, so tests drive it
//! with an in-memory recorder and the CLI with a child process.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

use crate::shell::ShellProgram;

/// A live shell that receives injected text.
///
/// Handles are shared between the replay task and the host (which may keep
/// forwarding user input), so every method takes `&self`.
pub trait ShellHandle: Send + Sync {
    /// Display name (the profile name, or the platform label for a plain shell)
    fn name(&self) -> &str;

    /// Send `text` to the shell, followed by a newline when `add_newline` is set
    fn send_text(&self, text: &str, add_newline: bool) -> Result<()>;

    /// Bring the shell to the foreground. A no-op for headless shells.
    fn show(&self) {}

    /// Tear the shell down. Disposing twice is not an error.
    fn dispose(&self) -> Result<()>;
}

/// Everything needed to start a shell for a profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellLaunch {
    pub name: String,
    pub program: ShellProgram,
    pub working_directory: PathBuf,
}

/// Creates shell handles. The CLI spawns processes; tests record text.
///
/// The concrete handle type is kept so the creator can still use
/// capabilities beyond [`ShellHandle`] (waiting on a process, inspecting a
/// recording) after handing a clone to the replay engine.
pub trait ShellFactory: Send + Sync {
    type Handle: ShellHandle + 'static;

    fn create(&self, launch: &ShellLaunch) -> Result<Arc<Self::Handle>>;
}

//! Shell handles backed by a child process.
//!
//! The shell reads injected lines from a piped stdin; stdout and stderr are
//! inherited so the user sees the shell's output directly.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::io::Write;
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;

use crate::handle::{ShellFactory, ShellHandle, ShellLaunch};

/// Poll interval while waiting for the shell to exit
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct ProcessShell {
    name: String,
    child: Mutex<Option<Child>>,
    stdin: Mutex<Option<ChildStdin>>,
}

impl std::fmt::Debug for ProcessShell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessShell")
            .field("name", &self.name)
            .field("running", &self.is_running())
            .finish()
    }
}

impl ProcessShell {
    /// Spawn the shell described by `launch`
    pub fn spawn(launch: &ShellLaunch) -> Result<Self> {
        let mut child = Command::new(&launch.program.path)
            .args(&launch.program.args)
            .current_dir(&launch.working_directory)
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("Failed to spawn shell '{}'", launch.program.path))?;

        let stdin = child.stdin.take().context("Failed to capture shell stdin")?;

        log::info!(
            "Spawned {} for \"{}\" in {} (pid {})",
            launch.program,
            launch.name,
            launch.working_directory.display(),
            child.id()
        );

        Ok(Self {
            name: launch.name.clone(),
            child: Mutex::new(Some(child)),
            stdin: Mutex::new(Some(stdin)),
        })
    }

    /// Whether the child process is still alive
    pub fn is_running(&self) -> bool {
        match self.child.lock().as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    /// Close stdin so the shell sees end of input and exits on its own
    pub fn close_input(&self) {
        if self.stdin.lock().take().is_some() {
            log::debug!("Closed stdin of shell \"{}\"", self.name);
        }
    }

    /// Block until the shell exits.
    ///
    /// Returns `None` when the shell was already disposed.
    pub fn wait(&self) -> Result<Option<ExitStatus>> {
        loop {
            {
                let mut guard = self.child.lock();
                let Some(child) = guard.as_mut() else {
                    return Ok(None);
                };
                if let Some(status) = child.try_wait().context("Failed to poll shell status")? {
                    guard.take();
                    return Ok(Some(status));
                }
            }
            std::thread::sleep(WAIT_POLL_INTERVAL);
        }
    }
}

impl ShellHandle for ProcessShell {
    fn name(&self) -> &str {
        &self.name
    }

    fn send_text(&self, text: &str, add_newline: bool) -> Result<()> {
        let mut guard = self.stdin.lock();
        let stdin = guard
            .as_mut()
            .with_context(|| format!("Shell \"{}\" no longer accepts input", self.name))?;

        stdin.write_all(text.as_bytes())?;
        if add_newline {
            stdin.write_all(b"\n")?;
        }
        stdin.flush()?;
        log::trace!("Sent to \"{}\": {:?}", self.name, text);
        Ok(())
    }

    fn dispose(&self) -> Result<()> {
        self.close_input();

        let Some(mut child) = self.child.lock().take() else {
            return Ok(());
        };
        if child.try_wait()?.is_none() {
            log::debug!("Killing shell \"{}\" (pid {})", self.name, child.id());
            child.kill().context("Failed to kill shell")?;
        }
        let _ = child.wait();
        log::info!("Disposed shell \"{}\"", self.name);
        Ok(())
    }
}

impl Drop for ProcessShell {
    fn drop(&mut self) {
        if let Err(e) = self.dispose() {
            log::warn!("Failed to dispose shell \"{}\": {}", self.name, e);
        }
    }
}

/// Spawns [`ProcessShell`]s
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessShellFactory;

impl ShellFactory for ProcessShellFactory {
    type Handle = ProcessShell;

    fn create(&self, launch: &ShellLaunch) -> Result<Arc<ProcessShell>> {
        ProcessShell::spawn(launch).map(Arc::new)
    }
}

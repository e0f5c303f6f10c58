//! `termdeck run`: open a shell for a profile and replay it.

use anyhow::{Context, Result};
use std::io::BufRead;
use std::sync::Arc;
use tokio::runtime::Runtime;

use termdeck_config::{ConfigError, MessageKey, ReplaySettings};
use termdeck_terminal::{ProcessShell, ProcessShellFactory, ReplayLauncher, ShellHandle};

use crate::app::App;

/// Replay `name` (or a plain shell) in a child process.
///
/// Without close-on-finish, the shell stays open after the replay and
/// receives this process's stdin line by line until end of input.
/// `immediate` skips the settle and close delays.
pub fn run_profile(app: &App, runtime: &Runtime, name: Option<&str>, immediate: bool) -> Result<()> {
    let profile = match name {
        Some(name) => Some(app.registry().find(name).ok_or_else(|| ConfigError::NotFound {
            name: name.to_string(),
        })?),
        None => None,
    };

    if let Some(profile) = &profile {
        crate::debug_info!(
            "REPLAY",
            "Opening \"{}\" with {} commands",
            profile.name,
            profile.command_count()
        );
        for (i, command) in profile.command_list().iter().enumerate() {
            crate::debug_log!("REPLAY", "  {}. {}", i + 1, command);
        }
    }

    let settings = if immediate {
        ReplaySettings::immediate()
    } else {
        app.settings().replay
    };
    let launcher = ReplayLauncher::new(
        ProcessShellFactory,
        settings,
        app.messages(),
        app.fallback_directory(),
    )
    .with_family(app.family());
    let launched = launcher.launch(profile.as_ref())?;

    if let Some(stale) = &launched.directory.stale {
        app.warn(MessageKey::DirectoryNotExists, &[stale.as_str()]);
    }
    let label = profile
        .as_ref()
        .map(|p| format!(" \"{}\"", p.name))
        .unwrap_or_default();
    let directory = launched.directory.path.display().to_string();
    app.info(MessageKey::TerminalOpenedAt, &[label.as_str(), directory.as_str()]);

    let shell = launched.shell;
    let engine = launched
        .engine
        .on_transition(|state| crate::debug_log!("REPLAY", "-> {}", state));
    let plan = engine.plan();
    let closes = plan.disposes();
    crate::debug_log!("REPLAY", "Plan states: {:?}", plan.states());
    for line in plan.sent_lines() {
        crate::debug_trace!("REPLAY", "  send: {}", line);
    }

    let report = runtime
        .block_on(engine.spawn(runtime.handle()))
        .context("Replay task failed")?;
    if report.failed_sends > 0 {
        log::warn!("{} replay lines could not be sent", report.failed_sends);
    }

    if !closes {
        forward_stdin(&shell)?;
    }
    if let Some(status) = shell.wait()? {
        log::info!("Shell \"{}\" exited with {}", shell.name(), status);
    }
    Ok(())
}

/// Send stdin lines to the shell until end of input or until the shell stops
/// accepting input, then close its input.
fn forward_stdin(shell: &Arc<ProcessShell>) -> Result<()> {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read stdin")?;
        if let Err(e) = shell.send_text(&line, true) {
            log::debug!("Stopped forwarding input: {}", e);
            break;
        }
    }
    shell.close_input();
    Ok(())
}

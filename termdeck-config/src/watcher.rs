//! Profile file watcher.
//!
//! Watches the project profile file for edits made outside the registry (a
//! text editor, another process, version control) and fires the
//! [`ChangeNotifier`] so list views re-query the store. Events are debounced
//! on the trailing edge: one notification once the file has been quiet for
//! the debounce delay, so a truncate followed by a write is seen as the
//! final contents.

use anyhow::{Context, Result};
use notify::{Config as NotifyConfig, Event, PollWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::notifier::ChangeNotifier;

/// Keeps the underlying file system watcher alive; dropping it stops watching.
pub struct ProfileFileWatcher {
    _watcher: Box<dyn Watcher + Send>,
    path: PathBuf,
}

impl std::fmt::Debug for ProfileFileWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileFileWatcher")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Trailing-edge debounce around a [`ChangeNotifier`].
///
/// Every [`Debouncer::event`] restarts the quiet window. At most one timer
/// thread is pending at a time.
#[derive(Clone)]
struct Debouncer {
    delay: Duration,
    notifier: ChangeNotifier,
    state: Arc<Mutex<DebounceState>>,
}

#[derive(Default)]
struct DebounceState {
    last_event: Option<Instant>,
    pending: bool,
}

impl Debouncer {
    fn new(delay: Duration, notifier: ChangeNotifier) -> Self {
        Self {
            delay,
            notifier,
            state: Arc::new(Mutex::new(DebounceState::default())),
        }
    }

    fn event(&self) {
        {
            let mut state = self.state.lock();
            state.last_event = Some(Instant::now());
            if state.pending {
                log::trace!("Debouncing profile file event");
                return;
            }
            state.pending = true;
        }

        let debouncer = self.clone();
        std::thread::spawn(move || debouncer.fire_when_quiet());
    }

    fn fire_when_quiet(&self) {
        loop {
            let remaining = {
                let mut state = self.state.lock();
                let elapsed = state.last_event.map(|t| t.elapsed()).unwrap_or(self.delay);
                if elapsed >= self.delay {
                    state.pending = false;
                    None
                } else {
                    Some(self.delay - elapsed)
                }
            };
            match remaining {
                Some(wait) => std::thread::sleep(wait),
                None => break,
            }
        }
        log::info!("Profile file changed");
        self.notifier.fire();
    }
}

/// Build the event-handler closure shared by both watcher backends.
///
/// Filters events to `filename` and feeds the debouncer.
fn make_event_handler(
    filename: OsString,
    debouncer: Debouncer,
) -> impl Fn(std::result::Result<Event, notify::Error>) + Send + 'static {
    move |result: std::result::Result<Event, notify::Error>| {
        let event = match result {
            Ok(event) => event,
            Err(e) => {
                log::warn!("Profile watcher error: {}", e);
                return;
            }
        };

        // Create and remove cover atomic saves and deletions
        if !matches!(
            event.kind,
            notify::EventKind::Modify(_) | notify::EventKind::Create(_) | notify::EventKind::Remove(_)
        ) {
            return;
        }

        let matches_profile_file = event
            .paths
            .iter()
            .any(|p| p.file_name().is_some_and(|f| f == filename));
        if matches_profile_file {
            log::debug!("Profile file event ({:?})", event.kind);
            debouncer.event();
        }
    }
}

impl ProfileFileWatcher {
    /// Start watching `profile_path`.
    ///
    /// The file itself may not exist yet, but its parent directory must.
    /// Tries the platform's native watcher first and falls back to a
    /// `PollWatcher` (500 ms interval) when that backend is unavailable.
    pub fn new(profile_path: &Path, debounce_delay_ms: u64, notifier: ChangeNotifier) -> Result<Self> {
        let filename = profile_path
            .file_name()
            .context("Profile path has no filename")?
            .to_os_string();
        let parent_dir = profile_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .context("Profile path has no parent directory")?;
        if !parent_dir.is_dir() {
            anyhow::bail!("Profile directory not found: {}", parent_dir.display());
        }

        let debouncer = Debouncer::new(Duration::from_millis(debounce_delay_ms), notifier);
        let mut watcher = Self::create_watcher(filename, debouncer)?;
        watcher
            .watch(parent_dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch profile directory: {}", parent_dir.display()))?;

        log::info!("Watching profile file {}", profile_path.display());

        Ok(Self {
            _watcher: watcher,
            path: profile_path.to_path_buf(),
        })
    }

    fn create_watcher(filename: OsString, debouncer: Debouncer) -> Result<Box<dyn Watcher + Send>> {
        let handler = make_event_handler(filename.clone(), debouncer.clone());

        match notify::recommended_watcher(handler) {
            Ok(w) => {
                log::debug!("Profile watcher: using native backend");
                Ok(Box::new(w))
            }
            Err(e) => {
                log::warn!(
                    "Profile watcher: native backend unavailable ({}); falling back to PollWatcher",
                    e
                );
                let fallback_handler = make_event_handler(filename, debouncer);
                let poll_watcher = PollWatcher::new(
                    fallback_handler,
                    NotifyConfig::default().with_poll_interval(Duration::from_millis(500)),
                )
                .context("Failed to create fallback PollWatcher")?;
                Ok(Box::new(poll_watcher))
            }
        }
    }
}

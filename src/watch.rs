//! `termdeck watch`: keep the list on screen, re-rendered on every change.

use anyhow::Result;
use std::io::Write;
use tokio::runtime::Runtime;

use termdeck_config::{ConfigError, ProfileFileWatcher};

use crate::app::App;
use crate::list_view::{build_list_items, render_list};

/// Clear screen and move the cursor home
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub fn watch_profiles(app: &App, runtime: &Runtime) -> Result<()> {
    let path = app
        .registry()
        .store()
        .path()
        .ok_or(ConfigError::StoreInert)?
        .to_path_buf();

    let registry = app.registry().clone();
    let messages = app.messages();
    let family = app.family();
    let redraw = move || {
        let items = build_list_items(&registry.profiles(), family, messages.as_ref());
        print!("{}{}", CLEAR_SCREEN, render_list(&items));
        let _ = std::io::stdout().flush();
    };

    redraw();
    let notifier = app.registry().notifier().clone();
    let subscription = notifier.subscribe(redraw);
    let _watcher = ProfileFileWatcher::new(&path, app.settings().watch_debounce_ms, notifier.clone())?;

    crate::debug_info!("WATCH", "Watching {} until interrupted", path.display());
    runtime.block_on(tokio::signal::ctrl_c())?;

    notifier.unsubscribe(subscription);
    Ok(())
}

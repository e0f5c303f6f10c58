use anyhow::Result;
use std::sync::Arc;
use termdeck::app::{App, Notice};
use termdeck::cli::{self, Commands};
use termdeck_config::Settings;
use tokio::runtime::Runtime;

fn main() -> Result<()> {
    // Process CLI arguments first (before logging init for cleaner output)
    let options = match cli::process_cli() {
        cli::CliResult::Exit(code) => {
            if code == 0 {
                return Ok(());
            }
            std::process::exit(code);
        }
        cli::CliResult::Continue(options) => options,
    };
    // CLI --log-level flag takes highest precedence, then RUST_LOG, then config (applied below)
    termdeck::debug::init_log_bridge(options.log_level);

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("termdeck: error: {e:#}");
            std::process::exit(1);
        }
    };
    termdeck::debug::apply_config_log_level(settings.log_level.to_level_filter());

    log::info!("Starting termdeck {}", termdeck::VERSION);

    // Runs replays and the watch loop
    let runtime = Runtime::new()?;

    let project_root = match options.project {
        Some(dir) => Some(std::path::absolute(dir)?),
        None => std::env::current_dir().ok(),
    };
    let app = App::new(project_root, settings, Arc::new(|notice: &Notice| notice.print()));

    let code = cli::dispatch(&app, &runtime, options.command.unwrap_or(Commands::List));
    log::info!("Exiting with code {}", code);

    drop(app);
    runtime.shutdown_timeout(std::time::Duration::from_secs(2));
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

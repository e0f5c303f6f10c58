//! Command-line interface for termdeck.
//!
//! Parsing lives here together with [`dispatch`], which runs one subcommand
//! against an [`App`] and maps its failure to the localized message shown to
//! the user.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use termdeck_config::MessageKey;

use crate::app::App;
use crate::list_view::render_list;

/// termdeck - Named shell profiles with command replay
#[derive(Parser)]
#[command(name = "termdeck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Project folder holding .vscode/powershell-terminals.json (default: current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub project: Option<PathBuf>,

    /// Set debug log level (overrides config and RUST_LOG)
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevelArg>,
}

/// Log level argument for CLI
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevelArg::Off => log::LevelFilter::Off,
            LogLevelArg::Error => log::LevelFilter::Error,
            LogLevelArg::Warn => log::LevelFilter::Warn,
            LogLevelArg::Info => log::LevelFilter::Info,
            LogLevelArg::Debug => log::LevelFilter::Debug,
            LogLevelArg::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Show the saved terminals (default)
    List,

    /// Save a new terminal profile
    Add {
        name: String,

        /// Working directory (default: project folder)
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Delete a terminal profile
    Remove {
        name: String,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Rename a terminal profile
    Rename { old_name: String, new_name: String },

    /// Replace the commands replayed when the terminal opens
    SetCommands {
        name: String,

        /// Commands, in order (none clears the list)
        commands: Vec<String>,
    },

    /// Set one stored property (value is parsed as JSON, else taken as text)
    Set {
        name: String,
        property: String,
        value: String,
    },

    /// Edit a profile's record in $EDITOR
    Edit { name: String },

    /// Open a shell for a profile (or a plain shell) and replay its commands
    Run {
        name: Option<String>,

        /// Skip the settle and close delays
        #[arg(long)]
        immediate: bool,
    },

    /// Keep the list on screen, redrawn when the profile file changes
    Watch,
}

/// Options that survive parsing
#[derive(Clone, Debug, Default)]
pub struct CliOptions {
    pub command: Option<Commands>,
    pub project: Option<PathBuf>,
    pub log_level: Option<log::LevelFilter>,
}

/// Result of CLI processing
pub enum CliResult {
    /// Continue with application startup
    Continue(CliOptions),
    /// Exit with the given code
    Exit(i32),
}

/// Parse the process arguments
pub fn process_cli() -> CliResult {
    match Cli::try_parse() {
        Ok(cli) => CliResult::Continue(CliOptions {
            command: cli.command,
            project: cli.project,
            log_level: cli.log_level.map(LogLevelArg::to_level_filter),
        }),
        Err(e) => {
            // --help and --version land here as well
            let code = if e.use_stderr() { 2 } else { 0 };
            let _ = e.print();
            CliResult::Exit(code)
        }
    }
}

/// Run `command` and return the process exit code.
pub fn dispatch(app: &App, runtime: &Runtime, command: Commands) -> i32 {
    let (context, result) = match command {
        Commands::List => {
            print!("{}", render_list(&app.list_items()));
            return 0;
        }
        Commands::Add { name, dir } => (
            MessageKey::ErrorCreatingTerminal,
            absolute_dir(dir).and_then(|dir| app.add(&name, dir.as_deref())),
        ),
        Commands::Remove { name, yes } => (
            MessageKey::ErrorDeletingTerminal,
            app.remove(&name, |question| yes || confirm(app, question)),
        ),
        Commands::Rename { old_name, new_name } => (
            MessageKey::ErrorRenamingTerminal,
            app.rename(&old_name, &new_name),
        ),
        Commands::SetCommands { name, commands } => (
            MessageKey::ErrorConfiguringCommands,
            app.set_commands(&name, commands),
        ),
        Commands::Set {
            name,
            property,
            value,
        } => (
            MessageKey::ErrorUpdatingProperty,
            app.set_property(&name, &property, &value),
        ),
        Commands::Edit { name } => (MessageKey::ErrorConfiguringCommands, app.edit(&name)),
        Commands::Run { name, immediate } => (
            MessageKey::ErrorOpeningTerminal,
            crate::run::run_profile(app, runtime, name.as_deref(), immediate),
        ),
        Commands::Watch => (
            MessageKey::ErrorLoadingConfig,
            crate::watch::watch_profiles(app, runtime),
        ),
    };

    match result {
        Ok(()) => 0,
        Err(e) => {
            crate::debug_error!("CLI", "{:#}", e);
            app.report_failure(context, &e);
            1
        }
    }
}

fn absolute_dir(dir: Option<PathBuf>) -> Result<Option<PathBuf>> {
    Ok(match dir {
        Some(dir) => Some(std::path::absolute(&dir)?),
        None => None,
    })
}

/// Ask `question` on stdin. Only an explicit yes confirms.
fn confirm(app: &App, question: &str) -> bool {
    print!("{} [y/N] ", question);
    let _ = io::stdout().flush();

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    is_yes(&answer, &app.messages().text(MessageKey::Yes))
}

/// True for `y`, `yes`, the localized yes word or its first letter.
fn is_yes(answer: &str, localized_yes: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    if answer.is_empty() {
        return false;
    }
    let localized = localized_yes.to_lowercase();
    answer == "y"
        || answer == "yes"
        || answer == localized
        || localized.chars().next().is_some_and(|c| answer == c.to_string())
}

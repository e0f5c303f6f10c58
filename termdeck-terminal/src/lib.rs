//! Shell selection, shell handles and profile replay for termdeck.
//!
//! - [`platform`] / [`shell`]: which shell binary a host family launches
//! - [`dialect`]: title, banner and warning lines per shell dialect
//! - [`handle`]: the [`ShellHandle`] / [`ShellFactory`] seam
//! - [`process`]: handles backed by a child process
//! - [`replay`]: the replay plan and its async executor
//! - [`launcher`]: one call from a profile to a shown shell plus its replay

pub mod dialect;
pub mod handle;
pub mod launcher;
pub mod platform;
pub mod process;
pub mod replay;
pub mod shell;
pub mod working_dir;

pub use dialect::ShellDialect;
pub use handle::{ShellFactory, ShellHandle, ShellLaunch};
pub use launcher::{LaunchedReplay, ReplayLauncher};
pub use platform::HostFamily;
pub use process::{ProcessShell, ProcessShellFactory};
pub use replay::{ReplayEngine, ReplayPlan, ReplayReport, ReplayState, ReplayStep, TransitionObserver};
pub use shell::{ShellProgram, select_shell, select_shell_with};
pub use working_dir::{ResolvedDirectory, resolve_working_directory};

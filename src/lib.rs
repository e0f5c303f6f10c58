// Library exports for testing and potential library use
//
// Persistence and settings live in `termdeck-config`; shell processes and the
// replay engine live in `termdeck-terminal`. This crate wires them into the
// command-line front end.

/// Application version (root crate version, for use by sub-crates).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[macro_use]
pub mod debug;

pub mod app;
pub mod cli;
pub mod editor;
pub mod list_view;
pub mod run;
pub mod watch;

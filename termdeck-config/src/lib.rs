//! Configuration system for the termdeck profile runner.
//!
//! This crate owns everything that is persisted or configured:
//!
//! - The [`Profile`] model and its on-disk [`ProfileRecord`] shape
//! - [`ProfileStore`]: load / save / single-property update of the project profile file
//! - [`ProfileRegistry`]: read-modify-write mutations (add, remove, rename, commands)
//! - [`ChangeNotifier`]: "the profile set may have changed" broadcast
//! - User [`Settings`] (replay timing, locale, editor, log level)
//! - Localized message tables behind the [`Messages`] trait
//! - Profile file watching for external edits (feature `watcher`)

pub mod error;
pub mod messages;
pub mod notifier;
pub mod profile;
pub mod record;
pub mod registry;
pub mod settings;
pub mod store;
#[cfg(feature = "watcher")]
pub mod watcher;

mod env_vars;

pub use error::ConfigError;
pub use messages::{EnglishMessages, Locale, MessageKey, Messages, SpanishMessages};
pub use notifier::{ChangeNotifier, SubscriptionId};
pub use profile::{CloseOnFinish, Profile};
pub use record::ProfileRecord;
pub use registry::ProfileRegistry;
pub use settings::{LogLevel, ReplaySettings, Settings};
pub use store::ProfileStore;
#[cfg(feature = "watcher")]
pub use watcher::ProfileFileWatcher;

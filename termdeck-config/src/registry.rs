//! High-level profile mutations.
//!
//! Every operation re-loads the file, mutates the fresh list and saves the
//! whole array back, so edits made outside this process between two calls are
//! not lost. Nothing is cached between calls. Saves are best effort (logged),
//! and not-found is a silent no-op everywhere except
//! [`ProfileRegistry::update_property`].

use serde_json::Value;

use crate::error::ConfigError;
use crate::notifier::ChangeNotifier;
use crate::profile::Profile;
use crate::store::ProfileStore;

#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    store: ProfileStore,
    notifier: ChangeNotifier,
}

impl ProfileRegistry {
    pub fn new(store: ProfileStore) -> Self {
        Self::with_notifier(store, ChangeNotifier::new())
    }

    /// Registry that fires `notifier` after each mutation
    pub fn with_notifier(store: ProfileStore, notifier: ChangeNotifier) -> Self {
        Self { store, notifier }
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    /// Freshest copy of every profile
    pub fn profiles(&self) -> Vec<Profile> {
        self.store.load()
    }

    /// Freshest copy of the first profile named `name`
    pub fn find(&self, name: &str) -> Option<Profile> {
        self.store.load().into_iter().find(|p| p.name == name)
    }

    /// Append a profile with no commands and close-on-finish off.
    pub fn add(&self, name: &str, working_directory: Option<&str>) -> Vec<Profile> {
        let mut profiles = self.store.load();
        let mut profile = Profile::new(name);
        profile.working_directory = working_directory.map(str::to_string);
        profiles.push(profile);
        self.commit(&profiles);
        log::info!("Added profile \"{}\"", name);
        profiles
    }

    /// Drop every profile named `name`. Rewrites the file even when nothing matched.
    pub fn remove(&self, name: &str) -> Vec<Profile> {
        let mut profiles = self.store.load();
        let before = profiles.len();
        profiles.retain(|p| p.name != name);
        self.commit(&profiles);
        log::info!("Removed {} profile(s) named \"{}\"", before - profiles.len(), name);
        profiles
    }

    /// Rename the first profile named `old_name`.
    ///
    /// Not found: the list is returned unchanged and nothing is written.
    /// Renaming onto the name of another existing profile is rejected with
    /// [`ConfigError::NameCollision`] and nothing is written.
    pub fn rename(&self, old_name: &str, new_name: &str) -> Result<Vec<Profile>, ConfigError> {
        let mut profiles = self.store.load();
        let Some(index) = profiles.iter().position(|p| p.name == old_name) else {
            log::debug!("Rename skipped, no profile named \"{}\"", old_name);
            return Ok(profiles);
        };

        if old_name != new_name && profiles.iter().any(|p| p.name == new_name) {
            return Err(ConfigError::NameCollision {
                name: new_name.to_string(),
            });
        }

        profiles[index].name = new_name.to_string();
        self.commit(&profiles);
        log::info!("Renamed profile \"{}\" to \"{}\"", old_name, new_name);
        Ok(profiles)
    }

    /// Replace the commands of the first profile named `name`.
    ///
    /// An empty list clears the commands field entirely. The file is rewritten
    /// whether or not the profile exists.
    pub fn update_commands(&self, name: &str, commands: Vec<String>) -> Vec<Profile> {
        let mut profiles = self.store.load();
        match profiles.iter_mut().find(|p| p.name == name) {
            Some(profile) => {
                log::info!(
                    "Commands updated for terminal \"{}\": {} commands",
                    name,
                    commands.len()
                );
                for (i, cmd) in commands.iter().enumerate() {
                    log::debug!("  {}. {}", i + 1, cmd);
                }
                profile.set_commands(commands);
            }
            None => log::error!("No profile \"{}\" to update commands for", name),
        }
        self.commit(&profiles);
        profiles
    }

    /// Set a raw record field directly in the file. Errors are returned, not logged away.
    pub fn update_property(&self, name: &str, property: &str, value: Value) -> Result<(), ConfigError> {
        self.store.update_property(name, property, value).inspect_err(|e| {
            log::error!("Error updating terminal property: {}", e);
        })?;
        self.notifier.fire();
        Ok(())
    }

    fn commit(&self, profiles: &[Profile]) {
        self.store.save(profiles);
        self.notifier.fire();
    }
}

//! Storage for project profile persistence
//!
//! Profiles are stored per project in `<project>/.vscode/powershell-terminals.json`
//! as a pretty-printed JSON array. The path is resolved once by the host and
//! injected here; a store without a path is inert and behaves as an empty,
//! read-only store.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::ConfigError;
use crate::profile::Profile;
use crate::record::{self, FIELD_COMMANDS, FIELD_NAME, FIELD_WORKING_DIRECTORY, ProfileRecord};

/// Project-local configuration directory holding the profile file
pub const CONFIG_DIR_NAME: &str = ".vscode";
/// File name of the profile file inside [`CONFIG_DIR_NAME`]
pub const PROFILES_FILE_NAME: &str = "powershell-terminals.json";

/// Owns the profile file location and translates between records and profiles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileStore {
    path: Option<PathBuf>,
}

impl ProfileStore {
    /// Derive the profile file path for a project, creating the configuration directory if needed.
    ///
    /// Fails when the directory cannot be created, including when a regular
    /// file already sits at its path.
    pub fn resolve_storage_location(project_root: &Path) -> Result<PathBuf, ConfigError> {
        let config_dir = project_root.join(CONFIG_DIR_NAME);
        if !config_dir.is_dir() {
            fs::create_dir_all(&config_dir)?;
            log::info!("Created profile configuration directory {:?}", config_dir);
        }
        Ok(config_dir.join(PROFILES_FILE_NAME))
    }

    /// Open the store for a project root; `None` gives an inert store.
    ///
    /// A directory creation failure is returned so the host can report it once
    /// and continue with [`ProfileStore::inert`].
    pub fn open(project_root: Option<&Path>) -> Result<Self, ConfigError> {
        match project_root {
            Some(root) => Ok(Self::at_path(Self::resolve_storage_location(root)?)),
            None => {
                log::info!("No project root known, profile store is inert");
                Ok(Self::inert())
            }
        }
    }

    /// Store backed by an explicit file path
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Store with no backing file: loads nothing, saves nothing
    pub fn inert() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_inert(&self) -> bool {
        self.path.is_none()
    }

    /// Best-effort load. Missing, unreadable or malformed files all yield an empty list.
    pub fn load(&self) -> Vec<Profile> {
        match self.try_load() {
            Ok(profiles) => profiles,
            Err(e) => {
                log::error!("Error loading terminal configurations: {}", e);
                Vec::new()
            }
        }
    }

    /// Strict load: a missing file is still an empty list, but read and parse errors are returned.
    pub fn try_load(&self) -> Result<Vec<Profile>, ConfigError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(Vec::new());
        };
        if !path.exists() {
            log::debug!("No profile file at {:?}, starting with empty profiles", path);
            return Ok(Vec::new());
        }

        let records = read_records(path)?;
        let profiles: Vec<Profile> = records.iter().filter_map(record::profile_from_value).collect();

        log::debug!("Loaded {} profiles from {:?}", profiles.len(), path);
        for p in &profiles {
            log::trace!("  - {} ({} commands)", p.name, p.command_count());
        }
        Ok(profiles)
    }

    /// Replace the whole file with `profiles`. Failures are logged, not returned.
    pub fn save(&self, profiles: &[Profile]) {
        if let Err(e) = self.try_save(profiles) {
            log::error!("Error saving terminal configurations: {}", e);
        }
    }

    /// Replace the profiles in the file with `profiles`, returning any failure.
    ///
    /// Records the profile model cannot represent (no string `name`) are
    /// carried over verbatim at their original position, so saving never
    /// deletes them.
    pub fn try_save(&self, profiles: &[Profile]) -> Result<(), ConfigError> {
        let Some(path) = self.path.as_deref() else {
            log::debug!("Profile store is inert, skipping save");
            return Ok(());
        };

        let mut records = profiles
            .iter()
            .map(|p| serde_json::to_value(ProfileRecord::from(p)))
            .collect::<Result<Vec<Value>, _>>()?;
        let kept = foreign_records(path);
        if !kept.is_empty() {
            log::warn!("Keeping {} profile records without a string name", kept.len());
        }
        for (index, record) in kept {
            records.insert(index.min(records.len()), record);
        }
        write_records(path, &records)?;

        log::info!("Saved {} profiles to {:?}", profiles.len(), path);
        Ok(())
    }

    /// Set one raw field of the record named `name`, bypassing the profile model.
    ///
    /// Re-reads the file so edits made by other collaborators are kept. Unlike
    /// [`ProfileStore::save`], every failure is returned.
    pub fn update_property(
        &self,
        name: &str,
        property: &str,
        value: Value,
    ) -> Result<(), ConfigError> {
        let path = self.path.as_deref().ok_or(ConfigError::StoreInert)?;
        let not_found = || ConfigError::NotFound {
            name: name.to_string(),
        };
        if !path.exists() {
            return Err(not_found());
        }

        let mut records = read_records(path)?;
        let record = records
            .iter_mut()
            .filter_map(Value::as_object_mut)
            .find(|r| r.get(FIELD_NAME).and_then(Value::as_str) == Some(name))
            .ok_or_else(not_found)?;

        log::debug!("Setting {}.{} = {}", name, property, value);
        record.insert(property.to_string(), value);

        write_records(path, &records)
    }

    /// Make sure the record for `name` exists with a `comandos` field, ready for hand editing.
    ///
    /// Adds the record when missing and migrates a legacy `startupCommands`
    /// field. Returns the path of the file to open in an editor.
    pub fn prepare_for_edit(
        &self,
        name: &str,
        working_directory: Option<&str>,
    ) -> Result<PathBuf, ConfigError> {
        let path = self.path.as_deref().ok_or(ConfigError::StoreInert)?;
        let mut records = if path.exists() {
            read_records(path)?
        } else {
            Vec::new()
        };

        let existing = records
            .iter_mut()
            .filter_map(Value::as_object_mut)
            .find(|r| r.get(FIELD_NAME).and_then(Value::as_str) == Some(name));

        match existing {
            Some(record) => {
                if record::migrate_legacy_commands(record) {
                    log::info!("Migrated commands field for \"{}\" before editing", name);
                }
            }
            None => {
                let mut record = serde_json::Map::new();
                record.insert(FIELD_NAME.to_string(), Value::from(name));
                if let Some(dir) = working_directory {
                    record.insert(FIELD_WORKING_DIRECTORY.to_string(), Value::from(dir));
                }
                record.insert(FIELD_COMMANDS.to_string(), Value::Array(Vec::new()));
                records.push(Value::Object(record));
                log::info!("Added record for \"{}\" before editing", name);
            }
        }

        write_records(path, &records)?;
        Ok(path.to_path_buf())
    }
}

/// Records in the current file that are not profiles, with their index
fn foreign_records(path: &Path) -> Vec<(usize, Value)> {
    if !path.exists() {
        return Vec::new();
    }
    match read_records(path) {
        Ok(records) => records
            .into_iter()
            .enumerate()
            .filter(|(_, record)| !record::is_profile_record(record))
            .collect(),
        Err(e) => {
            log::debug!("Not carrying over records from unreadable {:?}: {}", path, e);
            Vec::new()
        }
    }
}

/// Read the raw record array
fn read_records(path: &Path) -> Result<Vec<Value>, ConfigError> {
    let contents = fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&contents)?)
}

fn write_records(path: &Path, records: &[Value]) -> Result<(), ConfigError> {
    let contents = serde_json::to_string_pretty(records)?;
    write_atomic(path, &contents)
}

/// Atomic save: write to a temp file next to the target, then rename over it.
fn write_atomic(path: &Path, contents: &str) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, contents)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

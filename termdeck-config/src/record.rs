//! On-disk record shape for profiles.
//!
//! The profile file is a JSON array of records. Records written by older
//! versions keep their commands under `startupCommands`; current versions
//! write `comandos`. Reading accepts both (primary wins), writing only ever
//! produces `comandos`.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::profile::{CLOSE_FLAG_NO, CloseOnFinish, Profile};

pub const FIELD_NAME: &str = "name";
pub const FIELD_WORKING_DIRECTORY: &str = "workingDirectory";
/// Primary commands field
pub const FIELD_COMMANDS: &str = "comandos";
/// Legacy commands field, migrated to [`FIELD_COMMANDS`] on edit
pub const FIELD_LEGACY_COMMANDS: &str = "startupCommands";
pub const FIELD_CLOSE: &str = "cerrar";

/// A profile as written to the profile file.
///
/// Field order matches the order records are written in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileRecord {
    pub name: String,

    #[serde(rename = "workingDirectory", skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,

    #[serde(rename = "cerrar", skip_serializing_if = "Option::is_none")]
    pub close: Option<String>,

    #[serde(rename = "comandos", skip_serializing_if = "Option::is_none")]
    pub commands: Option<Vec<String>>,
}

impl From<&Profile> for ProfileRecord {
    fn from(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            working_directory: profile.working_directory.clone(),
            close: Some(profile.close_on_finish.as_flag().to_string()),
            commands: profile
                .commands
                .as_ref()
                .filter(|commands| !commands.is_empty())
                .cloned(),
        }
    }
}

/// Whether `value` is a record the profile model can represent: a JSON
/// object with a string `name`.
///
/// Other records are left untouched in the file (see `ProfileStore::try_save`).
pub fn is_profile_record(value: &Value) -> bool {
    value.get(FIELD_NAME).is_some_and(Value::is_string)
}

/// Map one raw JSON record to a [`Profile`].
///
/// Lenient on purpose: fields of the wrong type are treated as absent, and
/// records without a string `name` are not profiles. The returned commands
/// are a fresh copy, never shared with the parsed document.
pub fn profile_from_value(value: &Value) -> Option<Profile> {
    let Some(record) = value.as_object() else {
        log::warn!("Skipping profile record that is not a JSON object: {}", value);
        return None;
    };

    let Some(name) = record.get(FIELD_NAME).and_then(Value::as_str) else {
        log::warn!("Profile record without a string name is kept but not listed: {}", value);
        return None;
    };

    let working_directory = record
        .get(FIELD_WORKING_DIRECTORY)
        .and_then(Value::as_str)
        .map(str::to_string);

    let commands = if let Some(list) = string_list(name, record, FIELD_COMMANDS) {
        log::debug!(
            "Profile \"{}\" has {} commands in '{}'",
            name,
            list.len(),
            FIELD_COMMANDS
        );
        Some(list)
    } else if let Some(list) = string_list(name, record, FIELD_LEGACY_COMMANDS) {
        log::debug!(
            "Profile \"{}\" has {} commands in legacy '{}'",
            name,
            list.len(),
            FIELD_LEGACY_COMMANDS
        );
        Some(list)
    } else {
        None
    };
    // An empty primary list still wins over the legacy one, then reads as "no commands"
    let commands = commands.filter(|list| !list.is_empty());

    let close_flag = record
        .get(FIELD_CLOSE)
        .and_then(Value::as_str)
        .unwrap_or(CLOSE_FLAG_NO);

    Some(Profile {
        name: name.to_string(),
        working_directory,
        commands,
        close_on_finish: CloseOnFinish::from_flag(close_flag),
    })
}

/// Read `field` as an array of command strings, or `None` if it is not an array.
///
/// Non-string items are converted to their JSON text and `null`s are
/// dropped; either one is logged because the next save writes the result.
fn string_list(name: &str, record: &Map<String, Value>, field: &str) -> Option<Vec<String>> {
    let items = record.get(field)?.as_array()?;
    let mut commands = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::String(s) => commands.push(s.clone()),
            Value::Null => {
                log::warn!("Profile \"{}\": dropping null entry in '{}'", name, field);
            }
            other => {
                log::warn!(
                    "Profile \"{}\": non-string entry {} in '{}' is used as text",
                    name,
                    other,
                    field
                );
                commands.push(other.to_string());
            }
        }
    }
    Some(commands)
}

/// Migrate a raw record in place so that `comandos` is the only commands field.
///
/// Returns `true` when the record changed.
pub fn migrate_legacy_commands(record: &mut Map<String, Value>) -> bool {
    if record.contains_key(FIELD_COMMANDS) {
        return record.remove(FIELD_LEGACY_COMMANDS).is_some();
    }
    let commands = record
        .remove(FIELD_LEGACY_COMMANDS)
        .unwrap_or_else(|| Value::Array(Vec::new()));
    record.insert(FIELD_COMMANDS.to_string(), commands);
    true
}

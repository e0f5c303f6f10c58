//! Integration tests for profile persistence through the public API
//!
//! These cover the on-disk compatibility guarantees:
//! - Legacy `startupCommands` records load and migrate to `comandos` on edit
//! - Primary field priority
//! - Empty command lists are never persisted
//! - Load/save idempotence
//! - External edits between registry calls are preserved
//! - Records without a string name survive every mutation

use std::fs;
use std::path::Path;

use serde_json::{Value, json};
use tempfile::tempdir;
use termdeck_config::{CloseOnFinish, Profile, ProfileRegistry, ProfileStore};

fn project_registry(root: &Path) -> ProfileRegistry {
    let store = ProfileStore::open(Some(root)).expect("open store");
    ProfileRegistry::new(store)
}

fn raw_file(registry: &ProfileRegistry) -> Value {
    let path = registry.store().path().expect("store has a path");
    serde_json::from_str(&fs::read_to_string(path).expect("read profile file")).expect("valid json")
}

#[test]
fn test_store_lives_under_project_config_dir() {
    let temp = tempdir().unwrap();
    let registry = project_registry(temp.path());

    registry.add("Build", None);

    assert!(
        temp.path()
            .join(".vscode")
            .join("powershell-terminals.json")
            .exists()
    );
}

#[test]
fn test_build_profile_scenario() {
    let temp = tempdir().unwrap();
    let registry = project_registry(temp.path());

    registry.add("Build", Some("/repo"));
    registry.update_commands("Build", vec!["npm ci".to_string(), "npm test".to_string()]);

    let profiles = registry.store().load();
    assert_eq!(
        profiles,
        vec![Profile {
            name: "Build".to_string(),
            working_directory: Some("/repo".to_string()),
            commands: Some(vec!["npm ci".to_string(), "npm test".to_string()]),
            close_on_finish: CloseOnFinish::No,
        }]
    );
}

#[test]
fn test_legacy_record_migrates_on_first_edit() {
    let temp = tempdir().unwrap();
    let registry = project_registry(temp.path());
    let path = registry.store().path().unwrap().to_path_buf();
    fs::write(&path, r#"[{"name": "Old", "startupCommands": ["a", "b"]}]"#).unwrap();

    let loaded = registry.store().load();
    assert_eq!(loaded[0].command_list(), ["a", "b"]);

    registry.rename("Old", "Old").unwrap();

    let raw = raw_file(&registry);
    assert_eq!(raw[0]["comandos"], json!(["a", "b"]));
    assert!(raw[0].get("startupCommands").is_none());
}

#[test]
fn test_primary_field_wins() {
    let temp = tempdir().unwrap();
    let registry = project_registry(temp.path());
    let path = registry.store().path().unwrap().to_path_buf();
    fs::write(
        &path,
        r#"[{"name": "Both", "comandos": ["x"], "startupCommands": ["y"]}]"#,
    )
    .unwrap();

    assert_eq!(registry.find("Both").unwrap().command_list(), ["x"]);
}

#[test]
fn test_empty_commands_are_absent_after_reload() {
    let temp = tempdir().unwrap();
    let registry = project_registry(temp.path());
    registry.add("Build", None);

    registry.update_commands("Build", Vec::new());

    assert!(registry.find("Build").unwrap().commands.is_none());
    assert!(raw_file(&registry)[0].get("comandos").is_none());
}

#[test]
fn test_remove_handles_zero_one_or_two_matches() {
    for copies in 0..=2 {
        let temp = tempdir().unwrap();
        let registry = project_registry(temp.path());
        registry.add("Keep", None);
        for _ in 0..copies {
            registry.add("X", None);
        }

        let remaining = registry.remove("X");

        assert!(remaining.iter().all(|p| p.name != "X"), "copies = {copies}");
        assert_eq!(remaining.len(), 1);
    }
}

#[test]
fn test_save_of_load_is_stable() {
    let temp = tempdir().unwrap();
    let registry = project_registry(temp.path());
    let store = registry.store();
    fs::write(
        store.path().unwrap(),
        r#"[
  {"name": "A", "startupCommands": ["one"], "workingDirectory": "/a"},
  {"name": "B", "cerrar": "si"}
]"#,
    )
    .unwrap();

    store.save(&store.load());
    let once = fs::read_to_string(store.path().unwrap()).unwrap();
    store.save(&store.load());
    let twice = fs::read_to_string(store.path().unwrap()).unwrap();

    assert_eq!(once, twice);
}

#[test]
fn test_external_edit_between_calls_is_kept() {
    let temp = tempdir().unwrap();
    let registry = project_registry(temp.path());
    registry.add("A", None);

    // Someone edits the file by hand between two registry calls
    let path = registry.store().path().unwrap().to_path_buf();
    fs::write(&path, r#"[{"name": "A", "cerrar": "si"}, {"name": "Hand", "comandos": ["ls"]}]"#)
        .unwrap();

    let profiles = registry.add("B", None);

    let names: Vec<&str> = profiles.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["A", "Hand", "B"]);
    assert!(profiles[0].close_on_finish.is_enabled());
    assert_eq!(profiles[1].command_list(), ["ls"]);
}

#[test]
fn test_update_property_then_load_sees_close_flag() {
    let temp = tempdir().unwrap();
    let registry = project_registry(temp.path());
    registry.add("Build", None);

    registry
        .update_property("Build", "cerrar", Value::from("si"))
        .expect("property update");

    assert_eq!(
        registry.find("Build").unwrap().close_on_finish,
        CloseOnFinish::Yes
    );
}

#[test]
fn test_inert_store_is_empty_and_silent() {
    let registry = ProfileRegistry::new(ProfileStore::inert());

    assert!(registry.add("A", None).len() == 1);
    assert!(registry.profiles().is_empty());
    assert!(registry.update_property("A", "cerrar", Value::from("si")).is_err());
}

#[test]
fn test_unrelated_add_keeps_records_without_string_name() {
    let temp = tempdir().unwrap();
    let registry = project_registry(temp.path());
    let path = registry.store().path().unwrap().to_path_buf();
    fs::write(
        &path,
        r#"[{"name": 42, "comandos": ["deploy"], "workingDirectory": "/srv"}, {"name": "A"}]"#,
    )
    .unwrap();

    let listed = registry.add("B", None);
    assert_eq!(listed.len(), 2);
    registry.remove("A");

    assert_eq!(
        raw_file(&registry),
        json!([
            {"name": 42, "comandos": ["deploy"], "workingDirectory": "/srv"},
            {"name": "B", "cerrar": "no"}
        ])
    );
}

#[test]
fn test_config_dir_blocked_by_file_fails_to_open() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join(".vscode"), "").unwrap();

    assert!(ProfileStore::open(Some(temp.path())).is_err());
}

//! Editing a profile's record by hand in the user's editor.
//!
//! The record is prepared first (created if missing, legacy commands
//! migrated, empty `comandos` added), then the editor opens the whole
//! profile file and blocks until it exits.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

#[cfg(windows)]
const DEFAULT_EDITOR: &str = "notepad";
#[cfg(not(windows))]
const DEFAULT_EDITOR: &str = "vi";

/// Placeholder replaced by the file path inside an editor command line
const FILE_PLACEHOLDER: &str = "{file}";

/// Editor command line: configured value, then `$VISUAL`, then `$EDITOR`,
/// then the platform default.
pub fn editor_command(configured: Option<&str>) -> String {
    configured
        .filter(|c| !c.trim().is_empty())
        .map(str::to_string)
        .or_else(|| std::env::var("VISUAL").ok().filter(|v| !v.trim().is_empty()))
        .or_else(|| std::env::var("EDITOR").ok().filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
}

/// Split `command` into program + arguments with `path` substituted.
///
/// The command is split before substitution so the path stays a single
/// argument whatever it contains. Without a `{file}` placeholder the path is
/// appended.
pub fn expand_editor_command(command: &str, path: &Path) -> Result<Vec<String>> {
    let tokens = shell_words::split(command)
        .with_context(|| format!("Failed to parse editor command: {}", command))?;
    if tokens.is_empty() {
        anyhow::bail!("Editor command is empty");
    }

    let path = path.to_string_lossy();
    let mut substituted = false;
    let mut parts: Vec<String> = tokens
        .into_iter()
        .map(|token| {
            if token.contains(FILE_PLACEHOLDER) {
                substituted = true;
                token.replace(FILE_PLACEHOLDER, &path)
            } else {
                token
            }
        })
        .collect();
    if !substituted {
        parts.push(path.into_owned());
    }
    Ok(parts)
}

/// Open `path` in the editor and wait for it to exit.
pub fn edit_file(command: &str, path: &Path) -> Result<()> {
    let parts = expand_editor_command(command, path)?;
    crate::debug_info!("EDITOR", "Launching editor: {:?}", parts);

    let status = Command::new(&parts[0])
        .args(&parts[1..])
        .status()
        .with_context(|| format!("Failed to run editor '{}'", parts[0]))?;

    if !status.success() {
        anyhow::bail!("Editor '{}' exited with {}", parts[0], status);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_configured_editor_wins() {
        assert_eq!(editor_command(Some("code --wait")), "code --wait");
    }

    #[test]
    fn test_blank_configured_editor_is_ignored() {
        assert_ne!(editor_command(Some("   ")), "   ");
    }

    #[test]
    fn test_path_is_appended_as_one_argument() {
        let path = PathBuf::from("/my project/.vscode/powershell-terminals.json");
        let parts = expand_editor_command("code --wait", &path).unwrap();
        assert_eq!(
            parts,
            ["code", "--wait", "/my project/.vscode/powershell-terminals.json"]
        );
    }

    #[test]
    fn test_file_placeholder_is_substituted() {
        let path = PathBuf::from("/p/terminals.json");
        let parts = expand_editor_command("subl -n {file}:1", &path).unwrap();
        assert_eq!(parts, ["subl", "-n", "/p/terminals.json:1"]);
    }

    #[test]
    fn test_invalid_command_is_an_error() {
        let path = PathBuf::from("/p/terminals.json");
        assert!(expand_editor_command("", &path).is_err());
        assert!(expand_editor_command("vim 'unterminated", &path).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_edit_file_reports_failing_editor() {
        let path = PathBuf::from("/p/terminals.json");
        assert!(edit_file("true", &path).is_ok());
        assert!(edit_file("false", &path).is_err());
    }
}

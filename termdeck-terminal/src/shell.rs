//! Platform-aware shell selection for replayed profiles.
//!
//! The choice is a pure function of the host family (plus, on macOS, whether
//! zsh is installed). It only decides which binary is launched; the profile's
//! commands are sent verbatim whichever shell runs them.

use std::path::Path;

use crate::platform::HostFamily;

pub const WINDOWS_SHELL: &str = "powershell.exe";
/// Preferred macOS shell, used when present
pub const MAC_PREFERRED_SHELL: &str = "/bin/zsh";
pub const DEFAULT_SHELL: &str = "/bin/bash";

/// A shell binary and the arguments it is launched with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellProgram {
    /// Human-readable display name (e.g. "zsh", "bash", "PowerShell")
    pub name: String,
    /// Path or command name of the shell binary
    pub path: String,
    /// Arguments so the shell reads commands from its input stream
    pub args: Vec<String>,
}

impl ShellProgram {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

impl std::fmt::Display for ShellProgram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.path)
    }
}

/// Select the shell for the running host.
pub fn select_shell(family: HostFamily) -> ShellProgram {
    select_shell_with(family, |path| path.exists())
}

/// Select the shell for `family`, probing the filesystem through `exists`.
pub fn select_shell_with(family: HostFamily, exists: impl Fn(&Path) -> bool) -> ShellProgram {
    let program = match family {
        HostFamily::Windows => ShellProgram::new("PowerShell", WINDOWS_SHELL)
            .with_args(["-NoLogo", "-NoExit", "-Command", "-"]),
        HostFamily::Mac if exists(Path::new(MAC_PREFERRED_SHELL)) => {
            ShellProgram::new("zsh", MAC_PREFERRED_SHELL)
        }
        HostFamily::Mac | HostFamily::Other => ShellProgram::new("bash", DEFAULT_SHELL),
    };
    log::debug!("Selected shell {} for {:?}", program, family);
    program
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_uses_powershell() {
        let shell = select_shell_with(HostFamily::Windows, |_| true);
        assert_eq!(shell.path, "powershell.exe");
        assert_eq!(shell.name, "PowerShell");
    }

    #[test]
    fn test_mac_prefers_zsh_when_present() {
        let shell = select_shell_with(HostFamily::Mac, |p| p == Path::new("/bin/zsh"));
        assert_eq!(shell.path, "/bin/zsh");
    }

    #[test]
    fn test_mac_falls_back_to_bash() {
        let shell = select_shell_with(HostFamily::Mac, |_| false);
        assert_eq!(shell.path, "/bin/bash");
    }

    #[test]
    fn test_other_always_uses_bash() {
        let shell = select_shell_with(HostFamily::Other, |_| true);
        assert_eq!(shell.path, "/bin/bash");
        assert!(shell.args.is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(ShellProgram::new("bash", "/bin/bash").to_string(), "bash (/bin/bash)");
    }
}
